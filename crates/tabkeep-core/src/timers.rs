//! Cancellable one-shot timers keyed by a stable token.
//!
//! The host never sleeps; it records deadlines here and the driving loop
//! wakes it at [`Timers::next_deadline`]. Scheduling a key that is already
//! pending replaces the old deadline, so a key can never fire twice for one
//! schedule.

use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Periodic background-tab sweep.
    Sweep,
    /// Delayed stop of the foreground service after the last release.
    KeepAliveStop,
    /// Screen-off safety valve that force-releases every hold.
    ScreenOffRelease,
}

#[derive(Debug, Default)]
pub struct Timers {
    deadlines: HashMap<TimerKey, Instant>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` at `deadline`, replacing any pending deadline.
    pub fn schedule(&mut self, key: TimerKey, deadline: Instant) {
        self.deadlines.insert(key, deadline);
    }

    /// Cancel `key`. Returns whether it was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.deadlines.remove(&key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.deadlines.contains_key(&key)
    }

    pub fn deadline(&self, key: TimerKey) -> Option<Instant> {
        self.deadlines.get(&key).copied()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Remove and return every key due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKey> {
        let mut due: Vec<(Instant, TimerKey)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);
        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn reschedule_replaces_deadline() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKey::KeepAliveStop, t0 + Duration::from_secs(5));
        timers.schedule(TimerKey::KeepAliveStop, t0 + Duration::from_secs(50));

        assert!(timers.take_due(t0 + Duration::from_secs(10)).is_empty());
        assert_eq!(
            timers.take_due(t0 + Duration::from_secs(50)),
            vec![TimerKey::KeepAliveStop]
        );
        assert!(timers.take_due(t0 + Duration::from_secs(100)).is_empty());
    }

    #[test]
    fn cancel_prevents_firing() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKey::ScreenOffRelease, t0);
        assert!(timers.cancel(TimerKey::ScreenOffRelease));
        assert!(!timers.cancel(TimerKey::ScreenOffRelease));
        assert!(timers.take_due(t0).is_empty());
    }

    #[test]
    fn due_keys_come_back_in_deadline_order() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(TimerKey::Sweep, t0 + Duration::from_secs(3));
        timers.schedule(TimerKey::KeepAliveStop, t0 + Duration::from_secs(1));
        timers.schedule(TimerKey::ScreenOffRelease, t0 + Duration::from_secs(2));

        assert_eq!(timers.next_deadline(), Some(t0 + Duration::from_secs(1)));
        assert_eq!(
            timers.take_due(t0 + Duration::from_secs(5)),
            vec![
                TimerKey::KeepAliveStop,
                TimerKey::ScreenOffRelease,
                TimerKey::Sweep
            ]
        );
        assert_eq!(timers.next_deadline(), None);
    }
}
