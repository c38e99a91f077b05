//! Screen-off safety valve bounding how long keep-alive holds may last.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::timers::{TimerKey, Timers};

#[derive(Debug)]
pub struct ScreenStateObserver {
    screen_on: bool,
}

impl Default for ScreenStateObserver {
    fn default() -> Self {
        Self { screen_on: true }
    }
}

impl ScreenStateObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_screen_on(&self) -> bool {
        self.screen_on
    }

    /// Arm the force-release timer. `timeout` of `None` disables it.
    /// Returns the deadline when armed.
    pub fn on_screen_off(
        &mut self,
        timeout: Option<Duration>,
        timers: &mut Timers,
        now: Instant,
    ) -> Option<Instant> {
        self.screen_on = false;
        timers.cancel(TimerKey::ScreenOffRelease);
        let Some(timeout) = timeout else {
            debug!("Screen off, force release disabled");
            return None;
        };
        let Some(deadline) = now.checked_add(timeout) else {
            warn!(secs = timeout.as_secs(), "Screen off timeout out of range, force release not armed");
            return None;
        };
        timers.schedule(TimerKey::ScreenOffRelease, deadline);
        info!(minutes = timeout.as_secs() / 60, "Screen off, force release armed");
        Some(deadline)
    }

    /// Disarm the timer unconditionally.
    pub fn on_screen_on(&mut self, timers: &mut Timers) {
        self.screen_on = true;
        if timers.cancel(TimerKey::ScreenOffRelease) {
            debug!("Screen on, force release disarmed");
        }
    }
}
