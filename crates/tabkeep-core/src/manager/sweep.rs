use std::time::Instant;

use tracing::debug;

use super::TabManager;

/// Outcome of one background sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Tabs paused by this sweep.
    pub paused: usize,
    /// Background tabs kept awake by a keep-alive hold.
    pub held: usize,
}

impl TabManager {
    /// Pause background tabs idle longer than the inactivity threshold.
    ///
    /// The current tab is skipped. Keep-alive holders are treated as active
    /// and their timestamps refreshed, however long they have been idle.
    pub fn sweep(&mut self, now: Instant) -> SweepReport {
        let threshold = self.inactivity_threshold;
        let current = self.current.clone();
        let mut report = SweepReport::default();

        for tab in self.tabs.iter_mut() {
            if current.as_ref() == Some(tab.id()) {
                continue;
            }
            if tab.is_keep_alive_active() {
                tab.touch(now);
                report.held += 1;
                continue;
            }
            let idle = now.saturating_duration_since(tab.last_active());
            if idle > threshold && tab.pause() {
                debug!(tab = %tab.id(), idle_secs = idle.as_secs(), "Paused idle background tab");
                report.paused += 1;
            }
        }
        report
    }
}
