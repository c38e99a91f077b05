//! Back-button handling.

use std::time::Instant;

use tracing::{debug, warn};

use super::Host;
use crate::back_guard::BackDecision;
use crate::keep_alive::ForegroundService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// The current tab went back one history entry.
    WentBack,
    /// Nothing to go back to; the shell should exit.
    Exit,
    /// The sticky-domain guard swallowed the press.
    Blocked { remaining: u32 },
}

impl<S: ForegroundService> Host<S> {
    pub fn on_back_pressed(&mut self, now: Instant) -> BackOutcome {
        let url = self.tabs.current().and_then(|tab| {
            if tab.url.is_empty() {
                tab.surface().current_url()
            } else {
                Some(tab.url.clone())
            }
        });

        let guard = &self.config.back_guard;
        let decision = self.back_guard.on_back_press(
            url.as_deref(),
            &self.blocked_domains,
            guard.required_presses,
            guard.window(),
            now,
        );
        if let BackDecision::Blocked { remaining } = decision {
            debug!(remaining, "Back press held by domain guard");
            self.notice(format!("Press {remaining} more times to go back"));
            return BackOutcome::Blocked { remaining };
        }

        let Some(tab) = self.tabs.current_mut() else {
            return BackOutcome::Exit;
        };
        if !tab.surface().can_go_back() {
            return BackOutcome::Exit;
        }
        if let Err(e) = tab.surface_mut().go_back() {
            warn!(tab = %tab.id(), error = %e, "Go back failed");
            return BackOutcome::Exit;
        }
        if let Some(url) = tab.surface().current_url() {
            tab.url = url;
        }
        tab.mark_active(now);
        BackOutcome::WentBack
    }
}
