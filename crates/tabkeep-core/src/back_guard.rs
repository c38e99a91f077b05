//! Back-press guard for sticky domains.
//!
//! On a page whose host contains a configured domain, back navigation only
//! proceeds after `required` presses with no gap longer than `window`
//! between consecutive presses. Any other page resets the counter.

use std::time::{Duration, Instant};

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackDecision {
    Proceed,
    Blocked { remaining: u32 },
}

#[derive(Debug, Default)]
pub struct BackGuard {
    count: u32,
    last_press: Option<Instant>,
}

impl BackGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_count(&self) -> u32 {
        self.count
    }

    pub fn on_back_press(
        &mut self,
        url: Option<&str>,
        domains: &[String],
        required: u32,
        window: Duration,
        now: Instant,
    ) -> BackDecision {
        let blocked = url
            .and_then(host_of)
            .is_some_and(|host| matches_blocked(&host, domains));
        if !blocked {
            self.count = 0;
            return BackDecision::Proceed;
        }

        let within_window = self
            .last_press
            .is_some_and(|last| now.saturating_duration_since(last) <= window);
        if !within_window {
            self.count = 0;
        }
        self.count += 1;
        self.last_press = Some(now);

        if self.count < required {
            BackDecision::Blocked {
                remaining: required - self.count,
            }
        } else {
            self.count = 0;
            BackDecision::Proceed
        }
    }
}

/// Lowercased host of `url`, or `None` when it has none.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|h| h.to_ascii_lowercase())
}

/// Case-insensitive substring match against any configured domain.
pub fn matches_blocked(host: &str, domains: &[String]) -> bool {
    let host = host.to_lowercase();
    domains
        .iter()
        .any(|d| !d.is_empty() && host.contains(&d.to_lowercase()))
}
