//! Back-navigation guard for sticky domains.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domains::parse_blocked_domains;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackGuardConfig {
    /// Comma-separated domains (ASCII `,` or fullwidth `，`).
    pub blocked_domains: String,
    /// Presses needed to leave a blocked domain (valid range: 1-10).
    pub required_presses: u32,
    /// Maximum gap between consecutive presses (valid range: 100-10000).
    pub window_ms: u64,
}

impl Default for BackGuardConfig {
    fn default() -> Self {
        Self {
            blocked_domains: String::new(),
            required_presses: 3,
            window_ms: 2000,
        }
    }
}

impl BackGuardConfig {
    pub fn domains(&self) -> Vec<String> {
        parse_blocked_domains(&self.blocked_domains)
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}
