//! Keep-alive (foreground service) preferences.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fallback used when `screen_off_timeout` is not an integer.
pub const DEFAULT_SCREEN_OFF_MINUTES: i64 = 30;

/// Longest accepted screen-off timeout (one week); larger values are clamped.
pub const MAX_SCREEN_OFF_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepAliveConfig {
    /// Minutes after screen-off before every hold is force-released.
    /// Stored as a string; `<= 0` disables the safety valve.
    pub screen_off_timeout: String,
    /// Append acquire/release events to the diagnostic log file.
    pub enable_wakelock_log: bool,
    /// Delay between the last release and stopping the service (valid range: 0-3600).
    pub grace_period_secs: u32,
    /// Ask once for exemption from battery optimizations when the service starts.
    pub request_battery_exemption: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            screen_off_timeout: DEFAULT_SCREEN_OFF_MINUTES.to_string(),
            enable_wakelock_log: false,
            grace_period_secs: 120,
            request_battery_exemption: true,
        }
    }
}

impl KeepAliveConfig {
    /// Parsed screen-off timeout in minutes.
    pub fn screen_off_minutes(&self) -> i64 {
        match self.screen_off_timeout.trim().parse::<i64>() {
            Ok(minutes) => minutes,
            Err(_) => {
                warn!(
                    value = %self.screen_off_timeout,
                    "screen_off_timeout is not an integer, using {DEFAULT_SCREEN_OFF_MINUTES}"
                );
                DEFAULT_SCREEN_OFF_MINUTES
            }
        }
    }

    /// The force-release delay, or `None` when the valve is disabled.
    pub fn screen_off_timeout(&self) -> Option<Duration> {
        let minutes = self.screen_off_minutes();
        if minutes <= 0 {
            return None;
        }
        if minutes > MAX_SCREEN_OFF_MINUTES {
            warn!(minutes, "screen_off_timeout too large, clamping to {MAX_SCREEN_OFF_MINUTES}");
        }
        let minutes = minutes.min(MAX_SCREEN_OFF_MINUTES).unsigned_abs();
        Some(Duration::from_secs(minutes * 60))
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.grace_period_secs))
    }
}
