//! Background tab sweep timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Interval between background sweeps (valid range: 1-3600).
    pub sweep_interval_secs: u32,
    /// Idle time after which a background tab is paused (valid range: 1-86400).
    pub inactivity_threshold_secs: u32,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 10,
            inactivity_threshold_secs: 60,
        }
    }
}

impl TabsConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.sweep_interval_secs))
    }

    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_secs(u64::from(self.inactivity_threshold_secs))
    }
}
