//! Browser shell behavior: start page and session restore.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Page loaded into fresh tabs.
    pub home_page: String,
    /// Reopen the last visited page when the first tab is created.
    pub restore_last_page: bool,
    /// Restore the saved tab set at startup.
    pub restore_tabs: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            home_page: "https://www.google.com".into(),
            restore_last_page: false,
            restore_tabs: true,
        }
    }
}
