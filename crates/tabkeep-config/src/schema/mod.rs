//! Configuration schema types for Tabkeep.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod back_guard;
mod browser;
mod keep_alive;
mod system;
mod tabs;

pub use back_guard::*;
pub use browser::*;
pub use keep_alive::*;
pub use system::*;
pub use tabs::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Tabkeep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabkeepConfig {
    pub browser: BrowserConfig,
    pub keep_alive: KeepAliveConfig,
    pub tabs: TabsConfig,
    pub back_guard: BackGuardConfig,
    pub logging: LoggingConfig,
}
