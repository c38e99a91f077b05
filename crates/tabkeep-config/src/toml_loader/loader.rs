//! Core TOML config loading: read from path or platform default.

use crate::schema::TabkeepConfig;
use crate::validation;
use std::path::Path;
use tabkeep_common::ConfigError;
use tracing::{info, warn};

use super::paths::{default_config_path, ensure_default_config};

/// Load config from a specific TOML file path.
///
/// Missing fields take serde defaults. Validation failures are logged and
/// the parsed config is returned as-is.
pub fn load_from_path(path: &Path) -> Result<TabkeepConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: TabkeepConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}, using parsed config with potentially invalid values");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/tabkeep/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<TabkeepConfig, ConfigError> {
    let path = default_config_path()?;
    load_or_create(&path)
}

fn load_or_create(path: &Path) -> Result<TabkeepConfig, ConfigError> {
    if ensure_default_config(path)? {
        return Ok(TabkeepConfig::default());
    }
    load_from_path(path)
}

/// Load from `path` (or the default location), never failing.
///
/// Malformed preferences must not keep the shell from starting, so any
/// error is logged and defaults are used instead.
pub fn load_or_default(path: Option<&Path>) -> TabkeepConfig {
    let result = match path {
        Some(p) => load_or_create(p),
        None => load_default(),
    };
    result.unwrap_or_else(|e| {
        warn!("config load failed, using defaults: {e}");
        TabkeepConfig::default()
    })
}
