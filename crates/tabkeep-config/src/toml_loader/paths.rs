//! Where the config file lives, and seeding it on first run.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tabkeep_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "tabkeep";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/tabkeep/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::FileNotFound(PathBuf::from(APP_DIR).join(FILE_NAME)))
}

/// Write the commented template to `path` unless a file is already there.
///
/// Returns whether the file was created. An existing file is never
/// touched, even one created between a caller's check and this call.
pub fn ensure_default_config(path: &Path) -> Result<bool, ConfigError> {
    let io_err = |what: &str, e: std::io::Error| {
        ConfigError::ParseError(format!("failed to {what} {}: {e}", path.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err("create directory for", e))?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(io_err("create", e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_err("write", e))?;

    info!(path = %path.display(), "created default config");
    Ok(true)
}
