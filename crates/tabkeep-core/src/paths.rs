//! Data locations for the shell's persisted state.

use std::path::PathBuf;

use tabkeep_common::StoreError;

const APP_NAME: &str = "tabkeep";

/// Platform data directory for Tabkeep.
///
/// - Linux: `$XDG_DATA_HOME/tabkeep` (defaults to `~/.local/share/tabkeep`)
/// - macOS: `~/Library/Application Support/tabkeep`
pub fn data_dir() -> Result<PathBuf, StoreError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| StoreError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Key-value state file inside `dir`.
pub fn state_file(dir: &std::path::Path) -> PathBuf {
    dir.join("state.json")
}

/// Keep-alive diagnostic log inside `dir`.
pub fn wakelock_log_file(dir: &std::path::Path) -> PathBuf {
    dir.join("wakelock_logs.txt")
}
