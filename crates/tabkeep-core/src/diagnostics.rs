//! Plain-text keep-alive diagnostic log.
//!
//! Separate from `tracing`: this file is meant to be read back by the user
//! (`read`/`clear`) to audit when holds were taken and dropped. Writes are
//! skipped entirely while the log is disabled.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Size above which the file is discarded before the next append.
pub const MAX_LOG_SIZE: u64 = 2 * 1024 * 1024;

pub const NO_LOGS: &str = "No logs found.";

#[derive(Debug)]
pub struct DiagnosticLog {
    path: PathBuf,
    enabled: bool,
    max_size: u64,
}

impl DiagnosticLog {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
            max_size: MAX_LOG_SIZE,
        }
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Append a timestamped line. Failures are reported via `tracing` only.
    pub fn log(&self, message: &str) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.append(message) {
            warn!(path = %self.path.display(), error = %e, "Failed to write diagnostic log");
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        if let Ok(meta) = std::fs::metadata(&self.path) {
            if meta.len() > self.max_size {
                std::fs::remove_file(&self.path)?;
            }
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{timestamp}] {message}")
    }

    /// Full log text, or [`NO_LOGS`] when nothing has been written.
    pub fn read(&self) -> String {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => NO_LOGS.to_string(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read diagnostic log");
                NO_LOGS.to_string()
            }
        }
    }

    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
