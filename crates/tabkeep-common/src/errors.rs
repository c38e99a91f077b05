use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Failures of the durable key-value store backing tabs and bookmarks.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored value for '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("store path error: {0}")]
    PathError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface {0} already destroyed")]
    Destroyed(u64),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("surface backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("foreground service start denied: {0}")]
    StartDenied(String),

    #[error("battery optimization exemption unavailable: {0}")]
    ExemptionUnavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TabkeepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
