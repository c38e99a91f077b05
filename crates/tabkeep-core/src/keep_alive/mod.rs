//! Maps per-tab keep-alive holds onto one process-wide foreground service.

mod coordinator;
mod service;


pub use coordinator::KeepAliveCoordinator;
pub use service::{ForegroundService, RecordingService};
