//! Tab lifecycle and keep-alive coordination for the Tabkeep browser shell.
//!
//! The [`Host`] owns every piece of mutable state and is driven from a
//! single thread: callers feed it user actions, surface events and the
//! current time, and run [`Host::fire_due`] whenever
//! [`Host::next_deadline`] passes.

pub mod back_guard;
pub mod bookmarks;
pub mod diagnostics;
pub mod host;
pub mod keep_alive;
pub mod manager;
pub mod paths;
pub mod screen;
pub mod store;
pub mod tab;
pub mod testing;
pub mod timers;

pub use back_guard::{BackDecision, BackGuard};
pub use bookmarks::{Bookmark, BookmarkStore};
pub use diagnostics::DiagnosticLog;
pub use host::{BackOutcome, Host};
pub use keep_alive::{ForegroundService, KeepAliveCoordinator, RecordingService};
pub use manager::{SavedTab, SweepReport, TabManager};
pub use screen::ScreenStateObserver;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use tab::Tab;
pub use timers::{TimerKey, Timers};
