//! Headless application state.
//!
//! `TabkeepApp` owns the [`Host`](tabkeep_core::Host) and drives it from a
//! single task: stdin commands, surface events, config reloads and timer
//! deadlines are multiplexed in [`TabkeepApp::run`].

mod commands;
mod core;
mod dispatch;
mod event_loop;

pub use self::commands::{Command, CommandError};
pub use self::core::TabkeepApp;
pub use self::dispatch::Reply;
