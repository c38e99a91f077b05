//! Live config reload manager.
//!
//! Combines the file watcher with config loading so preference edits reach
//! the running shell without a restart.

mod manager;


pub use manager::ReloadManager;
