//! Rendering-surface layer for Tabkeep tabs.
//!
//! Provides:
//! - The [`RenderSurface`] abstraction a tab owns (navigate, pause, destroy)
//! - The page-facing activity bridge and its closed signal protocol
//! - Page scripts injected at every load (IPC shim, keep-alive tracker)
//! - An in-memory surface for headless runs and tests
//! - With the `wry` feature, surfaces backed by real `wry::WebView`s

pub mod bridge;
pub mod events;
pub mod ipc;
#[cfg(feature = "wry")]
pub mod manager;
pub mod memory;
pub mod navigation;
pub mod scripts;
pub mod surface;

pub use bridge::{ActivityBridge, BridgeSignal};
pub use events::{EventSink, PageLoadState, WebViewEvent};
pub use ipc::{IpcMessage, IpcPayload};
pub use memory::{MemorySurface, MemorySurfaceFactory, SurfaceProbe};
pub use surface::{RenderSurface, SurfaceFactory};
