//! `wry`-backed rendering surfaces.
//!
//! `WryManager` builds one child `wry::WebView` per tab, wires its callbacks
//! into the host's [`EventSink`], and installs the IPC shim and the
//! keep-alive page script as initialization scripts.

use std::rc::Rc;

use tabkeep_common::SurfaceError;
use wry::raw_window_handle;

use crate::events::EventSink;
use crate::surface::{RenderSurface, SurfaceFactory};

mod handle;
pub mod handlers;
mod types;

pub use handle::WrySurface;
pub use types::WebViewConfig;

/// Creates wry webviews that report into a shared event sink.
pub struct WryManager {
    pub(crate) sink: EventSink,
    pub(crate) config: WebViewConfig,
}

impl WryManager {
    pub fn new(sink: EventSink, config: WebViewConfig) -> Self {
        Self { sink, config }
    }
}

/// [`SurfaceFactory`] that places every new webview at `bounds` inside `window`.
pub struct WrySurfaceFactory<W> {
    manager: WryManager,
    window: Rc<W>,
    bounds: wry::Rect,
}

impl<W: raw_window_handle::HasWindowHandle> WrySurfaceFactory<W> {
    pub fn new(manager: WryManager, window: Rc<W>, bounds: wry::Rect) -> Self {
        Self {
            manager,
            window,
            bounds,
        }
    }

    pub fn set_bounds(&mut self, bounds: wry::Rect) {
        self.bounds = bounds;
    }
}

impl<W: raw_window_handle::HasWindowHandle> SurfaceFactory for WrySurfaceFactory<W> {
    fn create(&mut self) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        let surface = self.manager.create(self.window.as_ref(), self.bounds)?;
        Ok(Box::new(surface))
    }
}
