use tabkeep_common::{SurfaceError, SurfaceId};
use tracing::debug;
use wry::raw_window_handle;
use wry::{WebView, WebViewBuilder};

use crate::bridge::ActivityBridge;
use crate::ipc::IPC_INIT_SCRIPT;
use crate::navigation::BLANK_PAGE;
use crate::scripts::injection_scripts;
use crate::surface::RenderSurface;

use super::WryManager;

fn backend(e: wry::Error) -> SurfaceError {
    SurfaceError::Backend(e.to_string())
}

/// A tab's surface backed by a child `wry::WebView`.
pub struct WrySurface {
    webview: WebView,
    id: SurfaceId,
    /// wry exposes no back-stack, so depth is tracked from page loads.
    depth: usize,
}

impl WryManager {
    /// Create a new webview as a child of `window`, initially blank.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
    ) -> Result<WrySurface, SurfaceError> {
        let id = SurfaceId::next();
        let bridge = ActivityBridge::new(id, self.sink.clone());

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_devtools(self.config.devtools)
            .with_clipboard(self.config.clipboard)
            .with_autoplay(self.config.autoplay)
            .with_initialization_script(IPC_INIT_SCRIPT)
            .with_url(BLANK_PAGE);

        if let Some(ua) = &self.config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, bridge);
        builder = Self::attach_page_load_handler(builder, self.sink.clone(), id);
        builder = Self::attach_title_handler(builder, self.sink.clone(), id);
        builder = Self::attach_navigation_handler(builder, self.sink.clone(), id);

        let webview = builder.build_as_child(window).map_err(backend)?;
        debug!(surface = %id, "webview created");

        Ok(WrySurface {
            webview,
            id,
            depth: 0,
        })
    }
}

impl RenderSurface for WrySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn current_url(&self) -> Option<String> {
        self.webview.url().ok()
    }

    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.webview.load_url(url).map_err(backend)?;
        self.depth += 1;
        Ok(())
    }

    fn clear_history(&mut self) -> Result<(), SurfaceError> {
        self.depth = self.depth.min(1);
        self.webview.clear_all_browsing_data().map_err(backend)
    }

    fn can_go_back(&self) -> bool {
        self.depth > 1
    }

    fn go_back(&mut self) -> Result<(), SurfaceError> {
        self.webview
            .evaluate_script("history.back();")
            .map_err(|e| SurfaceError::Script(e.to_string()))?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn evaluate_script(&mut self, js: &str) -> Result<(), SurfaceError> {
        self.webview
            .evaluate_script(js)
            .map_err(|e| SurfaceError::Script(e.to_string()))
    }

    fn pause(&mut self) -> Result<(), SurfaceError> {
        self.webview.set_visible(false).map_err(backend)
    }

    fn resume(&mut self) -> Result<(), SurfaceError> {
        self.webview.set_visible(true).map_err(backend)?;
        // Re-arm the page scripts in case the document was replaced while hidden.
        for script in injection_scripts() {
            self.evaluate_script(&script)?;
        }
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        debug!(surface = %self.id, "webview destroyed");
        drop(self.webview);
    }
}
