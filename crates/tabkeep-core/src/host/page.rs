//! Surface-originated events: bridge signals, page loads, input.

use std::time::Instant;

use tabkeep_common::{Event, SurfaceId};
use tabkeep_webview::navigation::is_navigation_allowed;
use tabkeep_webview::{BridgeSignal, PageLoadState, WebViewEvent};
use tracing::{debug, warn};

use super::Host;
use crate::keep_alive::ForegroundService;
use crate::store::keys;

const UNKNOWN_TITLE: &str = "Unknown";

impl<S: ForegroundService> Host<S> {
    /// Route one event from a surface's event channel.
    pub fn handle_webview_event(&mut self, event: WebViewEvent, now: Instant) {
        match event {
            WebViewEvent::PageLoad {
                surface,
                state: PageLoadState::Started,
                url,
            } => self.on_page_started(surface, &url, now),
            WebViewEvent::PageLoad {
                surface,
                state: PageLoadState::Finished,
                url,
            } => self.on_page_finished(surface, &url, None, now),
            WebViewEvent::TitleChanged { surface, title } => self.on_title_changed(surface, &title),
            WebViewEvent::Activity { surface, signal } => self.handle_signal(surface, signal, now),
            WebViewEvent::NavigationRequested { surface, url } => {
                self.on_navigation_requested(surface, &url, now);
            }
            WebViewEvent::Closed { surface } => {
                if let Some(id) = self.tabs.by_surface(surface).map(|t| t.id().clone()) {
                    if let Err(e) = self.close_tab(&id, now) {
                        warn!(error = %e, "Failed to close tab for closed surface");
                    }
                }
            }
        }
    }

    /// Apply a keep-alive signal from a page.
    pub fn handle_signal(&mut self, surface: SurfaceId, signal: BridgeSignal, now: Instant) {
        let title = self.title_of(surface);
        let was_active = self.keep_alive.is_service_active();
        match signal {
            BridgeSignal::Acquire => {
                if self
                    .keep_alive
                    .acquire(surface, &mut self.tabs, &mut self.timers, now)
                {
                    debug!(%surface, "Keep-alive acquired");
                    self.diagnostic(&format!("Acquired keep-alive for tab: {title}"));
                }
            }
            BridgeSignal::Release => {
                if self
                    .keep_alive
                    .release(surface, &mut self.tabs, &mut self.timers, now)
                {
                    debug!(%surface, "Keep-alive released");
                    self.diagnostic(&format!("Released keep-alive for tab: {title}"));
                }
            }
        }
        if !was_active && self.keep_alive.is_service_active() {
            self.events.publish(Event::ServiceStarted);
        }
    }

    /// A new document began loading. The old script context is gone, so
    /// holds it reported are dropped before the scripts go back in.
    pub fn on_page_started(&mut self, surface: SurfaceId, url: &str, now: Instant) {
        if self
            .keep_alive
            .release_surface(surface, &mut self.tabs, &mut self.timers, now)
        {
            let title = self.title_of(surface);
            self.diagnostic(&format!("Released keep-alive for tab: {title}"));
        }
        let Some(tab) = self.tabs.by_surface_mut(surface) else {
            return;
        };
        tab.inject_scripts();
        tab.url = url.to_string();
        tab.mark_active(now);
        self.tabs.persist();
    }

    pub fn on_page_finished(
        &mut self,
        surface: SurfaceId,
        url: &str,
        title: Option<&str>,
        now: Instant,
    ) {
        let Some(tab) = self.tabs.by_surface_mut(surface) else {
            return;
        };
        tab.inject_scripts();
        tab.url = url.to_string();
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            tab.title = title.to_string();
        }
        tab.mark_active(now);
        let id = tab.id().clone();
        let is_current = self.tabs.is_current(&id);
        self.tabs.persist();

        if is_current && (url.starts_with("http://") || url.starts_with("https://")) {
            if let Err(e) = self.store.put(keys::LAST_URL, url) {
                warn!(error = %e, "Failed to remember last url");
            }
        }
    }

    pub fn on_title_changed(&mut self, surface: SurfaceId, title: &str) {
        let Some(tab) = self.tabs.by_surface_mut(surface) else {
            return;
        };
        tab.title = title.to_string();
        self.tabs.persist();
    }

    /// Whether the surface may follow a link to `url`. Allowed navigations
    /// count as activity.
    pub fn on_navigation_requested(&mut self, surface: SurfaceId, url: &str, now: Instant) -> bool {
        if !is_navigation_allowed(url) {
            debug!(%surface, url, "Navigation refused");
            return false;
        }
        if let Some(tab) = self.tabs.by_surface_mut(surface) {
            tab.mark_active(now);
        }
        true
    }

    pub fn on_user_input(&mut self, surface: SurfaceId, now: Instant) {
        if let Some(tab) = self.tabs.by_surface_mut(surface) {
            tab.mark_active(now);
        }
    }

    fn title_of(&self, surface: SurfaceId) -> String {
        self.tabs
            .by_surface(surface)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }
}
