//! App struct and tab lookup helpers.

use tabkeep_common::{SurfaceId, TabId};
use tabkeep_core::{Host, RecordingService};
use tabkeep_webview::{EventSink, PageLoadState, WebViewEvent};

/// Headless shell around one [`Host`].
pub struct TabkeepApp {
    pub(super) host: Host<RecordingService>,
    /// Stands in for surface callbacks: page loads and bridge signals are
    /// posted here and come back through the event loop.
    pub(super) sink: EventSink,
}

impl TabkeepApp {
    pub fn new(host: Host<RecordingService>, sink: EventSink) -> Self {
        Self { host, sink }
    }

    pub fn host(&self) -> &Host<RecordingService> {
        &self.host
    }

    /// Resolve a 1-based list position or an id prefix.
    pub(super) fn resolve_tab(&self, tab_ref: &str) -> Option<TabId> {
        let tabs = self.host.tabs().tabs();
        if let Ok(position) = tab_ref.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|i| tabs.get(i))
                .map(|t| t.id().clone());
        }
        let mut matches = tabs.iter().filter(|t| t.id().as_str().starts_with(tab_ref));
        match (matches.next(), matches.next()) {
            (Some(tab), None) => Some(tab.id().clone()),
            _ => None,
        }
    }

    pub(super) fn surface_of(&self, id: &TabId) -> Option<SurfaceId> {
        self.host.tabs().get(id).map(|t| t.surface_id())
    }

    /// Report a load of `url` the way a real surface would.
    pub(super) fn emit_page_load(&self, surface: SurfaceId, url: &str) {
        let events = [
            WebViewEvent::PageLoad {
                surface,
                state: PageLoadState::Started,
                url: url.to_string(),
            },
            WebViewEvent::PageLoad {
                surface,
                state: PageLoadState::Finished,
                url: url.to_string(),
            },
            WebViewEvent::TitleChanged {
                surface,
                title: url.to_string(),
            },
        ];
        for event in events {
            if self.sink.send(event).is_err() {
                tracing::debug!(%surface, "Event loop gone, page load not reported");
                return;
            }
        }
    }
}
