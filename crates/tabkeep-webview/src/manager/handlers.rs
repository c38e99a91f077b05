use tabkeep_common::SurfaceId;
use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::bridge::ActivityBridge;
use crate::events::{EventSink, PageLoadState, WebViewEvent};
use crate::navigation::is_navigation_allowed;

use super::WryManager;

fn push(sink: &EventSink, event: WebViewEvent) {
    if sink.send(event).is_err() {
        debug!("webview event dropped: host loop closed");
    }
}

impl WryManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        bridge: ActivityBridge,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            bridge.handle_ipc(request.body());
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        sink: EventSink,
        id: SurfaceId,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(surface = %id, ?state, url = %url, "page load");
            push(
                &sink,
                WebViewEvent::PageLoad {
                    surface: id,
                    state,
                    url,
                },
            );
        })
    }

    pub(super) fn attach_title_handler<'a>(
        builder: WebViewBuilder<'a>,
        sink: EventSink,
        id: SurfaceId,
    ) -> WebViewBuilder<'a> {
        builder.with_document_title_changed_handler(move |title| {
            push(&sink, WebViewEvent::TitleChanged { surface: id, title });
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        sink: EventSink,
        id: SurfaceId,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            if !is_navigation_allowed(&url) {
                warn!(surface = %id, url = %url, "navigation blocked");
                return false;
            }
            push(&sink, WebViewEvent::NavigationRequested { surface: id, url });
            true
        })
    }
}
