//! WebView event types.

use serde::{Deserialize, Serialize};
use tabkeep_common::SurfaceId;
use tokio::sync::mpsc;

use crate::bridge::BridgeSignal;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started; the previous document's scripts are gone.
    Started,
    /// Page has fully loaded.
    Finished,
}

#[cfg(feature = "wry")]
impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by a surface, possibly from a non-owning thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WebViewEvent {
    PageLoad {
        surface: SurfaceId,
        state: PageLoadState,
        url: String,
    },
    TitleChanged {
        surface: SurfaceId,
        title: String,
    },
    /// A keep-alive signal reported by page script.
    Activity {
        surface: SurfaceId,
        signal: BridgeSignal,
    },
    NavigationRequested {
        surface: SurfaceId,
        url: String,
    },
    Closed {
        surface: SurfaceId,
    },
}

impl WebViewEvent {
    pub fn surface(&self) -> SurfaceId {
        match self {
            Self::PageLoad { surface, .. }
            | Self::TitleChanged { surface, .. }
            | Self::Activity { surface, .. }
            | Self::NavigationRequested { surface, .. }
            | Self::Closed { surface } => *surface,
        }
    }
}

/// Sending half used by surface callbacks; the owning loop holds the receiver.
pub type EventSink = mpsc::UnboundedSender<WebViewEvent>;
