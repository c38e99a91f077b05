//! Page-facing activity bridge.
//!
//! Page script reports "pending async work" through two calls, `acquire`
//! and `release`, carried as IPC messages of kind [`KEEP_ALIVE_KIND`].
//! The bridge runs on whatever thread the script engine calls back on; it
//! never touches tab state, it only queues a [`WebViewEvent::Activity`] for
//! the owning loop.

use serde::{Deserialize, Serialize};
use tabkeep_common::SurfaceId;
use tracing::{debug, warn};

use crate::events::{EventSink, WebViewEvent};
use crate::ipc::IpcMessage;

/// IPC kind used by the keep-alive page script.
pub const KEEP_ALIVE_KIND: &str = "keep_alive";

/// The closed set of signals a page may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeSignal {
    Acquire,
    Release,
}

impl BridgeSignal {
    /// Decode an IPC message; anything outside the protocol yields `None`.
    pub fn from_ipc(msg: &IpcMessage) -> Option<Self> {
        if msg.kind != KEEP_ALIVE_KIND {
            return None;
        }
        match msg.payload.as_text()? {
            "acquire" => Some(Self::Acquire),
            "release" => Some(Self::Release),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acquire => "acquire",
            Self::Release => "release",
        }
    }
}

/// Per-surface bridge endpoint handed to the script engine.
#[derive(Debug, Clone)]
pub struct ActivityBridge {
    surface: SurfaceId,
    sink: EventSink,
}

impl ActivityBridge {
    pub fn new(surface: SurfaceId, sink: EventSink) -> Self {
        Self { surface, sink }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn acquire(&self) {
        self.post(BridgeSignal::Acquire);
    }

    pub fn release(&self) {
        self.post(BridgeSignal::Release);
    }

    /// Handle a raw IPC body. Returns `true` if it was a bridge signal.
    pub fn handle_ipc(&self, body: &str) -> bool {
        let Some(msg) = IpcMessage::from_json(body) else {
            warn!(
                surface = %self.surface,
                body_len = body.len(),
                "IPC message rejected: failed to parse"
            );
            return false;
        };

        match BridgeSignal::from_ipc(&msg) {
            Some(signal) => {
                self.post(signal);
                true
            }
            None => {
                warn!(surface = %self.surface, kind = %msg.kind, "IPC message rejected: unknown kind");
                false
            }
        }
    }

    fn post(&self, signal: BridgeSignal) {
        debug!(surface = %self.surface, signal = signal.as_str(), "bridge signal");
        let event = WebViewEvent::Activity {
            surface: self.surface,
            signal,
        };
        // The receiver is gone only during shutdown; late signals are dropped.
        if self.sink.send(event).is_err() {
            debug!(surface = %self.surface, "bridge signal dropped: host loop closed");
        }
    }
}
