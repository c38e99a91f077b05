//! IPC protocol between page script and the host.
//!
//! - **JS -> Rust**: page code calls `window.tabkeep.ipc.send(kind, payload)`,
//!   which serializes to `window.ipc.postMessage(...)` and reaches the
//!   surface's IPC handler.
//! - **Rust -> JS**: the host evaluates script in the page.

use serde::{Deserialize, Serialize};

/// A typed IPC message from JavaScript to Rust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: IpcPayload,
}

/// Payload of an IPC message: a simple string or structured JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
    #[default]
    None,
}

impl IpcPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string (from JS postMessage).
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: IpcPayload::Text(text.into()),
        }
    }
}

/// Sets up `window.tabkeep.ipc` on top of the platform `window.ipc` channel.
/// Injected as an initialization script into every surface.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.tabkeep = window.tabkeep || {};
    if (window.tabkeep.ipc) return;
    window.tabkeep.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        }
    };
})();
"#;
