use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::TabId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ConfigReloaded,
    TabOpened(TabId),
    TabClosed(TabId),
    TabSwitched(TabId),
    /// Structural change of the tab list; carries the list generation.
    TabsChanged(u64),
    ServiceStarted,
    ServiceStopped,
    /// Short user-visible message (toast).
    Notice(String),
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
