//! Saving and restoring the tab set through the key-value store.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tabkeep_common::{StoreError, TabId, TabkeepError};
use tabkeep_webview::SurfaceFactory;
use tracing::{info, warn};

use super::TabManager;
use crate::store::keys;
use crate::tab::Tab;

/// Persisted form of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTab {
    pub id: TabId,
    pub url: String,
    pub title: String,
}

impl TabManager {
    pub fn snapshot(&self) -> Vec<SavedTab> {
        self.tabs
            .iter()
            .map(|t| SavedTab {
                id: t.id().clone(),
                url: t.url.clone(),
                title: t.title.clone(),
            })
            .collect()
    }

    /// Write `{id, url, title}` per tab plus the current tab id.
    pub fn save_tabs(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.snapshot()).map_err(|e| StoreError::Malformed {
            key: keys::TAB_LIST.into(),
            reason: e.to_string(),
        })?;
        self.store.put(keys::TAB_LIST, &json)?;
        match &self.current {
            Some(id) => self.store.put(keys::CURRENT_TAB_ID, id.as_str()),
            None => self.store.remove(keys::CURRENT_TAB_ID),
        }
    }

    /// Recreate saved tabs through `factory` and reload each tab's url.
    ///
    /// Only runs on an empty manager. The saved current tab is selected,
    /// falling back to the last restored tab. On any failure nothing is
    /// added and the error is returned. Returns the number of tabs restored.
    pub fn restore_tabs(
        &mut self,
        factory: &mut dyn SurfaceFactory,
        now: Instant,
    ) -> Result<usize, TabkeepError> {
        if !self.tabs.is_empty() {
            warn!(open = self.tabs.len(), "restore_tabs called with open tabs, skipping");
            return Ok(0);
        }
        let Some(raw) = self.store.get(keys::TAB_LIST)? else {
            return Ok(0);
        };
        let saved: Vec<SavedTab> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
                key: keys::TAB_LIST.into(),
                reason: e.to_string(),
            })?;
        if saved.is_empty() {
            return Ok(0);
        }
        let saved_current = self.store.get(keys::CURRENT_TAB_ID)?.map(TabId::from_stored);

        let mut restored = Vec::with_capacity(saved.len());
        for entry in saved {
            match factory.create() {
                Ok(surface) => {
                    restored.push(Tab::restored(entry.id, surface, entry.url, entry.title, now))
                }
                Err(e) => {
                    for tab in restored {
                        tab.destroy();
                    }
                    return Err(e.into());
                }
            }
        }
        for tab in restored.iter_mut() {
            if !tab.url.is_empty() {
                let url = tab.url.clone();
                tab.load_url(&url);
            }
        }

        let count = restored.len();
        self.tabs = restored;

        let wanted = saved_current.filter(|id| self.index_of(id).is_some());
        let current = match wanted {
            Some(id) => id,
            None => self.tabs[count - 1].id().clone(),
        };
        self.select(&current, now);
        self.generation += 1;

        info!(count, current = %current, "Tabs restored");
        Ok(count)
    }
}
