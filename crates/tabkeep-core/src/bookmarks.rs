//! Saved pages, kept as a JSON array in the key-value store.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tabkeep_common::StoreError;
use tracing::warn;

use crate::store::{keys, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub url: String,
    /// Milliseconds since the Unix epoch when the bookmark was added.
    pub timestamp: i64,
}

pub struct BookmarkStore {
    store: Rc<dyn KeyValueStore>,
}

impl BookmarkStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Bookmark `url` under `name`, stamped with the current time.
    pub fn add(&self, name: &str, url: &str) -> Result<Bookmark, StoreError> {
        let bookmark = Bookmark {
            name: name.to_string(),
            url: url.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.insert(bookmark.clone())?;
        Ok(bookmark)
    }

    pub fn insert(&self, bookmark: Bookmark) -> Result<(), StoreError> {
        let mut all = self.list();
        all.push(bookmark);
        self.save(&all)
    }

    /// All bookmarks, oldest first. Unreadable stored data yields an
    /// empty list.
    pub fn list(&self) -> Vec<Bookmark> {
        let raw = match self.store.get(keys::BOOKMARK_LIST) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read bookmarks");
                return Vec::new();
            }
        };
        let mut bookmarks: Vec<Bookmark> = match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "Stored bookmarks are malformed, ignoring");
                return Vec::new();
            }
        };
        bookmarks.sort_by_key(|b| b.timestamp);
        bookmarks
    }

    /// Remove entries matching both timestamp and url. Returns how many
    /// were removed.
    pub fn remove(&self, bookmark: &Bookmark) -> Result<usize, StoreError> {
        let mut all = self.list();
        let before = all.len();
        all.retain(|b| !(b.timestamp == bookmark.timestamp && b.url == bookmark.url));
        let removed = before - all.len();
        if removed > 0 {
            self.save(&all)?;
        }
        Ok(removed)
    }

    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
        let json = serde_json::to_string(bookmarks).map_err(|e| StoreError::Malformed {
            key: keys::BOOKMARK_LIST.into(),
            reason: e.to_string(),
        })?;
        self.store.put(keys::BOOKMARK_LIST, &json)
    }
}
