//! Durable string key-value storage.
//!
//! Tabs, bookmarks and the last visited page all persist through a
//! [`KeyValueStore`]. Methods take `&self` so a single store can be shared
//! between the tab manager and the host via `Rc`.

mod file;
mod memory;


pub use file::JsonFileStore;
pub use memory::MemoryStore;

use tabkeep_common::StoreError;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Well-known keys.
pub mod keys {
    pub const TAB_LIST: &str = "tab_list";
    pub const CURRENT_TAB_ID: &str = "current_tab_id";
    pub const BOOKMARK_LIST: &str = "bookmark_list";
    pub const LAST_URL: &str = "last_url";
}
