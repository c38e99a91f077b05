use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque tab identity, stable across persistence reloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new() -> Self {
        Self(new_id())
    }

    /// Rebuild an id that was read back from storage.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// Process-unique handle for one rendering surface.
///
/// Bridge messages and keep-alive holds refer to surfaces by this id, so a
/// message that outlives its tab simply fails the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    pub fn next() -> Self {
        Self(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}
