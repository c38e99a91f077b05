//! Key-value store persisted as one JSON object on disk.
//!
//! Every mutation rewrites the file atomically (write to `.tmp`, then
//! rename) so a crash mid-write leaves the previous state intact.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tabkeep_common::StoreError;

use super::KeyValueStore;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// one is reported as [`StoreError::Malformed`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                    key: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "State store opened");
        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    /// Like [`open`](Self::open), but a corrupt file is moved aside to
    /// `<name>.json.corrupt` and the store starts empty at the same path,
    /// so the next save replaces it.
    pub fn open_or_reset(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        match Self::open(&path) {
            Err(StoreError::Malformed { reason, .. }) => {
                let backup = path.with_extension("json.corrupt");
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    "State file is corrupt ({reason}), starting fresh"
                );
                if let Err(e) = std::fs::rename(&path, &backup) {
                    tracing::warn!("could not move corrupt state aside: {e}");
                }
                Ok(Self {
                    path,
                    values: RefCell::new(BTreeMap::new()),
                })
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(values).map_err(|e| StoreError::Malformed {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            tracing::warn!("atomic rename failed ({}), falling back to direct write", e);
            std::fs::write(&self.path, &json)?;
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.borrow_mut();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.borrow_mut();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}
