//! General key-value persistence seam.
//!
//! This is the plain, not-necessarily-encrypted storage layer. Values are
//! opaque strings; the session code stores one JSON envelope under a fixed
//! key. The [`crate::SessionStorage`] adapter sits on top and keeps the
//! refresh credential out of this layer entirely.

use crate::StoreResult;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// String-keyed persistence backend.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value. The write is
    /// a single atomic replacement of the whole entry.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the entry under `key`. Removing a missing entry succeeds.
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}

/// File-backed storage: one JSON file per key under the app data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `dir`, creating the directory if
    /// missing.
    pub fn new(dir: PathBuf) -> StoreResult<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, "Writing storage entry");
        std::fs::write(self.entry_path(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "Removing storage entry");
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Handy for asserting a full wipe.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
