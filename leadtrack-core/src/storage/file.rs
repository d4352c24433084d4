//! File-backed session store

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::{SessionStore, poisoned};
use crate::error::StorageError;

/// File-backed storage for session keys
///
/// The whole map is kept in memory and written through to a JSON object
/// file on every mutation.
#[derive(Debug)]
pub struct FileSessionStore {
    entries: Mutex<BTreeMap<String, String>>,
    file_path: PathBuf,
}

impl FileSessionStore {
    /// Load entries from file or create an empty store
    ///
    /// A file that does not parse is treated as an empty session rather than
    /// an error; it is overwritten on the next write.
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let file_path = file_path.as_ref().to_path_buf();

        let entries = if file_path.exists() {
            let content = fs::read_to_string(&file_path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "Discarding corrupt session file");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            entries: Mutex::new(entries),
            file_path,
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.file_path, content)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(true)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let updated = BTreeMap::new();
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}
