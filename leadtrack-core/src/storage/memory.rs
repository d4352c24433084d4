//! In-memory session store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{SessionStore, poisoned};
use crate::error::StorageError;

/// In-memory implementation of SessionStore
///
/// Mutex-guarded so a read-check-write sequence from one caller cannot
/// interleave with another caller's individual operations.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_returns_none() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let store = MemorySessionStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_overwrites() {
        let store = MemorySessionStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn remove_reports_presence() {
        let store = MemorySessionStore::new();
        store.set("k", "v").unwrap();

        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn clear_drops_everything() {
        let store = MemorySessionStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
