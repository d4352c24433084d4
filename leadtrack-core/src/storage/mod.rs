//! Session-scoped key/value storage
//!
//! Stands in for the browser's `sessionStorage`: string keys, string values,
//! lifetime of one browsing session. Every operation can fail (quota,
//! disabled storage, I/O) and callers are expected to degrade gracefully.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use std::sync::Arc;

use crate::error::StorageError;

/// Session storage trait
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key, returns whether it existed
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Drop every key (end of session)
    fn clear(&self) -> Result<(), StorageError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Unavailable("session store lock poisoned".to_string())
}
