//! In-memory settings store for tests and ephemeral use.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::SettingsStore;

/// Process-local settings store backed by a `HashMap`.
///
/// Contents do not survive the process; use [`crate::FileSettings`] when
/// values must outlive it. Thread-safe for concurrent access within a
/// process.
#[derive(Debug, Default)]
pub struct MemorySettings {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    /// Creates a new empty in-memory settings store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the interior lock was poisoned.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .len())
    }

    /// Returns `true` if no entries are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the interior lock was poisoned.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Removes every stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the interior lock was poisoned.
    pub fn clear(&self) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        Ok(())
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(key);
        Ok(())
    }
}
