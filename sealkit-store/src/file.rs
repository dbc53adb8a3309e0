//! File-backed settings store with atomic replacement.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::SettingsStore;

/// Settings store persisted as a JSON document on disk.
///
/// The whole document is held in memory and rewritten on every mutation using
/// the write-to-temp-then-rename pattern, so the file on disk is always either
/// the complete old content or the complete new content. Reads are served from
/// the in-memory copy.
///
/// Intended for the small, low-churn documents sealkit produces (a handful of
/// hex strings); it is not a general-purpose database.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileSettings {
    /// Opens the settings document at `path`, creating parent directories as
    /// needed. A missing file is treated as an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open<P: Into<PathBuf>>(path: P) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::io("settings directory creation", e))?;
            }
        }

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StoreError::io("settings read", e))?;
            serde_json::from_str(&raw).map_err(|e| StoreError::document(e.to_string()))?
        } else {
            HashMap::new()
        };

        log::debug!(
            "opened settings document {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        let document = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::document(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file =
            fs::File::create(&tmp).map_err(|e| StoreError::io("settings temp create", e))?;
        file.write_all(document.as_bytes())
            .map_err(|e| StoreError::io("settings temp write", e))?;
        file.sync_all()
            .map_err(|e| StoreError::io("settings temp sync", e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io("settings rename", e))
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
