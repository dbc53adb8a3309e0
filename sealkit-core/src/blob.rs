//! Persistence of the encrypted blob.

use std::sync::Arc;

use sealkit_store::SettingsStore;

use crate::encoding;
use crate::error::SealResult;

/// Setting name the ciphertext is persisted under. Part of the storage
/// contract.
pub const ENCRYPTED_DATA_SETTING: &str = "encrypted_data";

/// Single-slot store for the most recently encrypted payload.
///
/// Overwrite-only: a new encryption discards the previous blob. The
/// ciphertext is persisted as canonical uppercase hex.
#[derive(Clone)]
pub struct EncryptedBlobStore {
    settings: Arc<dyn SettingsStore>,
}

impl EncryptedBlobStore {
    /// Creates a blob store over `settings`.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Persists `ciphertext`, replacing any prior blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store cannot persist the value.
    pub fn save(&self, ciphertext: &[u8]) -> SealResult<()> {
        self.settings
            .put(ENCRYPTED_DATA_SETTING, &encoding::encode_upper(ciphertext))?;
        Ok(())
    }

    /// Returns the stored blob, or `None` if nothing was ever encrypted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the persisted value is not
    /// valid hex.
    pub fn load(&self) -> SealResult<Option<Vec<u8>>> {
        match self.settings.get(ENCRYPTED_DATA_SETTING)? {
            Some(stored) => Ok(Some(encoding::decode("stored encrypted blob", &stored)?)),
            None => Ok(None),
        }
    }
}
