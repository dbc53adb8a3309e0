//! Persistence of the most recent encryption IV.

use std::sync::Arc;

use sealkit_store::SettingsStore;

use crate::encoding;
use crate::error::SealResult;

/// Setting name the IV is persisted under. Part of the storage contract.
pub const LAST_IV_SETTING: &str = "last_iv";

/// Single-slot ledger holding the IV of the most recent encryption.
///
/// Every encryption overwrites the slot; there is no history. Decryption is
/// only well-defined while the slot still holds the IV from the most recent
/// successful encryption under the current key. If the key is regenerated,
/// the old IV/blob pair is permanently undecryptable, by design.
#[derive(Clone)]
pub struct IvLedger {
    settings: Arc<dyn SettingsStore>,
}

impl IvLedger {
    /// Creates a ledger over `settings`.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Records `iv` as the most recent encryption IV, replacing any prior
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store cannot persist the value.
    pub fn record(&self, iv: &[u8]) -> SealResult<()> {
        self.settings
            .put(LAST_IV_SETTING, &encoding::encode_upper(iv))?;
        Ok(())
    }

    /// Returns the most recently recorded IV, or `None` if nothing was ever
    /// encrypted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the persisted value is not
    /// valid hex.
    pub fn last(&self) -> SealResult<Option<Vec<u8>>> {
        match self.settings.get(LAST_IV_SETTING)? {
            Some(stored) => Ok(Some(encoding::decode("stored initialization vector", &stored)?)),
            None => Ok(None),
        }
    }
}
