//! Durable key-value settings primitives for sealkit.
//!
//! The cipher helper persists two small values between process lifetimes: the
//! initialization vector of the most recent encryption and the encrypted blob
//! itself. This crate provides the storage seam those values go through:
//!
//! - [`SettingsStore`] — the capability trait consumers depend on
//! - [`MemorySettings`] — process-local store for tests and ephemeral use
//! - [`FileSettings`] — JSON document on disk with atomic replacement
//!
//! Values are opaque strings; the store never interprets them. Callers that
//! need binary payloads encode them first (sealkit-core uses canonical hex).

mod error;
mod file;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileSettings;
pub use memory::MemorySettings;

/// String key-value settings with durable semantics left to the implementation.
///
/// The portable rendition of a platform preferences file: a flat namespace of
/// string keys holding string values. All sealkit persistence goes through
/// this trait so the storage medium can be swapped per platform or per test.
///
/// # Atomicity
///
/// Implementations backed by a file MUST replace the document atomically
/// (write-to-temp-then-rename) so a crash mid-write leaves either the
/// complete old content or the complete new content, never a torn document.
///
/// # Concurrency
///
/// Implementations must be safe to share across threads. Semantic races
/// between independent flows writing the same key are the caller's
/// responsibility to serialize.
pub trait SettingsStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes the value stored under `key`.
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage failures.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Checks whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
