//! Error types for the settings store.

use thiserror::Error;

/// Result type alias for settings store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by settings store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O operation on the backing medium failed.
    #[error("i/o error during {context}: {source}")]
    Io {
        /// Context describing the operation.
        context: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The settings document could not be encoded or decoded.
    #[error("settings document error: {message}")]
    Document {
        /// Description of the failure.
        message: String,
    },

    /// An in-process lock guarding the store was poisoned by a panic.
    #[error("settings lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Creates an I/O error with context.
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a document encode/decode error.
    pub fn document<S: Into<String>>(message: S) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}
