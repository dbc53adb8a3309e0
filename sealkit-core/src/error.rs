//! Error types for sealkit operations.
//!
//! Every failure an operation can hit is normalized into [`SealError`] before
//! it reaches a caller, either as a `Result` from the synchronous surface or
//! as the message of an `on_failure` callback. Nothing is allowed to escape
//! as a panic.

use thiserror::Error;

use sealkit_store::StoreError;

/// Result type alias for sealkit operations.
pub type SealResult<T> = Result<T, SealError>;

/// Errors that can occur while gating, building, or running a cipher session.
#[derive(Debug, Error)]
pub enum SealError {
    /// The platform reports no support for biometric authentication at all.
    #[error("this platform does not support biometric authentication")]
    UnsupportedPlatform,

    /// No biometric sensor is present on the device.
    #[error("biometric sensor is not present")]
    HardwareAbsent,

    /// The device has no secure lock screen configured.
    #[error("device has no secure lock screen")]
    NoLockScreen,

    /// Permission to use the biometric sensor has not been granted.
    #[error("permission to use the biometric sensor has not been granted")]
    PermissionDenied,

    /// No biometric factors are enrolled on the device.
    #[error("no biometric factors are enrolled")]
    NotEnrolled,

    /// The secure key store could not be initialized or a key could not be
    /// generated.
    #[error("keystore initialization failed: {message}")]
    KeystoreInit {
        /// Message from the underlying keystore.
        message: String,
    },

    /// No key is stored under the requested alias.
    #[error("no key stored under alias '{alias}'")]
    MissingKey {
        /// The alias that held no key.
        alias: String,
    },

    /// The stored key declares capabilities other than the fixed cipher
    /// triple; the session builder refuses to fall back to a weaker mode.
    #[error("key '{alias}' declares {found}, expected {expected}")]
    KeyCapabilityMismatch {
        /// The alias of the offending key.
        alias: String,
        /// The capability triple the builder requires.
        expected: String,
        /// The capability triple the key declares.
        found: String,
    },

    /// Decryption was requested but no initialization vector has ever been
    /// recorded, i.e. nothing was ever encrypted.
    #[error("no initialization vector recorded; nothing has been encrypted yet")]
    MissingIv,

    /// Decryption was requested but the blob store holds no ciphertext.
    #[error("no encrypted data is stored")]
    NoData,

    /// A persisted hex string could not be decoded.
    #[error("invalid hex in {context}: {message}")]
    InvalidHex {
        /// What was being decoded.
        context: String,
        /// Description of the rejected input.
        message: String,
    },

    /// The cipher rejected an operation (padding, block alignment, mode
    /// misuse).
    #[error("cipher operation failed: {context}")]
    Cipher {
        /// Description of the failure.
        context: String,
    },

    /// The presented biometric factor did not match any enrolled factor.
    #[error("biometric factor was not recognized")]
    AuthenticationFailed,

    /// The platform authentication subsystem reported a hard error.
    #[error("authentication error [{code}] {message}")]
    AuthenticationError {
        /// Platform error code, surfaced verbatim.
        code: i32,
        /// Platform error message, surfaced verbatim.
        message: String,
    },

    /// A callback handler is already registered under the given key.
    #[error("a handler is already registered under key '{key}'")]
    HandlerAlreadyRegistered {
        /// The contested registration key.
        key: String,
    },

    /// The settings store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the violation.
        message: String,
    },
}

impl SealError {
    /// Creates a keystore initialization error.
    pub fn keystore_init<S: Into<String>>(message: S) -> Self {
        Self::KeystoreInit {
            message: message.into(),
        }
    }

    /// Creates an invalid-hex error.
    pub fn invalid_hex<C: Into<String>, M: Into<String>>(context: C, message: M) -> Self {
        Self::InvalidHex {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates a cipher failure error.
    pub fn cipher<S: Into<String>>(context: S) -> Self {
        Self::Cipher {
            context: context.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SealError::MissingKey {
            alias: "sealkit-device-key".to_string(),
        };
        assert!(format!("{err}").contains("sealkit-device-key"));

        let err = SealError::AuthenticationError {
            code: 7,
            message: "too many attempts".to_string(),
        };
        assert_eq!(format!("{err}"), "authentication error [7] too many attempts");

        let err = SealError::invalid_hex("stored blob", "odd number of digits");
        assert!(format!("{err}").contains("stored blob"));
    }

    #[test]
    fn test_precondition_reasons_are_distinct() {
        let reasons = [
            SealError::UnsupportedPlatform.to_string(),
            SealError::HardwareAbsent.to_string(),
            SealError::NoLockScreen.to_string(),
            SealError::PermissionDenied.to_string(),
            SealError::NotEnrolled.to_string(),
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in reasons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
