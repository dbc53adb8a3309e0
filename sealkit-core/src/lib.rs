//! Credential-gated symmetric cipher helper.
//!
//! One secret blob, encrypted under a device-held AES key that can only be
//! exercised after the device owner passes a biometric challenge. The crate
//! owns the portable protocol (cipher sessions, IV bookkeeping, callback
//! dispatch, cancellation) and delegates everything platform-bound to
//! traits.
//!
//! # Architecture
//!
//! - **Platform traits** ([`platform`]) — secure key storage and the
//!   biometric gate, provided per platform; in-memory implementations ship
//!   for testing.
//! - **IV ledger** ([`IvLedger`]) — persists the IV of the most recent
//!   encryption under the `last_iv` setting so a later decryption can
//!   reconstruct an equivalent cipher.
//! - **Encrypted blob store** ([`EncryptedBlobStore`]) — single-slot
//!   hex-encoded ciphertext under the `encrypted_data` setting.
//! - **Cipher sessions** ([`CipherSession`]) — AES-256/CBC/PKCS7, fresh IV
//!   on encrypt, ledger IV on decrypt, no fallback to weaker modes.
//! - **Orchestration** ([`BiometricVault`]) — the gated store / retrieve /
//!   authorize operations, each reporting through an [`AuthCallback`]
//!   exactly once.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sealkit_core::platform::MemoryPlatform;
//! use sealkit_core::{AuthCallback, CancellationSignal};
//!
//! struct PrintOutcome;
//!
//! impl AuthCallback for PrintOutcome {
//!     fn on_success(&self, result: &str) {
//!         println!("ok: {result}");
//!     }
//!     fn on_failure(&self, message: &str) {
//!         println!("failed: {message}");
//!     }
//!     fn on_help(&self, code: i32, message: &str) {
//!         println!("hint [{code}]: {message}");
//!     }
//! }
//!
//! let platform = MemoryPlatform::new();
//! let vault = platform.vault();
//! vault.init().expect("memory platform meets every precondition");
//!
//! let signal = CancellationSignal::new();
//! vault.store("the launch code", &signal, Arc::new(PrintOutcome));
//! ```

mod blob;
mod callback;
mod cancellation;
mod cipher;
pub mod digest;
pub mod encoding;
mod error;
mod ledger;
pub mod logger;
pub mod platform;
mod registry;
mod vault;

pub use blob::{EncryptedBlobStore, ENCRYPTED_DATA_SETTING};
pub use callback::{AuthCallback, AuthOutcome, AUTHORIZED};
pub use cancellation::CancellationSignal;
pub use cipher::{CipherMode, CipherSession, IV_LEN};
pub use error::{SealError, SealResult};
pub use ledger::{IvLedger, LAST_IV_SETTING};
pub use registry::CallbackRegistry;
pub use vault::{BiometricVault, DEVICE_KEY_ALIAS, ENCRYPTED_RESULT};
