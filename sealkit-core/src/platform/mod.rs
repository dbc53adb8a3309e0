//! Platform abstraction traits for the cipher helper.
//!
//! The helper is platform-agnostic: everything it cannot implement portably
//! is abstracted behind traits that each host platform provides.
//!
//! - [`SecureKeyStore`] — named, non-exportable symmetric keys held by the
//!   platform's secure key storage
//! - [`BiometricAuthenticator`] — capability probes plus submission of one
//!   biometric challenge
//! - [`sealkit_store::SettingsStore`] — durable key-value settings (lives in
//!   its own crate; re-exported by implementations as needed)
//!
//! # Platform Implementations
//!
//! Each platform should provide default implementations:
//!
//! ## Android
//! - `SecureKeyStore`: Android Keystore with hardware-backed AES keys
//! - `BiometricAuthenticator`: `BiometricPrompt` / fingerprint manager
//!
//! ## iOS
//! - `SecureKeyStore`: Keychain Services with Secure Enclave access control
//! - `BiometricAuthenticator`: `LocalAuthentication`
//!
//! ## Testing
//! - [`memory`] — deterministic in-memory implementations

mod biometric;
mod keystore;
pub mod memory;

pub use biometric::{AuthenticationEvents, BiometricAuthenticator};
pub use keystore::{BlockMode, KeyAlgorithm, KeyHandle, KeySpec, Padding, SecureKeyStore};

// Re-export memory implementations for testing
pub use memory::MemoryPlatform;
