//! In-memory implementations of platform traits for testing.
//!
//! These implementations are NOT secure for production use. They are
//! designed for unit and integration testing of the cipher helper without a
//! real secure element or biometric sensor.

// Allow certain clippy lints for test-only code
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

use rand::rngs::OsRng;
use rand::RngCore;
use sealkit_store::MemorySettings;
use zeroize::Zeroizing;

use crate::cancellation::CancellationSignal;
use crate::error::SealResult;
use crate::vault::BiometricVault;

use super::{AuthenticationEvents, BiometricAuthenticator, KeyHandle, KeySpec, SecureKeyStore};

// =============================================================================
// Memory Key Store
// =============================================================================

/// One generated key with its declared capabilities.
struct StoredKey {
    spec: KeySpec,
    material: Zeroizing<[u8; 32]>,
}

/// In-memory key store generating random key material.
///
/// **FOR TESTING ONLY** — material lives in process memory (zeroized on
/// drop) and does not survive the process, so anything encrypted under it is
/// unreadable after a restart.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<String, StoredKey>>,
}

impl MemoryKeyStore {
    /// Creates a new empty key store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every stored key.
    pub fn clear(&self) {
        self.keys.write().unwrap().clear();
    }
}

impl SecureKeyStore for MemoryKeyStore {
    fn generate_key(&self, alias: &str, spec: &KeySpec) -> SealResult<()> {
        let mut material = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(material.as_mut());
        self.keys.write().unwrap().insert(
            alias.to_string(),
            StoredKey {
                spec: *spec,
                material,
            },
        );
        Ok(())
    }

    fn obtain_key(&self, alias: &str) -> SealResult<Option<KeyHandle>> {
        Ok(self
            .keys
            .read()
            .unwrap()
            .get(alias)
            .map(|stored| KeyHandle::new(alias, stored.spec, *stored.material)))
    }

    fn contains_alias(&self, alias: &str) -> SealResult<bool> {
        Ok(self.keys.read().unwrap().contains_key(alias))
    }

    fn delete_key(&self, alias: &str) -> SealResult<()> {
        self.keys.write().unwrap().remove(alias);
        Ok(())
    }
}

// =============================================================================
// Memory Authenticator
// =============================================================================

/// Scripted outcome a [`MemoryAuthenticator`] delivers for each challenge.
#[derive(Debug, Clone)]
pub enum AuthScript {
    /// Deliver a match.
    Succeed,
    /// Deliver a non-match.
    Fail,
    /// Deliver a hard platform error.
    Error {
        /// Error code to surface.
        code: i32,
        /// Error message to surface.
        message: String,
    },
    /// Deliver recoverable guidance.
    Help {
        /// Help code to surface.
        code: i32,
        /// Guidance message to surface.
        message: String,
    },
    /// Deliver nothing at all (a prompt the owner walked away from).
    Ignore,
}

/// In-memory biometric authenticator with scripted outcomes.
///
/// **FOR TESTING ONLY** — no factor is ever actually verified. Each
/// challenge is answered from a worker thread according to the configured
/// [`AuthScript`], after an optional delay, and is dropped silently when the
/// cancellation signal has fired.
pub struct MemoryAuthenticator {
    script: Mutex<AuthScript>,
    response_delay: Mutex<Duration>,
    supported: AtomicBool,
    hardware: AtomicBool,
    keyguard: AtomicBool,
    permission: AtomicBool,
    enrolled: AtomicBool,
    challenges: AtomicUsize,
}

impl MemoryAuthenticator {
    /// Creates an authenticator that reports every capability as available
    /// and answers each challenge immediately with a match.
    #[must_use]
    pub fn new() -> Self {
        Self::with_script(AuthScript::Succeed)
    }

    /// Creates an authenticator answering each challenge with `script`.
    #[must_use]
    pub fn with_script(script: AuthScript) -> Self {
        Self {
            script: Mutex::new(script),
            response_delay: Mutex::new(Duration::ZERO),
            supported: AtomicBool::new(true),
            hardware: AtomicBool::new(true),
            keyguard: AtomicBool::new(true),
            permission: AtomicBool::new(true),
            enrolled: AtomicBool::new(true),
            challenges: AtomicUsize::new(0),
        }
    }

    /// Replaces the script used for subsequent challenges.
    pub fn set_script(&self, script: AuthScript) {
        *self.script.lock().unwrap() = script;
    }

    /// Delays each response by `delay` (default: immediate).
    pub fn set_response_delay(&self, delay: Duration) {
        *self.response_delay.lock().unwrap() = delay;
    }

    /// Overrides the platform-support probe.
    pub fn set_platform_supported(&self, value: bool) {
        self.supported.store(value, Ordering::SeqCst);
    }

    /// Overrides the hardware-presence probe.
    pub fn set_hardware_present(&self, value: bool) {
        self.hardware.store(value, Ordering::SeqCst);
    }

    /// Overrides the secure-lock-screen probe.
    pub fn set_keyguard_secure(&self, value: bool) {
        self.keyguard.store(value, Ordering::SeqCst);
    }

    /// Overrides the permission probe.
    pub fn set_permission_granted(&self, value: bool) {
        self.permission.store(value, Ordering::SeqCst);
    }

    /// Overrides the enrollment probe.
    pub fn set_biometrics_enrolled(&self, value: bool) {
        self.enrolled.store(value, Ordering::SeqCst);
    }

    /// Returns how many challenges have been submitted so far.
    ///
    /// Lets tests assert that precondition failures never reach the gate.
    #[must_use]
    pub fn challenge_count(&self) -> usize {
        self.challenges.load(Ordering::SeqCst)
    }
}

impl Default for MemoryAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl BiometricAuthenticator for MemoryAuthenticator {
    fn platform_supported(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    fn hardware_present(&self) -> bool {
        self.hardware.load(Ordering::SeqCst)
    }

    fn keyguard_secure(&self) -> bool {
        self.keyguard.load(Ordering::SeqCst)
    }

    fn permission_granted(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    fn biometrics_enrolled(&self) -> bool {
        self.enrolled.load(Ordering::SeqCst)
    }

    fn authenticate(&self, signal: CancellationSignal, events: Arc<dyn AuthenticationEvents>) {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap().clone();
        let delay = *self.response_delay.lock().unwrap();

        thread::spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            // Cancellation is a silent abort: no event may follow it.
            if signal.is_cancelled() {
                return;
            }
            match script {
                AuthScript::Succeed => events.on_authentication_succeeded(),
                AuthScript::Fail => events.on_authentication_failed(),
                AuthScript::Error { code, message } => {
                    events.on_authentication_error(code, &message);
                }
                AuthScript::Help { code, message } => {
                    events.on_authentication_help(code, &message);
                }
                AuthScript::Ignore => {}
            }
        });
    }
}

// =============================================================================
// Memory Platform Bundle
// =============================================================================

/// Combines all in-memory implementations for easy test setup.
///
/// # Example
///
/// ```
/// use sealkit_core::platform::MemoryPlatform;
///
/// let platform = MemoryPlatform::new();
/// let vault = platform.vault();
/// vault.init().expect("in-memory init cannot fail preconditions");
/// ```
pub struct MemoryPlatform {
    /// In-memory key store.
    pub keystore: Arc<MemoryKeyStore>,
    /// In-memory authenticator.
    pub authenticator: Arc<MemoryAuthenticator>,
    /// In-memory settings.
    pub settings: Arc<MemorySettings>,
}

impl MemoryPlatform {
    /// Creates a new memory platform with default components.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keystore: Arc::new(MemoryKeyStore::new()),
            authenticator: Arc::new(MemoryAuthenticator::new()),
            settings: Arc::new(MemorySettings::new()),
        }
    }

    /// Builds a vault wired to this platform's components.
    #[must_use]
    pub fn vault(&self) -> BiometricVault {
        BiometricVault::new(
            Arc::clone(&self.keystore) as Arc<dyn SecureKeyStore>,
            Arc::clone(&self.authenticator) as Arc<dyn BiometricAuthenticator>,
            Arc::clone(&self.settings) as Arc<dyn sealkit_store::SettingsStore>,
        )
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
