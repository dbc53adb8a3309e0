//! Gated encrypt / decrypt / authorize orchestration.
//!
//! [`BiometricVault`] wires the platform traits together: it probes the
//! authenticator's capabilities eagerly, builds the cipher session, submits
//! the biometric challenge, and, on the authenticator's worker thread, runs
//! the cipher and persists or returns the payload. Exactly one callback
//! method fires per operation; a cancelled attempt fires none.
//!
//! # Concurrency
//!
//! One outstanding operation per vault instance is the supported usage.
//! Issuing a second operation while one is in flight is not serialized here;
//! use one vault per concurrent flow or serialize externally. The calling
//! thread never blocks: outcomes arrive on whatever thread the underlying
//! authenticator chooses, so marshal back to a UI context yourself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sealkit_store::SettingsStore;

use crate::blob::EncryptedBlobStore;
use crate::callback::{AuthCallback, AuthOutcome, AUTHORIZED};
use crate::cancellation::CancellationSignal;
use crate::cipher::{CipherMode, CipherSession};
use crate::error::{SealError, SealResult};
use crate::ledger::IvLedger;
use crate::platform::{AuthenticationEvents, BiometricAuthenticator, KeySpec, SecureKeyStore};

/// Alias the device key is generated under. One key per installation.
pub const DEVICE_KEY_ALIAS: &str = "sealkit-device-key";

/// Result text reported by a successful store operation.
pub const ENCRYPTED_RESULT: &str = "Encrypted";

/// The three gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Operation {
    Encrypt,
    Decrypt,
    Authorize,
}

/// Lifecycle of one operation, tracked for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Authenticating,
    Encrypting,
    Decrypting,
    Done,
    Cancelled,
    Failed,
}

/// Event sink for one operation: translates authenticator events into the
/// caller's callback, enforcing the one-callback-per-operation contract.
struct OperationSink {
    op: Operation,
    signal: CancellationSignal,
    callback: Arc<dyn AuthCallback>,
    fired: AtomicBool,
    phase: Mutex<Phase>,
    session: Mutex<Option<CipherSession>>,
    plaintext: Mutex<Option<String>>,
    blobs: EncryptedBlobStore,
}

impl OperationSink {
    fn set_phase(&self, phase: Phase) {
        if let Ok(mut current) = self.phase.lock() {
            *current = phase;
        }
        log::debug!("{} operation entered phase {phase:?}", self.op);
    }

    /// Dispatches `outcome` unless the attempt was cancelled or an outcome
    /// already fired.
    fn deliver(&self, outcome: AuthOutcome) {
        if self.signal.is_cancelled() {
            self.set_phase(Phase::Cancelled);
            return;
        }
        if self.fired.swap(true, Ordering::SeqCst) {
            log::warn!("{} operation produced a second outcome; suppressed", self.op);
            return;
        }
        self.set_phase(match outcome {
            AuthOutcome::Failure(_) => Phase::Failed,
            AuthOutcome::Success(_) | AuthOutcome::Help { .. } => Phase::Done,
        });
        outcome.dispatch(self.callback.as_ref());
    }

    fn take_session(&self) -> SealResult<CipherSession> {
        self.session
            .lock()
            .map_err(|_| SealError::internal("operation session lock poisoned"))?
            .take()
            .ok_or_else(|| SealError::internal("operation has no cipher session"))
    }

    fn run_encrypt(&self) -> SealResult<()> {
        let session = self.take_session()?;
        let plaintext = self
            .plaintext
            .lock()
            .map_err(|_| SealError::internal("operation plaintext lock poisoned"))?
            .take()
            .ok_or_else(|| SealError::internal("operation has no plaintext"))?;
        let ciphertext = session.encrypt(plaintext.as_bytes())?;
        self.blobs.save(&ciphertext)
    }

    fn run_decrypt(&self) -> SealResult<String> {
        let session = self.take_session()?;
        let stored = self.blobs.load()?.ok_or(SealError::NoData)?;
        let payload = session.decrypt(&stored)?;
        String::from_utf8(payload)
            .map_err(|_| SealError::cipher("decrypted payload is not valid UTF-8"))
    }
}

impl AuthenticationEvents for OperationSink {
    fn on_authentication_succeeded(&self) {
        if self.signal.is_cancelled() {
            self.set_phase(Phase::Cancelled);
            return;
        }
        match self.op {
            Operation::Authorize => {
                self.deliver(AuthOutcome::Success(AUTHORIZED.to_string()));
            }
            Operation::Encrypt => {
                self.set_phase(Phase::Encrypting);
                match self.run_encrypt() {
                    Ok(()) => self.deliver(AuthOutcome::Success(ENCRYPTED_RESULT.to_string())),
                    Err(e) => self.deliver(AuthOutcome::Failure(format!("encryption failed: {e}"))),
                }
            }
            Operation::Decrypt => {
                self.set_phase(Phase::Decrypting);
                match self.run_decrypt() {
                    Ok(payload) => self.deliver(AuthOutcome::Success(payload)),
                    Err(e) => self.deliver(AuthOutcome::Failure(format!("decryption failed: {e}"))),
                }
            }
        }
    }

    fn on_authentication_failed(&self) {
        self.deliver(AuthOutcome::Failure(
            SealError::AuthenticationFailed.to_string(),
        ));
    }

    fn on_authentication_error(&self, code: i32, message: &str) {
        self.deliver(AuthOutcome::Failure(
            SealError::AuthenticationError {
                code,
                message: message.to_string(),
            }
            .to_string(),
        ));
    }

    fn on_authentication_help(&self, code: i32, message: &str) {
        self.deliver(AuthOutcome::Help {
            code,
            message: message.to_string(),
        });
    }
}

/// Credential-gated store for one secret payload.
///
/// Explicitly constructed with its collaborators; hold it wherever your
/// dependency graph puts long-lived services, not in a global.
pub struct BiometricVault {
    keystore: Arc<dyn SecureKeyStore>,
    authenticator: Arc<dyn BiometricAuthenticator>,
    ledger: IvLedger,
    blobs: EncryptedBlobStore,
    key_alias: String,
}

impl BiometricVault {
    /// Creates a vault using the default device key alias.
    #[must_use]
    pub fn new(
        keystore: Arc<dyn SecureKeyStore>,
        authenticator: Arc<dyn BiometricAuthenticator>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self::with_key_alias(keystore, authenticator, settings, DEVICE_KEY_ALIAS)
    }

    /// Creates a vault whose device key lives under `key_alias`.
    #[must_use]
    pub fn with_key_alias<S: Into<String>>(
        keystore: Arc<dyn SecureKeyStore>,
        authenticator: Arc<dyn BiometricAuthenticator>,
        settings: Arc<dyn SettingsStore>,
        key_alias: S,
    ) -> Self {
        Self {
            keystore,
            authenticator,
            ledger: IvLedger::new(Arc::clone(&settings)),
            blobs: EncryptedBlobStore::new(settings),
            key_alias: key_alias.into(),
        }
    }

    /// Returns the alias the device key is stored under.
    #[must_use]
    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    /// Verifies every precondition and ensures the device key exists,
    /// generating it on first use.
    ///
    /// # Errors
    ///
    /// Returns the first unmet precondition, or
    /// [`SealError::KeystoreInit`] when key generation fails.
    pub fn init(&self) -> SealResult<()> {
        self.check_preconditions()?;
        self.ensure_device_key()
    }

    /// Encrypts `plaintext` and persists the resulting blob once the owner
    /// passes the biometric gate; reports `"Encrypted"` on success.
    ///
    /// The fresh IV is recorded before the challenge is shown, so a failed
    /// or abandoned attempt still invalidates the previous blob's IV.
    pub fn store(
        &self,
        plaintext: &str,
        signal: &CancellationSignal,
        callback: Arc<dyn AuthCallback>,
    ) {
        if plaintext.is_empty() {
            callback.on_failure("plaintext is empty");
            return;
        }
        self.begin(
            Operation::Encrypt,
            Some(plaintext.to_string()),
            signal,
            callback,
        );
    }

    /// Decrypts the stored blob once the owner passes the biometric gate and
    /// reports the plaintext on success.
    pub fn retrieve(&self, signal: &CancellationSignal, callback: Arc<dyn AuthCallback>) {
        self.begin(Operation::Decrypt, None, signal, callback);
    }

    /// Runs the biometric gate alone, touching neither cipher nor stored
    /// state; reports [`AUTHORIZED`] on success.
    pub fn authorize(&self, signal: &CancellationSignal, callback: Arc<dyn AuthCallback>) {
        self.begin(Operation::Authorize, None, signal, callback);
    }

    /// Precondition chain, in the order the platform reports them.
    fn check_preconditions(&self) -> SealResult<()> {
        let gate = self.authenticator.as_ref();
        if !gate.platform_supported() {
            return Err(SealError::UnsupportedPlatform);
        }
        if !gate.hardware_present() {
            return Err(SealError::HardwareAbsent);
        }
        if !gate.keyguard_secure() {
            return Err(SealError::NoLockScreen);
        }
        if !gate.permission_granted() {
            return Err(SealError::PermissionDenied);
        }
        if !gate.biometrics_enrolled() {
            return Err(SealError::NotEnrolled);
        }
        Ok(())
    }

    fn ensure_device_key(&self) -> SealResult<()> {
        if self.keystore.contains_alias(&self.key_alias)? {
            return Ok(());
        }
        log::info!("generating device key under alias '{}'", self.key_alias);
        self.keystore
            .generate_key(&self.key_alias, &KeySpec::aes_cbc_pkcs7())
            .map_err(|e| SealError::keystore_init(format!("key generation failed: {e}")))
    }

    /// Shared entry point: eager checks, session construction, challenge
    /// submission. Precondition and build failures report synchronously
    /// through `on_failure` and never reach the authentication gate.
    fn begin(
        &self,
        op: Operation,
        plaintext: Option<String>,
        signal: &CancellationSignal,
        callback: Arc<dyn AuthCallback>,
    ) {
        if let Err(e) = self.check_preconditions() {
            log::warn!("{op} operation refused: {e}");
            callback.on_failure(&e.to_string());
            return;
        }

        let session = match op {
            Operation::Authorize => None,
            Operation::Encrypt | Operation::Decrypt => {
                let mode = if op == Operation::Encrypt {
                    CipherMode::Encrypt
                } else {
                    CipherMode::Decrypt
                };
                match CipherSession::build(mode, self.keystore.as_ref(), &self.key_alias, &self.ledger)
                {
                    Ok(session) => Some(session),
                    Err(e) => {
                        log::warn!("{op} operation could not build a cipher session: {e}");
                        callback.on_failure(&e.to_string());
                        return;
                    }
                }
            }
        };

        let sink = Arc::new(OperationSink {
            op,
            signal: signal.clone(),
            callback,
            fired: AtomicBool::new(false),
            phase: Mutex::new(Phase::Idle),
            session: Mutex::new(session),
            plaintext: Mutex::new(plaintext),
            blobs: self.blobs.clone(),
        });
        sink.set_phase(Phase::Authenticating);
        self.authenticator
            .authenticate(signal.clone(), sink as Arc<dyn AuthenticationEvents>);
    }
}
