//! Cipher session construction and execution.
//!
//! Sessions are fixed to AES-256/CBC/PKCS7, the triple the device key is
//! generated for. A key declaring anything else is refused outright; the
//! builder never falls back to a weaker mode.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{SealError, SealResult};
use crate::ledger::IvLedger;
use crate::platform::{KeyHandle, KeySpec, SecureKeyStore};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block length; the IV is exactly one block.
pub const IV_LEN: usize = 16;

/// Direction a cipher session is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CipherMode {
    /// Encrypt fresh plaintext, generating a new IV.
    Encrypt,
    /// Decrypt the stored blob, reusing the ledger's IV.
    Decrypt,
}

/// One ready-to-run cipher bound to the device key and an IV.
///
/// Building an encrypt session generates a fresh IV and records it in the
/// [`IvLedger`] before the session is handed out; building a decrypt session
/// reuses the ledger's IV, so a later decryption reconstructs an equivalent
/// cipher.
#[derive(Debug)]
pub struct CipherSession {
    mode: CipherMode,
    key: KeyHandle,
    iv: [u8; IV_LEN],
}

impl CipherSession {
    /// Builds a session for `mode` over the key stored under `alias`.
    ///
    /// # Errors
    ///
    /// - [`SealError::MissingKey`] when the alias holds no key.
    /// - [`SealError::KeyCapabilityMismatch`] when the key declares a triple
    ///   other than AES-256/CBC/PKCS7.
    /// - [`SealError::MissingIv`] when decrypting before anything was ever
    ///   encrypted.
    /// - [`SealError::Cipher`] when the recorded IV has the wrong length.
    pub fn build(
        mode: CipherMode,
        keystore: &dyn SecureKeyStore,
        alias: &str,
        ledger: &IvLedger,
    ) -> SealResult<Self> {
        let key = keystore
            .obtain_key(alias)?
            .ok_or_else(|| SealError::MissingKey {
                alias: alias.to_string(),
            })?;

        let expected = KeySpec::aes_cbc_pkcs7();
        if !key.spec().triple_matches(&expected) {
            return Err(SealError::KeyCapabilityMismatch {
                alias: alias.to_string(),
                expected: expected.to_string(),
                found: key.spec().to_string(),
            });
        }

        let iv = match mode {
            CipherMode::Encrypt => {
                let mut iv = [0u8; IV_LEN];
                OsRng.fill_bytes(&mut iv);
                // The ledger entry must exist before the session is handed
                // out, or a crash mid-operation leaves the blob orphaned.
                ledger.record(&iv)?;
                iv
            }
            CipherMode::Decrypt => {
                let stored = ledger.last()?.ok_or(SealError::MissingIv)?;
                <[u8; IV_LEN]>::try_from(stored.as_slice()).map_err(|_| {
                    SealError::cipher(format!(
                        "recorded initialization vector has length {}, expected {IV_LEN}",
                        stored.len()
                    ))
                })?
            }
        };

        Ok(Self { mode, key, iv })
    }

    /// Returns the direction this session was built for.
    #[must_use]
    pub const fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Returns the IV this session is bound to.
    #[must_use]
    pub const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Encrypts `plaintext` under the session key and IV.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::Cipher`] when called on a decrypt session.
    pub fn encrypt(&self, plaintext: &[u8]) -> SealResult<Vec<u8>> {
        if self.mode != CipherMode::Encrypt {
            return Err(SealError::cipher(format!(
                "session was built for {}, not encryption",
                self.mode
            )));
        }
        let cipher = Aes256CbcEnc::new(self.key.material().into(), (&self.iv).into());
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    /// Decrypts `ciphertext` under the session key and IV.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::Cipher`] when called on an encrypt session, or
    /// when padding or block alignment is rejected (tampered or mismatched
    /// ciphertext).
    pub fn decrypt(&self, ciphertext: &[u8]) -> SealResult<Vec<u8>> {
        if self.mode != CipherMode::Decrypt {
            return Err(SealError::cipher(format!(
                "session was built for {}, not decryption",
                self.mode
            )));
        }
        let cipher = Aes256CbcDec::new(self.key.material().into(), (&self.iv).into());
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| SealError::cipher(format!("padding or block alignment rejected: {e}")))
    }
}
