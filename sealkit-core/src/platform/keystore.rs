//! Secure key store trait for platform-held symmetric keys.
//!
//! The key store holds one named symmetric key per helper installation. The
//! key is created lazily on first successful initialization and is never
//! exported: implementations hand out [`KeyHandle`]s whose material is
//! readable only inside this crate.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};

use crate::error::SealResult;

/// Symmetric key algorithm a key declares at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    /// AES with a 256-bit key.
    Aes256,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes256 => write!(f, "AES-256"),
        }
    }
}

/// Block cipher mode a key declares at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    /// Cipher block chaining.
    Cbc,
    /// Counter mode.
    Ctr,
    /// Galois/counter mode.
    Gcm,
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cbc => write!(f, "CBC"),
            Self::Ctr => write!(f, "CTR"),
            Self::Gcm => write!(f, "GCM"),
        }
    }
}

/// Padding scheme a key declares at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// No padding.
    None,
    /// PKCS#7 block padding.
    Pkcs7,
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NoPadding"),
            Self::Pkcs7 => write!(f, "PKCS7"),
        }
    }
}

/// Capabilities declared for a key at generation time.
///
/// The portable rendition of a key-generation parameter spec: the store
/// enforces these capabilities, and the cipher session builder refuses keys
/// whose declared triple differs from what it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    /// Key algorithm.
    pub algorithm: KeyAlgorithm,
    /// Block cipher mode.
    pub block_mode: BlockMode,
    /// Padding scheme.
    pub padding: Padding,
    /// Whether exercising the key requires a fresh owner authentication.
    pub user_auth_required: bool,
}

impl KeySpec {
    /// The one spec the helper generates: AES-256/CBC/PKCS7, bound to owner
    /// authentication.
    #[must_use]
    pub const fn aes_cbc_pkcs7() -> Self {
        Self {
            algorithm: KeyAlgorithm::Aes256,
            block_mode: BlockMode::Cbc,
            padding: Padding::Pkcs7,
            user_auth_required: true,
        }
    }

    /// Returns `true` when the algorithm/mode/padding triple matches `other`.
    ///
    /// `user_auth_required` is deliberately excluded: it gates *when* the key
    /// may be used, not *how* it ciphers.
    #[must_use]
    pub fn triple_matches(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
            && self.block_mode == other.block_mode
            && self.padding == other.padding
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.algorithm, self.block_mode, self.padding)
    }
}

/// Opaque handle over a platform-held symmetric key.
///
/// Constructed by key store implementations; the raw material is readable
/// only inside this crate. Dropping the handle zeroizes the material.
pub struct KeyHandle {
    alias: String,
    spec: KeySpec,
    material: SecretBox<[u8; 32]>,
}

impl KeyHandle {
    /// Wraps raw key material under `alias` with its declared `spec`.
    ///
    /// Implementations should pass material straight from their secure
    /// source; once wrapped it cannot be read back through the public API.
    #[must_use]
    pub fn new<S: Into<String>>(alias: S, spec: KeySpec, material: [u8; 32]) -> Self {
        Self {
            alias: alias.into(),
            spec,
            material: SecretBox::new(Box::new(material)),
        }
    }

    /// Returns the alias this key is stored under.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the capabilities declared at generation time.
    #[must_use]
    pub const fn spec(&self) -> &KeySpec {
        &self.spec
    }

    /// Exposes the raw material to the cipher session builder.
    pub(crate) fn material(&self) -> &[u8; 32] {
        self.material.expose_secret()
    }
}

impl fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHandle")
            .field("alias", &self.alias)
            .field("spec", &self.spec)
            .field("material", &"<redacted>")
            .finish()
    }
}

/// Named, non-exportable symmetric keys held by the platform.
///
/// # Security Requirements
///
/// - Key material MUST be non-exportable when the platform supports it.
/// - A key generated with `user_auth_required` MUST only be exercisable
///   after a fresh owner authentication.
/// - Implementations MUST enforce the declared [`KeySpec`]: a key generated
///   for one capability triple must not silently serve another.
pub trait SecureKeyStore: Send + Sync {
    /// Generates a new key under `alias` with the declared `spec`, replacing
    /// any existing key under that alias.
    ///
    /// Replacing a key permanently orphans data encrypted under its
    /// predecessor; callers own that decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform key store rejects the generation.
    fn generate_key(&self, alias: &str, spec: &KeySpec) -> SealResult<()>;

    /// Returns a handle to the key stored under `alias`, or `None` if the
    /// alias is vacant.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform key store cannot be queried.
    fn obtain_key(&self, alias: &str) -> SealResult<Option<KeyHandle>>;

    /// Checks whether a key exists under `alias`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform key store cannot be queried.
    fn contains_alias(&self, alias: &str) -> SealResult<bool> {
        Ok(self.obtain_key(alias)?.is_some())
    }

    /// Deletes the key under `alias`. Deleting a vacant alias is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error only for platform key store failures.
    fn delete_key(&self, alias: &str) -> SealResult<()>;
}
