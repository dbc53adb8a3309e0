//! String digest helpers.
//!
//! Lowercase hex digests with leading zeros preserved. The `hex` crate
//! encodes every byte as exactly two characters, so the classic
//! leading-zero-stripping bug of integer-based formatting cannot occur here.

use sha1::{Digest, Sha1};
use sha2::Sha256;

/// Returns the SHA-1 digest of `data` as lowercase hex.
#[must_use]
pub fn sha1_hex(data: &str) -> String {
    hex::encode(Sha1::digest(data.as_bytes()))
}

/// Returns the SHA-256 digest of `data` as lowercase hex.
#[must_use]
pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}
