//! Canonical hex encoding for persisted cipher material.
//!
//! The IV ledger and the encrypted blob store both persist raw bytes as hex
//! strings. Encoding is canonical: uppercase, two characters per byte, no
//! separators. Decoding is strict about malformed input (odd length, non-hex
//! characters) but accepts either letter case, matching the historical
//! decoder this replaces.

use crate::error::{SealError, SealResult};

/// Encodes bytes as canonical uppercase hex.
#[must_use]
pub fn encode_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decodes a hex string into bytes.
///
/// `context` names what is being decoded and is included in the error so a
/// corrupt persisted value is attributable.
///
/// # Errors
///
/// Returns [`SealError::InvalidHex`] for odd-length input or any non-hex
/// character; malformed input is never silently truncated.
pub fn decode(context: &str, input: &str) -> SealResult<Vec<u8>> {
    hex::decode(input).map_err(|e| SealError::invalid_hex(context, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_uppercase_two_chars_per_byte() {
        assert_eq!(encode_upper(&[0x00, 0x0A, 0xFF]), "000AFF");
        assert_eq!(encode_upper(&[0xDE, 0xAD, 0xBE, 0xEF]), "DEADBEEF");
    }

    #[test]
    fn test_roundtrip() {
        let cases: [&[u8]; 4] = [
            &[],
            &[0x00],
            &[0xFF],
            &[0x00, 0x01, 0x7F, 0x80, 0xFE, 0xFF],
        ];
        for bytes in cases {
            let encoded = encode_upper(bytes);
            assert_eq!(decode("test", &encoded).unwrap(), bytes);
        }
    }

    #[test]
    fn test_empty_string_decodes_to_empty() {
        assert_eq!(decode("test", "").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_accepts_lowercase() {
        assert_eq!(decode("test", "deadbeef").unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode("test", "DeAdBeEf").unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        let err = decode("stored iv", "ABC").unwrap_err();
        assert!(matches!(err, SealError::InvalidHex { .. }));
        assert!(format!("{err}").contains("stored iv"));
    }

    #[test]
    fn test_decode_rejects_non_hex_characters() {
        for input in ["GG", "0x41", "41 42", "zz"] {
            let err = decode("stored blob", input).unwrap_err();
            assert!(matches!(err, SealError::InvalidHex { .. }), "{input}");
        }
    }
}
