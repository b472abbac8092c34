//! # Hex Encoding Helpers
//!
//! Lowercase hex encoding and validated decoding for digests, keys, and
//! nonces in persisted formats. All persisted hex in shroud is lowercase;
//! decoding accepts either case and normalizes.

use crate::error::CoreError;

/// Encode bytes as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string into bytes.
///
/// # Errors
///
/// Returns [`CoreError::Hex`] for odd-length input or non-hex characters.
pub fn decode(s: &str) -> Result<Vec<u8>, CoreError> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(CoreError::Hex(format!(
            "hex string has odd length: {}",
            s.len()
        )));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| CoreError::Hex(format!("invalid hex at position {i}: {e}")))
        })
        .collect()
}

/// Decode exactly 32 bytes (64 hex chars), the size of every digest,
/// Ed25519 key, and curve scalar in the persisted formats.
pub fn decode_array32(s: &str) -> Result<[u8; 32], CoreError> {
    let bytes = decode(s)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CoreError::Hex(format!("expected 32 bytes (64 hex chars), got {len} bytes"))
    })
}

/// Returns true if `s` is exactly 64 hex characters.
pub fn is_hex_32(s: &str) -> bool {
    let s = s.trim();
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}
