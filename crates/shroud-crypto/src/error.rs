//! # Cryptographic Error Types
//!
//! Structured errors for all cryptographic operations in `shroud-crypto`.
//! Every failure names the operation that rejected the input, so callers
//! can report which binding or check failed without string matching.

use thiserror::Error;

/// Errors from cryptographic operations in shroud.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Identity key material is the wrong length or off-curve.
    #[error("malformed identity: {0}")]
    MalformedIdentity(String),

    /// The fingerprint is not present in the trust list.
    #[error("fingerprint not in trust list: {0}")]
    NotInTrustList(String),

    /// Trust list construction or proof derivation failed.
    #[error("trust list error: {0}")]
    TrustList(String),

    /// Key agreement failed (curve mismatch, invalid peer key, or a
    /// non-contributory shared secret).
    #[error("key agreement failed: {0}")]
    KeyAgreement(String),

    /// Symmetric encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// AEAD tag verification failed: tampered ciphertext, wrong key, or
    /// wrong document binding. No plaintext is produced.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Decrypted plaintext does not match the expected digest.
    #[error("plaintext integrity mismatch: expected {expected}, got {actual}")]
    IntegrityMismatch {
        /// The digest the caller expected (hex).
        expected: String,
        /// The digest of the decrypted plaintext (hex).
        actual: String,
    },

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_identity_display() {
        let err = CryptoError::MalformedIdentity("expected 32 bytes, got 31".to_string());
        assert!(format!("{err}").contains("31"));
    }

    #[test]
    fn not_in_trust_list_display() {
        let err = CryptoError::NotInTrustList("ab".repeat(32));
        assert!(format!("{err}").contains("not in trust list"));
    }

    #[test]
    fn integrity_mismatch_display_names_both_digests() {
        let err = CryptoError::IntegrityMismatch {
            expected: "aa".repeat(32),
            actual: "bb".repeat(32),
        };
        let msg = format!("{err}");
        assert!(msg.contains(&"aa".repeat(32)));
        assert!(msg.contains(&"bb".repeat(32)));
    }

    #[test]
    fn authentication_display() {
        let err = CryptoError::Authentication("tag check failed".to_string());
        assert!(format!("{err}").contains("authentication failed"));
    }
}
