//! # Signer Fingerprints — Leaf Encoding
//!
//! Derives the 32-byte fingerprint that represents a signer identity in a
//! trust list. The encoding is deterministic (the same public key always
//! yields the same fingerprint) and collision-resistant (SHA-256 over a
//! domain-tagged encoding of the key).
//!
//! ## Security Invariant
//!
//! Key material is validated before encoding: the key must be exactly 32
//! bytes and must decompress to a valid Ed25519 curve point. Off-curve or
//! wrong-length input is rejected with [`CryptoError::MalformedIdentity`],
//! never silently hashed.
//!
//! The all-zero fingerprint is reserved as the trust-list padding sentinel
//! and is rejected here, so a padding slot can never be confused with an
//! admitted identity.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use shroud_core::hex;

use crate::error::CryptoError;

/// Domain tag prepended to key bytes before hashing.
///
/// Must match the leaf encoding the proof circuit expects bit-for-bit.
const LEAF_DOMAIN: &[u8] = b"shroud.leaf.v1";

/// A deterministic 32-byte commitment to a signer's public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Derive a fingerprint from raw Ed25519 public key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedIdentity`] if the key is not exactly
    /// 32 bytes or does not decompress to a valid curve point.
    pub fn from_public_key_bytes(key_bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = key_bytes.try_into().map_err(|_| {
            CryptoError::MalformedIdentity(format!(
                "expected 32-byte Ed25519 public key, got {} bytes",
                key_bytes.len()
            ))
        })?;
        // Off-curve rejection: decompression must succeed.
        VerifyingKey::from_bytes(&arr).map_err(|e| {
            CryptoError::MalformedIdentity(format!("public key is not a valid curve point: {e}"))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(LEAF_DOMAIN);
        hasher.update(arr);
        let digest: [u8; 32] = hasher.finalize().into();

        if digest == [0u8; 32] {
            // The all-zero pattern is the padding sentinel.
            return Err(CryptoError::MalformedIdentity(
                "fingerprint collides with the padding sentinel".to_string(),
            ));
        }
        Ok(Self(digest))
    }

    /// Derive a fingerprint from a parsed verifying key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(LEAF_DOMAIN);
        hasher.update(key.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Parse a fingerprint from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode_array32(s).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Access the raw 32-byte fingerprint.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A signer admitted to a trust list: the public key and its fingerprint.
///
/// Immutable once constructed; admission to a new allow-list version means
/// building a new record set and a new trust list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerRecord {
    /// The fingerprint committing to the public key.
    pub fingerprint: Fingerprint,
    /// The signer's Ed25519 verifying key.
    pub public_key: VerifyingKey,
}

impl SignerRecord {
    /// Build a record from a parsed verifying key.
    pub fn new(public_key: VerifyingKey) -> Self {
        Self {
            fingerprint: Fingerprint::from_verifying_key(&public_key),
            public_key,
        }
    }

    /// Build a record from raw public key bytes, validating the key material.
    pub fn from_public_key_bytes(key_bytes: &[u8]) -> Result<Self, CryptoError> {
        let fingerprint = Fingerprint::from_public_key_bytes(key_bytes)?;
        let arr: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| CryptoError::MalformedIdentity("key length changed underfoot".into()))?;
        let public_key = VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::MalformedIdentity(e.to_string()))?;
        Ok(Self {
            fingerprint,
            public_key,
        })
    }
}
