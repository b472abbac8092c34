//! # Content Digests — Algorithm-Tagged 32-Byte Commitments
//!
//! Defines [`ContentDigest`] and [`DigestAlgorithm`], the commitment
//! primitive used for document hashes, artifact hashes, fingerprints, and
//! trust roots.
//!
//! ## Two input paths
//!
//! - [`sha256_digest()`] hashes [`CanonicalBytes`] — the only path for
//!   structured data.
//! - [`sha256_bytes()`] hashes raw bytes — reserved for payloads with no
//!   canonical form: ciphertexts, plaintext file contents, concatenated
//!   public-input encodings.
//!
//! Keeping the raw path as a separate, named function makes every bypass of
//! canonicalization visible at the call site.
//!
//! ## Algorithm tag
//!
//! SHA-256 is the deployment hash. `Poseidon2` is a reserved tag for
//! circuit-friendly deployments so commitment structures can migrate
//! without a wire-format change; no Poseidon2 computation exists here.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CoreError;
use crate::hex;

/// The hash algorithm that produced a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256 — the canonical deployment hash.
    Sha256,
    /// Poseidon2 — reserved tag for arithmetic-circuit-friendly deployments.
    Poseidon2,
}

impl DigestAlgorithm {
    /// Algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Poseidon2 => "poseidon2",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte content digest with its algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a digest from raw bytes and an algorithm tag.
    ///
    /// Prefer [`sha256_digest()`] / [`sha256_bytes()`] for computing fresh
    /// digests.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Parse a SHA-256 digest from 64 lowercase hex characters.
    pub fn from_hex(digest_hex: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode_array32(digest_hex)?;
        Ok(Self::new(DigestAlgorithm::Sha256, bytes))
    }

    /// Render the digest value as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// The signature accepts only `&CanonicalBytes`, so structured data cannot
/// reach a digest through a non-canonical serialization.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    sha256_bytes(data.as_bytes())
}

/// Compute a SHA-256 content digest from raw bytes.
///
/// For payloads with no canonical form only — ciphertexts, file contents,
/// fixed-layout binary encodings. Structured data goes through
/// [`sha256_digest()`].
pub fn sha256_bytes(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Streaming SHA-256 for composite inputs hashed in pieces.
#[derive(Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl Sha256Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the accumulator.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Finalize into a tagged content digest.
    pub fn finalize(self) -> ContentDigest {
        let hash = self.hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        ContentDigest::new(DigestAlgorithm::Sha256, bytes)
    }

    /// Finalize into a lowercase hex string.
    pub fn finalize_hex(self) -> String {
        self.finalize().to_hex()
    }
}
