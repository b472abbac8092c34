//! # shroud-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for shroud:
//!
//! - **Fingerprints** — deterministic 32-byte signer commitments derived
//!   from Ed25519 public keys.
//! - **Trust lists** — fixed-depth binary Merkle trees over fingerprints
//!   with sentinel padding and deterministic inclusion proofs.
//! - **Envelopes** — authenticated key-agreement encryption (X25519 or
//!   NIST P-256 ECDH, HKDF-SHA256, AES-256-GCM) binding a ciphertext to a
//!   document digest through AAD.
//! - **Agreement secrets** — scoped private-scalar handles, zeroized on
//!   drop, consumed one seal/open call at a time.
//!
//! ## Crate Policy
//!
//! - Depends only on `shroud-core` internally.
//! - No mocking of cryptographic operations in tests — all tests use real
//!   digests, real key agreement, real AEAD.
//! - `unsafe` prohibited.

pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod secret;
pub mod trust_list;

pub use envelope::{open, seal, EncryptedArtifact, AEAD_ALGORITHM, NONCE_LEN};
pub use error::CryptoError;
pub use fingerprint::{Fingerprint, SignerRecord};
pub use secret::{AgreementSecret, CurveId};
pub use trust_list::{MerkleProof, TrustList, SENTINEL_LEAF};
