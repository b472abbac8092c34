//! # shroud-core — Foundational Types
//!
//! The bedrock crate of the shroud workspace. Every other crate depends on
//! `shroud-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All digest computation over structured
//!    data flows through `CanonicalBytes::new()`. No raw
//!    `serde_json::to_vec()` for digests, ever. This removes the
//!    wrong-serialization-path defect class by construction.
//!
//! 2. **Algorithm-tagged digests.** `ContentDigest` carries a
//!    `DigestAlgorithm` so commitment structures can migrate to a
//!    circuit-friendly hash without a wire-format change.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with `Z` suffix at
//!    seconds precision, matching the canonical serialization rules.
//!
//! 4. **Raw-byte digests are explicit.** `sha256_bytes()` exists for
//!    payloads with no canonical form (ciphertexts, file contents) and is
//!    the only sanctioned bypass of `CanonicalBytes`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shroud-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_bytes, sha256_digest, ContentDigest, DigestAlgorithm, Sha256Accumulator};
pub use error::{CanonicalizationError, CoreError};
pub use temporal::Timestamp;
