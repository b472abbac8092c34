//! # shroud-manifest — Binding Manifests and Verification
//!
//! Ties the public commitments of one attestation together and checks them
//! apart again:
//!
//! - **Manifest** (`manifest.rs`): the persisted record combining document
//!   hash, artifact hash, signer, trust root, proof, and timestamp.
//! - **Metadata** (`metadata.rs`): the encryption-metadata sidecar a
//!   recipient needs to decrypt an artifact.
//! - **Builder** (`builder.rs`): the proof orchestrator — assembles public
//!   inputs and witness, drives the proof backend with timeout and
//!   cancellation, and persists manifests atomically.
//! - **Verifier** (`verifier.rs`): the five ordered checks with itemized
//!   diagnostics.
//! - **Tamper** (`tamper.rs`): single-field mutation harness asserting that
//!   each mutation fails at its corresponding check.
//!
//! ## Crate Policy
//!
//! - Manifests are immutable once produced; re-proving yields a new one.
//! - Every verification failure names the binding that failed.

pub mod builder;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod tamper;
pub mod verifier;

pub use builder::{write_manifest_atomic, ManifestBuilder, ProveRequest};
pub use error::ManifestError;
pub use manifest::{ArtifactKind, Manifest, MANIFEST_VERSION};
pub use metadata::EncryptionMetadata;
pub use tamper::{Mutation, TamperDetector, TamperOutcome, TamperReport};
pub use verifier::{CheckResult, CheckStatus, ManifestVerifier, VerificationReport, VerifyCheck};
