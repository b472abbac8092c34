//! # Manifest Error Types
//!
//! One variant per verification check plus orchestration carriers. The
//! variant alone answers "which binding failed" — callers never parse
//! message strings.

use thiserror::Error;

/// Errors from manifest construction, persistence, and verification.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest is structurally invalid: missing fields, unsupported
    /// version, or malformed digests.
    #[error("manifest format error: {0}")]
    ManifestFormat(String),

    /// The supplied artifact's digest does not match the manifest's
    /// artifact hash.
    #[error("artifact binding mismatch: {0}")]
    ArtifactBinding(String),

    /// The verifier's expected trust root does not match the manifest's.
    #[error("trust root mismatch: {0}")]
    TrustRootMismatch(String),

    /// The proof bytes fail size/structure sanity.
    #[error("proof format error: {0}")]
    ProofFormat(String),

    /// The proof backend reported a generation failure, or generation was
    /// cancelled or timed out. Backend diagnostics are carried verbatim;
    /// generation is never retried.
    #[error("proof generation failed: {0}")]
    ProofGeneration(String),

    /// The proof backend rejected the proof against the public inputs.
    #[error("proof verification failed: {0}")]
    ProofVerification(String),

    /// Filesystem error while reading or persisting.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
