//! # Error Types — Structured Error Hierarchy
//!
//! Errors for the foundational layer. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations; higher layers wrap
//! these with their own domain-specific variants.

use thiserror::Error;

/// Top-level error type for the foundational layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    Hex(String),

    /// Timestamp parsing or validation failed.
    #[error("timestamp error: {0}")]
    Temporal(String),

    /// Digest parsing or validation failed.
    #[error("digest error: {0}")]
    Digest(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations;
    /// JCS number serialization has non-deterministic edge cases for them.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
