//! # Proof Backend Trait
//!
//! The abstract interface to the zero-knowledge proving engine. All
//! implementations — the witness-check backend here, real SNARK/STARK
//! engines elsewhere — satisfy this trait, so callers are engine-agnostic
//! at compile time.
//!
//! ## Contract
//!
//! - `prove` is blocking and potentially expensive (tens of seconds to
//!   minutes for real engines). Callers own timeout and cancellation; the
//!   backend owns nothing but the computation.
//! - A prove failure means the witness does not satisfy the constraints for
//!   the claimed public inputs — it is not a transient fault and must not
//!   be retried.
//! - `verify` is cheap and must be safe to call concurrently; the trait
//!   requires `Send + Sync`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inputs::{MembershipWitness, PublicInputs};

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The witness does not satisfy the constraints for the claimed public
    /// inputs (inconsistent signature, Merkle path, or commitment).
    #[error("witness inconsistent with public inputs: {0}")]
    WitnessInconsistent(String),

    /// Internal prover failure.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof bytes are structurally invalid for this backend.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The verification key does not belong to this backend or circuit.
    #[error("verification key mismatch: {0}")]
    KeyMismatch(String),
}

/// Opaque verification key material for a proof backend.
///
/// Real engines carry circuit-specific key bytes here; the witness-check
/// backend uses a fixed tag. The orchestration layer treats the contents as
/// opaque either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Backend-defined key bytes.
    pub bytes: Vec<u8>,
}

impl VerificationKey {
    /// Wrap raw backend key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Abstract interface to a zero-knowledge proof engine.
///
/// Object-safe so orchestration can hold `Arc<dyn ProofBackend>` and swap
/// engines by configuration.
pub trait ProofBackend: Send + Sync {
    /// Generate a proof that the witness satisfies the membership circuit
    /// for the given public inputs. Blocking; all-or-nothing.
    fn prove(
        &self,
        public_inputs: &PublicInputs,
        witness: &MembershipWitness,
    ) -> Result<Vec<u8>, ProofError>;

    /// Verify a proof against public inputs and a verification key.
    ///
    /// `Ok(false)` means a well-formed proof that does not verify;
    /// structural problems are errors.
    fn verify(
        &self,
        proof: &[u8],
        public_inputs: &PublicInputs,
        verification_key: &VerificationKey,
    ) -> Result<bool, VerifyError>;

    /// Human-readable backend name for diagnostics.
    fn backend_name(&self) -> &str;
}
