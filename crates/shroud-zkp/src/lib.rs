//! # shroud-zkp — Proof Backend Seam
//!
//! Defines the boundary between shroud and the zero-knowledge proving
//! engine:
//!
//! - **Traits** (`traits.rs`): the [`ProofBackend`] trait fixes the
//!   byte-level prove/verify contract every engine must satisfy. The engine
//!   itself — circuit compilation, constraint systems, curve arithmetic —
//!   lives behind this seam and is not part of this workspace.
//!
//! - **Inputs** (`inputs.rs`): the public-input tuple and the private
//!   membership witness, with their fixed wire encodings.
//!
//! - **Witness check** (`witness_check.rs`): [`WitnessCheckBackend`], a
//!   deterministic backend that validates witness consistency and emits a
//!   transparent commitment digest. No zero-knowledge privacy — development
//!   and testing only.
//!
//! ## Crate Policy
//!
//! - Depends on `shroud-core` and `shroud-crypto` internally.
//! - No `unsafe`.

pub mod inputs;
pub mod traits;
pub mod witness_check;

pub use inputs::{MembershipWitness, PublicInputs, PUBLIC_INPUT_LEN};
pub use traits::{ProofBackend, ProofError, VerificationKey, VerifyError};
pub use witness_check::WitnessCheckBackend;
