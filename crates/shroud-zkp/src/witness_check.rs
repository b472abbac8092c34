//! # Witness-Check Backend
//!
//! A deterministic, transparent proof backend for development and testing.
//! `prove()` validates the witness against the claimed public inputs — the
//! same consistency a real membership circuit would constrain — and emits a
//! SHA-256 commitment over the public-input encoding. `verify()` recomputes
//! that commitment and compares.
//!
//! ## Security Notice
//!
//! **NOT PRIVATE.** The emitted proof is a transparent hash anyone can
//! recompute from the public inputs. This backend exists so the
//! orchestration and verification layers can be exercised end-to-end
//! without a proving engine; a real engine replaces it behind
//! [`ProofBackend`] with no caller changes.

use ed25519_dalek::{Signature, VerifyingKey};
use subtle::ConstantTimeEq;

use shroud_core::Sha256Accumulator;
use shroud_crypto::{Fingerprint, MerkleProof};

use crate::inputs::{MembershipWitness, PublicInputs};
use crate::traits::{ProofBackend, ProofError, VerificationKey, VerifyError};

/// Domain tag mixed into the commitment digest.
const PROOF_DOMAIN: &[u8] = b"shroud.witness-check.v1";

/// Byte length of proofs this backend emits.
pub const WITNESS_CHECK_PROOF_LEN: usize = 32;

/// Deterministic witness-consistency backend. Transparent, no ZK privacy.
#[derive(Debug, Default)]
pub struct WitnessCheckBackend;

impl WitnessCheckBackend {
    /// The verification key this backend expects: its domain tag.
    pub fn verification_key() -> VerificationKey {
        VerificationKey::new(PROOF_DOMAIN.to_vec())
    }

    /// `SHA256(domain || public_inputs)` — the transparent proof value.
    fn commitment(public_inputs: &PublicInputs) -> [u8; 32] {
        let mut acc = Sha256Accumulator::new();
        acc.update(PROOF_DOMAIN);
        acc.update(&public_inputs.to_bytes());
        *acc.finalize().as_bytes()
    }

    /// Check the witness against the claimed public inputs.
    ///
    /// Mirrors the membership circuit's constraints: commitment opening,
    /// signature validity over the document digest, and Merkle path
    /// consistency with the trust root.
    fn check_witness(
        public_inputs: &PublicInputs,
        witness: &MembershipWitness,
    ) -> Result<(), ProofError> {
        // Commitment opening: fingerprint(key) == signer_commitment.
        let fingerprint =
            Fingerprint::from_public_key_bytes(&witness.signer_public_key).map_err(|e| {
                ProofError::WitnessInconsistent(format!("signer key rejected: {e}"))
            })?;
        if fingerprint.as_bytes() != &public_inputs.signer_commitment {
            return Err(ProofError::WitnessInconsistent(
                "signer key does not open the fingerprint commitment".to_string(),
            ));
        }

        // Signature validity over the document digest.
        let verifying_key = VerifyingKey::from_bytes(&witness.signer_public_key)
            .map_err(|e| ProofError::WitnessInconsistent(format!("signer key rejected: {e}")))?;
        let signature = Signature::from_slice(&witness.signature).map_err(|e| {
            ProofError::WitnessInconsistent(format!("signature bytes rejected: {e}"))
        })?;
        verifying_key
            .verify_strict(&public_inputs.doc_hash, &signature)
            .map_err(|e| {
                ProofError::WitnessInconsistent(format!(
                    "signature does not verify over the document digest: {e}"
                ))
            })?;

        // Merkle path consistency with the trust root.
        let capacity = 1u64
            .checked_shl(witness.siblings.len() as u32)
            .unwrap_or(0);
        if witness.leaf_index >= capacity {
            return Err(ProofError::WitnessInconsistent(format!(
                "leaf index {} out of range for depth {}",
                witness.leaf_index,
                witness.siblings.len()
            )));
        }
        let path = MerkleProof {
            leaf_index: witness.leaf_index as usize,
            siblings: witness.siblings.clone(),
        };
        let recomputed = path.recompute_root(&fingerprint);
        if recomputed != public_inputs.trust_root {
            return Err(ProofError::WitnessInconsistent(
                "Merkle path does not fold to the trust root".to_string(),
            ));
        }

        Ok(())
    }
}

impl ProofBackend for WitnessCheckBackend {
    fn prove(
        &self,
        public_inputs: &PublicInputs,
        witness: &MembershipWitness,
    ) -> Result<Vec<u8>, ProofError> {
        Self::check_witness(public_inputs, witness)?;
        Ok(Self::commitment(public_inputs).to_vec())
    }

    fn verify(
        &self,
        proof: &[u8],
        public_inputs: &PublicInputs,
        verification_key: &VerificationKey,
    ) -> Result<bool, VerifyError> {
        if verification_key.bytes != PROOF_DOMAIN {
            return Err(VerifyError::KeyMismatch(
                "verification key does not carry the witness-check domain tag".to_string(),
            ));
        }
        if proof.len() != WITNESS_CHECK_PROOF_LEN {
            return Err(VerifyError::MalformedProof(format!(
                "expected {WITNESS_CHECK_PROOF_LEN} proof bytes, got {}",
                proof.len()
            )));
        }
        let expected = Self::commitment(public_inputs);
        Ok(proof.ct_eq(&expected).into())
    }

    fn backend_name(&self) -> &str {
        "witness-check"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use shroud_core::sha256_bytes;
    use shroud_crypto::{SignerRecord, TrustList};

    struct Fixture {
        public_inputs: PublicInputs,
        witness: MembershipWitness,
    }

    /// A consistent (public inputs, witness) pair over a 4-signer list.
    fn fixture() -> Fixture {
        let keys: Vec<SigningKey> = (1..=4u8).map(|i| SigningKey::from_bytes(&[i; 32])).collect();
        let records: Vec<SignerRecord> =
            keys.iter().map(|k| SignerRecord::new(k.verifying_key())).collect();
        let list = TrustList::build(&records).unwrap();

        let signer = &keys[2];
        let record = &records[2];
        let doc_hash = sha256_bytes(b"signed document");
        let artifact_hash = sha256_bytes(b"ciphertext bytes");
        let signature = signer.sign(doc_hash.as_bytes());
        let path = list.prove_inclusion(&record.fingerprint).unwrap();

        Fixture {
            public_inputs: PublicInputs::new(
                &doc_hash,
                &artifact_hash,
                *record.fingerprint.as_bytes(),
                list.root(),
            ),
            witness: MembershipWitness {
                signature: signature.to_bytes().to_vec(),
                signer_public_key: *record.public_key.as_bytes(),
                leaf_index: path.leaf_index as u64,
                siblings: path.siblings,
            },
        }
    }

    #[test]
    fn valid_witness_proves_and_verifies() {
        let f = fixture();
        let backend = WitnessCheckBackend;
        let proof = backend.prove(&f.public_inputs, &f.witness).unwrap();
        assert_eq!(proof.len(), WITNESS_CHECK_PROOF_LEN);
        let ok = backend
            .verify(&proof, &f.public_inputs, &WitnessCheckBackend::verification_key())
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn prove_is_deterministic() {
        let f = fixture();
        let backend = WitnessCheckBackend;
        let a = backend.prove(&f.public_inputs, &f.witness).unwrap();
        let b = backend.prove(&f.public_inputs, &f.witness).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_signature_rejected() {
        let mut f = fixture();
        f.witness.signature[10] ^= 0x01;
        let err = WitnessCheckBackend.prove(&f.public_inputs, &f.witness).unwrap_err();
        assert!(matches!(err, ProofError::WitnessInconsistent(_)));
    }

    #[test]
    fn foreign_signer_key_rejected() {
        let mut f = fixture();
        // A valid key that does not open the commitment.
        f.witness.signer_public_key =
            *SigningKey::from_bytes(&[9u8; 32]).verifying_key().as_bytes();
        let err = WitnessCheckBackend.prove(&f.public_inputs, &f.witness).unwrap_err();
        match err {
            ProofError::WitnessInconsistent(msg) => assert!(msg.contains("commitment")),
            other => panic!("expected WitnessInconsistent, got: {other}"),
        }
    }

    #[test]
    fn corrupted_merkle_path_rejected() {
        let mut f = fixture();
        f.witness.siblings[0][0] ^= 0x01;
        let err = WitnessCheckBackend.prove(&f.public_inputs, &f.witness).unwrap_err();
        match err {
            ProofError::WitnessInconsistent(msg) => assert!(msg.contains("trust root")),
            other => panic!("expected WitnessInconsistent, got: {other}"),
        }
    }

    #[test]
    fn wrong_leaf_index_rejected() {
        let mut f = fixture();
        f.witness.leaf_index ^= 1;
        assert!(WitnessCheckBackend.prove(&f.public_inputs, &f.witness).is_err());
    }

    #[test]
    fn out_of_range_leaf_index_rejected() {
        let mut f = fixture();
        f.witness.leaf_index = 100;
        let err = WitnessCheckBackend.prove(&f.public_inputs, &f.witness).unwrap_err();
        match err {
            ProofError::WitnessInconsistent(msg) => assert!(msg.contains("out of range")),
            other => panic!("expected WitnessInconsistent, got: {other}"),
        }
    }

    #[test]
    fn verify_rejects_wrong_length_proof() {
        let f = fixture();
        let err = WitnessCheckBackend
            .verify(&[0u8; 16], &f.public_inputs, &WitnessCheckBackend::verification_key())
            .unwrap_err();
        assert!(matches!(err, VerifyError::MalformedProof(_)));
    }

    #[test]
    fn verify_rejects_foreign_verification_key() {
        let f = fixture();
        let err = WitnessCheckBackend
            .verify(&[0u8; 32], &f.public_inputs, &VerificationKey::new(b"other".to_vec()))
            .unwrap_err();
        assert!(matches!(err, VerifyError::KeyMismatch(_)));
    }

    #[test]
    fn any_public_input_perturbation_fails_verification() {
        let f = fixture();
        let backend = WitnessCheckBackend;
        let proof = backend.prove(&f.public_inputs, &f.witness).unwrap();
        let vk = WitnessCheckBackend::verification_key();

        let mut doc = f.public_inputs.clone();
        doc.doc_hash[0] ^= 1;
        assert!(!backend.verify(&proof, &doc, &vk).unwrap());

        let mut artifact = f.public_inputs.clone();
        artifact.artifact_hash[0] ^= 1;
        assert!(!backend.verify(&proof, &artifact, &vk).unwrap());

        let mut commitment = f.public_inputs.clone();
        commitment.signer_commitment[0] ^= 1;
        assert!(!backend.verify(&proof, &commitment, &vk).unwrap());

        let mut root = f.public_inputs.clone();
        root.trust_root[0] ^= 1;
        assert!(!backend.verify(&proof, &root, &vk).unwrap());
    }

    #[test]
    fn backend_name() {
        assert_eq!(WitnessCheckBackend.backend_name(), "witness-check");
    }
}
