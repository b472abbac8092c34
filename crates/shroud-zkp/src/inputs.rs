//! # Circuit Inputs — Public Tuple and Private Witness
//!
//! The membership circuit proves: "a signature by a key whose fingerprint
//! is committed in `signer_commitment` verifies over `doc_hash`, and that
//! fingerprint is a leaf of the tree rooted at `trust_root`" — with
//! `artifact_hash` riding along as a bound public value so the proof is
//! tied to one specific ciphertext.
//!
//! Public inputs:
//! - `doc_hash`: digest of the signed document.
//! - `artifact_hash`: digest of the encrypted artifact's ciphertext.
//! - `signer_commitment`: the signer's fingerprint.
//! - `trust_root`: the allow-list Merkle root.
//!
//! Witness (private):
//! - `signature`: the signature bytes over the document digest.
//! - `signer_public_key`: the signer's Ed25519 key.
//! - `leaf_index` and `siblings`: the Merkle inclusion path.

use serde::{Deserialize, Serialize};

use shroud_core::{hex, ContentDigest};

/// Byte length of the fixed public-input encoding (four 32-byte fields).
pub const PUBLIC_INPUT_LEN: usize = 128;

/// The public-input tuple the proof binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// Digest of the signed document.
    pub doc_hash: [u8; 32],
    /// Digest of the artifact ciphertext.
    pub artifact_hash: [u8; 32],
    /// The signer's fingerprint commitment.
    pub signer_commitment: [u8; 32],
    /// The trust-list Merkle root.
    pub trust_root: [u8; 32],
}

impl PublicInputs {
    /// Assemble from digest values.
    pub fn new(
        doc_hash: &ContentDigest,
        artifact_hash: &ContentDigest,
        signer_commitment: [u8; 32],
        trust_root: [u8; 32],
    ) -> Self {
        Self {
            doc_hash: *doc_hash.as_bytes(),
            artifact_hash: *artifact_hash.as_bytes(),
            signer_commitment,
            trust_root,
        }
    }

    /// The fixed 128-byte wire encoding: `doc_hash || artifact_hash ||
    /// signer_commitment || trust_root`.
    pub fn to_bytes(&self) -> [u8; PUBLIC_INPUT_LEN] {
        let mut out = [0u8; PUBLIC_INPUT_LEN];
        out[0..32].copy_from_slice(&self.doc_hash);
        out[32..64].copy_from_slice(&self.artifact_hash);
        out[64..96].copy_from_slice(&self.signer_commitment);
        out[96..128].copy_from_slice(&self.trust_root);
        out
    }

    /// Decode from the fixed wire encoding.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PUBLIC_INPUT_LEN {
            return None;
        }
        let mut field = |range: std::ops::Range<usize>| -> [u8; 32] {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(&bytes[range]);
            arr
        };
        Some(Self {
            doc_hash: field(0..32),
            artifact_hash: field(32..64),
            signer_commitment: field(64..96),
            trust_root: field(96..128),
        })
    }
}

/// The private witness for one membership proof.
///
/// Never persisted and never logged; `Debug` redacts every field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWitness {
    /// Signature bytes over the document digest (64 bytes for Ed25519).
    pub signature: Vec<u8>,
    /// The signer's Ed25519 public key.
    pub signer_public_key: [u8; 32],
    /// Position of the signer's leaf in the trust list.
    pub leaf_index: u64,
    /// Sibling digests from the leaf level upward.
    pub siblings: Vec<[u8; 32]>,
}

impl std::fmt::Debug for MembershipWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipWitness")
            .field("signature", &"<redacted>")
            .field("signer_public_key", &hex::encode(&self.signer_public_key))
            .field("leaf_index", &self.leaf_index)
            .field("siblings", &format!("<{} digests>", self.siblings.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_core::sha256_bytes;

    fn sample() -> PublicInputs {
        PublicInputs::new(
            &sha256_bytes(b"doc"),
            &sha256_bytes(b"artifact"),
            [3u8; 32],
            [4u8; 32],
        )
    }

    #[test]
    fn encoding_is_128_bytes_in_field_order() {
        let pi = sample();
        let bytes = pi.to_bytes();
        assert_eq!(bytes.len(), PUBLIC_INPUT_LEN);
        assert_eq!(&bytes[0..32], &pi.doc_hash);
        assert_eq!(&bytes[32..64], &pi.artifact_hash);
        assert_eq!(&bytes[64..96], &pi.signer_commitment);
        assert_eq!(&bytes[96..128], &pi.trust_root);
    }

    #[test]
    fn encoding_roundtrip() {
        let pi = sample();
        let back = PublicInputs::from_bytes(&pi.to_bytes()).unwrap();
        assert_eq!(back, pi);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert!(PublicInputs::from_bytes(&[0u8; 127]).is_none());
        assert!(PublicInputs::from_bytes(&[0u8; 129]).is_none());
    }

    #[test]
    fn different_artifact_hash_different_encoding() {
        let a = sample();
        let mut b = sample();
        b.artifact_hash[0] ^= 0xff;
        assert_ne!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn witness_debug_redacts_signature() {
        let witness = MembershipWitness {
            signature: vec![0xaa; 64],
            signer_public_key: [1u8; 32],
            leaf_index: 2,
            siblings: vec![[0u8; 32]; 3],
        };
        let debug = format!("{witness:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("170, 170"));
        assert!(debug.contains("<3 digests>"));
    }

    #[test]
    fn public_inputs_serde_roundtrip() {
        let pi = sample();
        let json = serde_json::to_string(&pi).unwrap();
        let back: PublicInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pi);
    }
}
