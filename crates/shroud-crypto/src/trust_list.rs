//! # Trust List — Fixed-Depth Merkle Allow-List
//!
//! Assembles signer fingerprints into a fixed-depth binary Merkle tree,
//! computes the root, and derives deterministic sibling-path inclusion
//! proofs.
//!
//! ## Hashing (Domain Separation)
//!
//! - Level-0 node: `SHA256(0x00 || fingerprint)`.
//! - Internal node: `SHA256(0x01 || left || right)`.
//!
//! The hash is fixed per deployment and must match the proof circuit's
//! Merkle gadget bit-for-bit. SHA-256 is the canonical choice here;
//! a circuit-friendly hash would be configured as a different
//! `DigestAlgorithm` without changing the tree shape.
//!
//! ## Padding
//!
//! Leaf sets are padded to `2^depth` with [`SENTINEL_LEAF`] — the all-zero
//! pattern, which no admissible identity maps to. Construction rejects any
//! real fingerprint equal to the sentinel, so padding slots and admitted
//! entries are never ambiguous.
//!
//! ## Immutability
//!
//! A built [`TrustList`] is never mutated. A new allow-list version is a
//! new `build()` call producing a new value and a new root; concurrent
//! readers of an existing list need no synchronization.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use shroud_core::DigestAlgorithm;

use crate::error::CryptoError;
use crate::fingerprint::{Fingerprint, SignerRecord};

/// The Merkle node hash fixed for this deployment.
pub const TRUST_TREE_ALGORITHM: DigestAlgorithm = DigestAlgorithm::Sha256;

/// The padding sentinel: all zeroes, reserved and never a real fingerprint.
pub const SENTINEL_LEAF: [u8; 32] = [0u8; 32];

const LEAF_NODE_TAG: u8 = 0x00;
const INNER_NODE_TAG: u8 = 0x01;

/// `SHA256(0x00 || leaf)` — level-0 node hash.
fn leaf_node_hash(leaf: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_NODE_TAG]);
    hasher.update(leaf);
    hasher.finalize().into()
}

/// `SHA256(0x01 || left || right)` — internal node hash.
fn inner_node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([INNER_NODE_TAG]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// A sibling path proving that a leaf belongs to a tree with a known root.
///
/// Valid only relative to the trust list it was derived from. `siblings`
/// runs bottom-to-top and always has exactly `depth` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Position of the leaf, in `[0, 2^depth)`.
    pub leaf_index: usize,
    /// Sibling digests from the leaf level up to just below the root.
    pub siblings: Vec<[u8; 32]>,
}

impl MerkleProof {
    /// Recompute the root this proof commits to for the given leaf.
    ///
    /// Returns the recomputed root; callers compare it against the trusted
    /// root. The walk uses the index bits to decide left/right placement at
    /// each level.
    pub fn recompute_root(&self, leaf: &Fingerprint) -> [u8; 32] {
        let mut node = leaf_node_hash(leaf.as_bytes());
        let mut index = self.leaf_index;
        for sibling in &self.siblings {
            node = if index & 1 == 0 {
                inner_node_hash(&node, sibling)
            } else {
                inner_node_hash(sibling, &node)
            };
            index >>= 1;
        }
        node
    }
}

/// An immutable allow-list of signer fingerprints with its Merkle root.
#[derive(Debug, Clone)]
pub struct TrustList {
    leaves: Vec<Fingerprint>,
    depth: usize,
    levels: Vec<Vec<[u8; 32]>>,
    root: [u8; 32],
}

impl TrustList {
    /// Build a trust list from admitted signer records.
    ///
    /// Insertion order is significant and preserved; callers wanting a
    /// canonical ordering must sort before building. Depth is
    /// `ceil(log2(n))` with a minimum of 1, and the leaf level is padded to
    /// `2^depth` with [`SENTINEL_LEAF`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::TrustList`] for an empty record set or a
    /// fingerprint equal to the padding sentinel.
    pub fn build(records: &[SignerRecord]) -> Result<Self, CryptoError> {
        let leaves: Vec<Fingerprint> = records.iter().map(|r| r.fingerprint).collect();
        Self::from_fingerprints(leaves)
    }

    /// Build a trust list directly from fingerprints.
    pub fn from_fingerprints(leaves: Vec<Fingerprint>) -> Result<Self, CryptoError> {
        if leaves.is_empty() {
            return Err(CryptoError::TrustList(
                "cannot build a trust list from an empty allow-list".to_string(),
            ));
        }
        if let Some(pos) = leaves.iter().position(|l| l.as_bytes() == &SENTINEL_LEAF) {
            return Err(CryptoError::TrustList(format!(
                "leaf at index {pos} equals the padding sentinel"
            )));
        }

        let depth = tree_depth(leaves.len());
        let capacity = 1usize << depth;

        let mut level: Vec<[u8; 32]> = Vec::with_capacity(capacity);
        for leaf in &leaves {
            level.push(leaf_node_hash(leaf.as_bytes()));
        }
        let sentinel_node = leaf_node_hash(&SENTINEL_LEAF);
        level.resize(capacity, sentinel_node);

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(level);
        for _ in 0..depth {
            let below = levels
                .last()
                .ok_or_else(|| CryptoError::TrustList("tree levels unexpectedly empty".into()))?;
            let mut above = Vec::with_capacity(below.len() / 2);
            for pair in below.chunks_exact(2) {
                above.push(inner_node_hash(&pair[0], &pair[1]));
            }
            levels.push(above);
        }

        let root = levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .ok_or_else(|| CryptoError::TrustList("tree has no root level".into()))?;

        Ok(Self {
            leaves,
            depth,
            levels,
            root,
        })
    }

    /// The Merkle root.
    pub fn root(&self) -> [u8; 32] {
        self.root
    }

    /// Tree depth (number of sibling digests in every proof).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of real (non-padding) leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns true if the list holds no real leaves. Construction rejects
    /// empty lists, so this is always false for a built value.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Total leaf capacity, `2^depth`.
    pub fn capacity(&self) -> usize {
        1usize << self.depth
    }

    /// The admitted fingerprints in insertion order.
    pub fn leaves(&self) -> &[Fingerprint] {
        &self.leaves
    }

    /// Derive the inclusion proof for a fingerprint.
    ///
    /// If the same fingerprint was admitted at multiple indices, the proof
    /// for the *first* occurrence by insertion order is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NotInTrustList`] if the fingerprint is absent.
    pub fn prove_inclusion(&self, fingerprint: &Fingerprint) -> Result<MerkleProof, CryptoError> {
        let index = self
            .leaves
            .iter()
            .position(|l| l == fingerprint)
            .ok_or_else(|| CryptoError::NotInTrustList(fingerprint.to_hex()))?;
        self.proof_for_index(index)
    }

    /// Derive the inclusion proof for a specific leaf index.
    pub fn proof_for_index(&self, index: usize) -> Result<MerkleProof, CryptoError> {
        if index >= self.leaves.len() {
            return Err(CryptoError::TrustList(format!(
                "leaf index {index} out of range (have {} leaves)",
                self.leaves.len()
            )));
        }
        let mut siblings = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in &self.levels[..self.depth] {
            let sibling_position = position ^ 1;
            siblings.push(level[sibling_position]);
            position >>= 1;
        }
        Ok(MerkleProof {
            leaf_index: index,
            siblings,
        })
    }

    /// Check a proof against this list's root in constant time.
    pub fn verify_proof(&self, fingerprint: &Fingerprint, proof: &MerkleProof) -> bool {
        if proof.siblings.len() != self.depth {
            return false;
        }
        let recomputed = proof.recompute_root(fingerprint);
        recomputed.ct_eq(&self.root).into()
    }
}

/// `ceil(log2(n))`, minimum 1.
fn tree_depth(leaf_count: usize) -> usize {
    let mut depth = 1;
    while (1usize << depth) < leaf_count {
        depth += 1;
    }
    depth
}


#[cfg(test)]
mod proptests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use proptest::prelude::*;

    proptest! {
        /// Every inserted leaf yields a verifying proof, for any list size.
        #[test]
        fn inclusion_holds_for_all_sizes(n in 1usize..=32) {
            let recs: Vec<SignerRecord> = (0..n)
                .map(|i| {
                    let mut seed = [0u8; 32];
                    seed[0] = (i + 1) as u8;
                    seed[1] = 0xA5;
                    SignerRecord::new(SigningKey::from_bytes(&seed).verifying_key())
                })
                .collect();
            let list = TrustList::build(&recs).unwrap();
            prop_assert!(list.capacity() >= n);
            for record in &recs {
                let proof = list.prove_inclusion(&record.fingerprint).unwrap();
                prop_assert!(list.verify_proof(&record.fingerprint, &proof));
            }
        }

        /// Roots are byte-identical across rebuilds of the same sequence.
        #[test]
        fn root_deterministic(n in 1usize..=16) {
            let recs: Vec<SignerRecord> = (0..n)
                .map(|i| {
                    let mut seed = [0u8; 32];
                    seed[0] = (i + 1) as u8;
                    SignerRecord::new(SigningKey::from_bytes(&seed).verifying_key())
                })
                .collect();
            let a = TrustList::build(&recs).unwrap();
            let b = TrustList::build(&recs).unwrap();
            prop_assert_eq!(a.root(), b.root());
        }
    }
}
