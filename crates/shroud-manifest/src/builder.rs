//! # Proof Orchestrator — Manifest Construction
//!
//! Assembles the public-input tuple and private witness, drives the proof
//! backend, and wraps the result into a [`Manifest`].
//!
//! ## Concurrency Model
//!
//! Proof generation is the dominant latency — a long-running, CPU-bound
//! blocking call into the backend. The builder runs it on a worker thread
//! and enforces an optional wall-clock timeout plus a cooperative
//! cancellation flag. The operation is all-or-nothing: on timeout or
//! cancellation no manifest value is produced and nothing is written; an
//! abandoned worker finishes in the background and its result is dropped.
//!
//! A [`ProveRequest`] carries already-computed digests only, so proof
//! generation can never race against an artifact hash still being
//! produced.
//!
//! Manifest persistence is atomic: write to a temp file in the target
//! directory, then rename.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use shroud_core::{hex, ContentDigest, Timestamp};
use shroud_crypto::{MerkleProof, SignerRecord, TrustList};
use shroud_zkp::{MembershipWitness, ProofBackend, PublicInputs};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::ManifestError;
use crate::manifest::{ArtifactKind, ArtifactSection, Manifest, SignerSection, MANIFEST_VERSION};

/// How often the builder polls for timeout and cancellation while the
/// worker runs.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Everything needed to produce one manifest.
///
/// All digests are owned, finalized values; constructing a request is the
/// point at which the `(docHash, artifactHash, trustRoot)` triple must be
/// complete.
#[derive(Debug, Clone)]
pub struct ProveRequest {
    /// Digest of the signed document.
    pub doc_hash: ContentDigest,
    /// Digest of the artifact ciphertext.
    pub artifact_hash: ContentDigest,
    /// The signer being proven a trust-list member.
    pub signer: SignerRecord,
    /// The signer's inclusion path.
    pub merkle_proof: MerkleProof,
    /// Signature bytes over the document digest, from the signature
    /// extractor.
    pub signature: Vec<u8>,
    /// The trust-list root the proof binds to.
    pub trust_root: [u8; 32],
    /// Kind of artifact being bound.
    pub artifact_kind: ArtifactKind,
}

impl ProveRequest {
    /// Assemble a request against a built trust list.
    pub fn new(
        doc_hash: ContentDigest,
        artifact_hash: ContentDigest,
        signer: SignerRecord,
        trust_list: &TrustList,
        merkle_proof: MerkleProof,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            doc_hash,
            artifact_hash,
            signer,
            merkle_proof,
            signature,
            trust_root: trust_list.root(),
            artifact_kind: ArtifactKind::Encrypted,
        }
    }

    fn public_inputs(&self) -> PublicInputs {
        PublicInputs::new(
            &self.doc_hash,
            &self.artifact_hash,
            *self.signer.fingerprint.as_bytes(),
            self.trust_root,
        )
    }

    fn witness(&self) -> MembershipWitness {
        MembershipWitness {
            signature: self.signature.clone(),
            signer_public_key: *self.signer.public_key.as_bytes(),
            leaf_index: self.merkle_proof.leaf_index as u64,
            siblings: self.merkle_proof.siblings.clone(),
        }
    }
}

/// Drives the proof backend and packages results into manifests.
pub struct ManifestBuilder {
    backend: Arc<dyn ProofBackend>,
    timeout: Option<Duration>,
    cancel: Arc<AtomicBool>,
}

impl ManifestBuilder {
    /// Create a builder over a proof backend.
    pub fn new(backend: Arc<dyn ProofBackend>) -> Self {
        Self {
            backend,
            timeout: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bound proof generation by a wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// A handle callers can set to cancel an in-flight build.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Generate the proof and produce a manifest.
    ///
    /// # Errors
    ///
    /// [`ManifestError::ProofGeneration`] on backend failure, timeout, or
    /// cancellation — the backend diagnostic is carried verbatim and the
    /// operation is never retried.
    pub fn build(&self, request: &ProveRequest) -> Result<Manifest, ManifestError> {
        let public_inputs = request.public_inputs();
        let witness = request.witness();

        tracing::info!(
            backend = self.backend.backend_name(),
            trust_root = %hex::encode(&request.trust_root),
            timeout = ?self.timeout,
            "generating membership proof"
        );

        let proof = self.run_backend(public_inputs, witness)?;
        tracing::debug!(proof_len = proof.len(), "proof generated");

        Ok(Manifest {
            version: MANIFEST_VERSION,
            doc_hash: request.doc_hash.to_hex(),
            artifact: ArtifactSection {
                kind: request.artifact_kind,
                artifact_hash: request.artifact_hash.to_hex(),
            },
            signer: SignerSection {
                public_key: hex::encode(request.signer.public_key.as_bytes()),
                fingerprint: request.signer.fingerprint.to_hex(),
            },
            trust_root: hex::encode(&request.trust_root),
            proof: BASE64.encode(&proof),
            timestamp: Timestamp::now(),
        })
    }

    /// Run `prove` on a worker thread, polling for timeout and cancellation.
    fn run_backend(
        &self,
        public_inputs: PublicInputs,
        witness: MembershipWitness,
    ) -> Result<Vec<u8>, ManifestError> {
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = backend.prove(&public_inputs, &witness);
            // The receiver may have given up; a send failure is fine.
            let _ = tx.send(result);
        });

        let deadline = self.timeout.map(|t| Instant::now() + t);
        loop {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::warn!("proof generation cancelled");
                return Err(ManifestError::ProofGeneration(
                    "cancelled before completion".to_string(),
                ));
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    tracing::warn!("proof generation timed out");
                    return Err(ManifestError::ProofGeneration(format!(
                        "timed out after {:?}",
                        self.timeout.unwrap_or_default()
                    )));
                }
            }
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(proof)) => return Ok(proof),
                Ok(Err(e)) => return Err(ManifestError::ProofGeneration(e.to_string())),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(ManifestError::ProofGeneration(
                        "proof worker terminated without a result".to_string(),
                    ));
                }
            }
        }
    }
}

/// Persist a manifest atomically: write to a temp file in the target
/// directory, then rename over the destination.
pub fn write_manifest_atomic(
    manifest: &Manifest,
    path: &std::path::Path,
) -> Result<(), ManifestError> {
    let json = manifest.to_json_pretty()?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new_in(".")?,
    };
    use std::io::Write;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| ManifestError::Io(e.error))?;
    tracing::debug!(path = %path.display(), "manifest written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use shroud_core::sha256_bytes;
    use shroud_zkp::{ProofError, VerificationKey, VerifyError, WitnessCheckBackend};

    fn request() -> ProveRequest {
        let keys: Vec<SigningKey> = (1..=4u8).map(|i| SigningKey::from_bytes(&[i; 32])).collect();
        let records: Vec<SignerRecord> =
            keys.iter().map(|k| SignerRecord::new(k.verifying_key())).collect();
        let list = TrustList::build(&records).unwrap();
        let doc_hash = sha256_bytes(b"document");
        let artifact_hash = sha256_bytes(b"ciphertext");
        let signature = keys[0].sign(doc_hash.as_bytes());
        let path = list.prove_inclusion(&records[0].fingerprint).unwrap();
        ProveRequest::new(
            doc_hash,
            artifact_hash,
            records[0].clone(),
            &list,
            path,
            signature.to_bytes().to_vec(),
        )
    }

    /// A backend that blocks until told to finish.
    struct StallingBackend {
        delay: Duration,
    }

    impl ProofBackend for StallingBackend {
        fn prove(
            &self,
            _public_inputs: &PublicInputs,
            _witness: &MembershipWitness,
        ) -> Result<Vec<u8>, ProofError> {
            thread::sleep(self.delay);
            Ok(vec![0u8; 32])
        }

        fn verify(
            &self,
            _proof: &[u8],
            _public_inputs: &PublicInputs,
            _vk: &VerificationKey,
        ) -> Result<bool, VerifyError> {
            Ok(true)
        }

        fn backend_name(&self) -> &str {
            "stalling"
        }
    }

    #[test]
    fn build_produces_valid_manifest() {
        let builder = ManifestBuilder::new(Arc::new(WitnessCheckBackend));
        let req = request();
        let manifest = builder.build(&req).unwrap();
        manifest.validate().unwrap();
        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.doc_hash, req.doc_hash.to_hex());
        assert_eq!(manifest.artifact.artifact_hash, req.artifact_hash.to_hex());
        assert_eq!(manifest.signer.fingerprint, req.signer.fingerprint.to_hex());
        assert_eq!(manifest.trust_root, hex::encode(&req.trust_root));
    }

    #[test]
    fn rebuilding_produces_a_new_manifest_value() {
        let builder = ManifestBuilder::new(Arc::new(WitnessCheckBackend));
        let req = request();
        let a = builder.build(&req).unwrap();
        let b = builder.build(&req).unwrap();
        // Same bindings and proof; the values are distinct records.
        assert_eq!(a.proof, b.proof);
        assert_eq!(a.doc_hash, b.doc_hash);
    }

    #[test]
    fn inconsistent_witness_surfaces_as_proof_generation_error() {
        let builder = ManifestBuilder::new(Arc::new(WitnessCheckBackend));
        let mut req = request();
        req.signature[7] ^= 0x01;
        let err = builder.build(&req).unwrap_err();
        match err {
            ManifestError::ProofGeneration(msg) => {
                assert!(msg.contains("witness inconsistent"));
            }
            other => panic!("expected ProofGeneration, got: {other}"),
        }
    }

    #[test]
    fn timeout_produces_no_manifest() {
        let builder = ManifestBuilder::new(Arc::new(StallingBackend {
            delay: Duration::from_secs(5),
        }))
        .with_timeout(Duration::from_millis(80));
        let err = builder.build(&request()).unwrap_err();
        match err {
            ManifestError::ProofGeneration(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected ProofGeneration, got: {other}"),
        }
    }

    #[test]
    fn cancellation_produces_no_manifest() {
        let builder = ManifestBuilder::new(Arc::new(StallingBackend {
            delay: Duration::from_secs(5),
        }));
        builder.cancel_handle().store(true, Ordering::Relaxed);
        let err = builder.build(&request()).unwrap_err();
        match err {
            ManifestError::ProofGeneration(msg) => assert!(msg.contains("cancelled")),
            other => panic!("expected ProofGeneration, got: {other}"),
        }
    }

    #[test]
    fn atomic_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let builder = ManifestBuilder::new(Arc::new(WitnessCheckBackend));
        let manifest = builder.build(&request()).unwrap();
        write_manifest_atomic(&manifest, &path).unwrap();
        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
        // No stray temp files left behind.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
