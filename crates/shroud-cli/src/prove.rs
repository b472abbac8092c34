//! # Proof Orchestration
//!
//! Produces a manifest for one attestation: loads the allow-list, derives
//! the signer's inclusion proof, binds the artifact ciphertext, drives the
//! proof backend, and writes the manifest atomically.
//!
//! The signature tuple normally comes from the external signature
//! extractor as `--signature` + `--signer-pub`. For workflows where this
//! tool holds the signing key, `--signer-key` signs the document digest
//! in-process instead.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

use shroud_core::{hex, sha256_bytes, ContentDigest};
use shroud_crypto::SignerRecord;
use shroud_manifest::{write_manifest_atomic, ManifestBuilder, ProveRequest};
use shroud_zkp::WitnessCheckBackend;

/// Arguments for `shroud prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Hex digest of the signed document.
    pub doc_hash: String,

    /// Ciphertext file the proof binds to.
    #[arg(long)]
    pub artifact: PathBuf,

    /// Allow-list file for the trust list in force.
    #[arg(long)]
    pub trust_list: PathBuf,

    /// Ed25519 signing key file; signs the document digest in-process.
    #[arg(long, conflicts_with_all = ["signature", "signer_pub"])]
    pub signer_key: Option<PathBuf>,

    /// Pre-extracted signature over the document digest (hex).
    #[arg(long, requires = "signer_pub")]
    pub signature: Option<String>,

    /// Pre-extracted signer public key (hex).
    #[arg(long, requires = "signature")]
    pub signer_pub: Option<String>,

    /// Abort proof generation after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Where to write the manifest.
    #[arg(long)]
    pub out: PathBuf,
}

/// Build and persist a manifest.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let doc_hash = ContentDigest::from_hex(&args.doc_hash).context("parsing doc hash")?;
    let ciphertext = std::fs::read(&args.artifact)
        .with_context(|| format!("reading {}", args.artifact.display()))?;
    let artifact_hash = sha256_bytes(&ciphertext);

    let (signature, verifying_key) = signature_tuple(args, &doc_hash)?;
    let signer = SignerRecord::new(verifying_key);

    let list = crate::build_trust_list(&args.trust_list)?;
    let merkle_proof = list
        .prove_inclusion(&signer.fingerprint)
        .context("signer is not in the allow-list")?;

    let request = ProveRequest::new(
        doc_hash,
        artifact_hash,
        signer,
        &list,
        merkle_proof,
        signature,
    );

    let mut builder = ManifestBuilder::new(Arc::new(WitnessCheckBackend));
    if let Some(secs) = args.timeout_secs {
        builder = builder.with_timeout(Duration::from_secs(secs));
    }
    let manifest = builder.build(&request)?;
    write_manifest_atomic(&manifest, &args.out)?;

    tracing::info!(
        manifest = %args.out.display(),
        trust_root = %manifest.trust_root,
        "manifest written"
    );
    println!("{}", args.out.display());
    Ok(0)
}

/// Resolve the `(signature bytes, verifying key)` tuple from the flags.
fn signature_tuple(
    args: &ProveArgs,
    doc_hash: &ContentDigest,
) -> Result<(Vec<u8>, VerifyingKey)> {
    if let Some(key_path) = &args.signer_key {
        let seed = hex::decode_array32(&crate::read_key_hex(key_path)?)
            .context("parsing signer key")?;
        let key = SigningKey::from_bytes(&seed);
        let signature = key.sign(doc_hash.as_bytes());
        return Ok((signature.to_bytes().to_vec(), key.verifying_key()));
    }
    match (&args.signature, &args.signer_pub) {
        (Some(sig_hex), Some(pub_hex)) => {
            let signature = hex::decode(sig_hex).context("parsing --signature")?;
            let key_bytes = hex::decode_array32(pub_hex).context("parsing --signer-pub")?;
            let key = VerifyingKey::from_bytes(&key_bytes).context("signer public key rejected")?;
            Ok((signature, key))
        }
        _ => bail!("either --signer-key or --signature with --signer-pub is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_manifest::Manifest;

    struct Setup {
        dir: tempfile::TempDir,
        args: ProveArgs,
    }

    fn setup() -> Setup {
        let dir = tempfile::tempdir().unwrap();

        let keys: Vec<SigningKey> = (1..=4u8).map(|i| SigningKey::from_bytes(&[i; 32])).collect();
        let allowlist: Vec<String> = keys
            .iter()
            .map(|k| hex::encode(k.verifying_key().as_bytes()))
            .collect();
        let allowlist_path = dir.path().join("allowlist.json");
        std::fs::write(&allowlist_path, serde_json::to_string(&allowlist).unwrap()).unwrap();

        let artifact_path = dir.path().join("artifact.enc");
        std::fs::write(&artifact_path, b"ciphertext bytes for proving").unwrap();

        let signer_key_path = dir.path().join("signer.key");
        std::fs::write(&signer_key_path, hex::encode(&[2u8; 32])).unwrap();

        let out = dir.path().join("manifest.json");
        let doc_hash = sha256_bytes(b"document").to_hex();

        Setup {
            dir,
            args: ProveArgs {
                doc_hash,
                artifact: artifact_path,
                trust_list: allowlist_path,
                signer_key: Some(signer_key_path),
                signature: None,
                signer_pub: None,
                timeout_secs: Some(10),
                out,
            },
        }
    }

    #[test]
    fn prove_writes_a_valid_manifest() {
        let s = setup();
        assert_eq!(run_prove(&s.args).unwrap(), 0);
        let manifest = Manifest::load(&s.args.out).unwrap();
        manifest.validate().unwrap();
        assert_eq!(manifest.doc_hash, s.args.doc_hash);
    }

    #[test]
    fn pre_extracted_signature_tuple_accepted() {
        let mut s = setup();
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let doc = ContentDigest::from_hex(&s.args.doc_hash).unwrap();
        let signature = key.sign(doc.as_bytes());
        s.args.signer_key = None;
        s.args.signature = Some(hex::encode(&signature.to_bytes()));
        s.args.signer_pub = Some(hex::encode(key.verifying_key().as_bytes()));
        assert_eq!(run_prove(&s.args).unwrap(), 0);
        assert!(s.args.out.exists());
    }

    #[test]
    fn signer_outside_allowlist_fails() {
        let s = setup();
        let outsider_key_path = s.dir.path().join("outsider.key");
        std::fs::write(&outsider_key_path, hex::encode(&[66u8; 32])).unwrap();
        let mut args = s.args;
        args.signer_key = Some(outsider_key_path);
        let err = run_prove(&args).unwrap_err();
        assert!(format!("{err:#}").contains("not in the allow-list"));
        assert!(!args.out.exists());
    }

    #[test]
    fn missing_signature_flags_fail() {
        let mut s = setup();
        s.args.signer_key = None;
        assert!(run_prove(&s.args).is_err());
    }
}
