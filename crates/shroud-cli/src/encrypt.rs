//! # Artifact Encryption
//!
//! Seals a file for a recipient, bound to a document digest, and writes the
//! ciphertext plus its metadata sidecar. The sender's secret is loaded just
//! before the seal call and dropped (zeroized) immediately after.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use shroud_core::{hex, ContentDigest};
use shroud_crypto::{seal, AgreementSecret, CurveId};
use shroud_manifest::EncryptionMetadata;

/// Arguments for `shroud encrypt`.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// File to encrypt.
    pub file: PathBuf,

    /// Sender secret key file (hex seed).
    #[arg(long)]
    pub sender_key: PathBuf,

    /// Recipient public key file (hex).
    #[arg(long)]
    pub recipient_pub: PathBuf,

    /// Key-agreement curve family.
    #[arg(long, default_value = "x25519")]
    pub curve: String,

    /// Hex digest of the signed document this artifact binds to.
    #[arg(long)]
    pub doc_hash: String,

    /// Output directory; defaults to the input file's directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Encrypt a file and write artifact + metadata.
pub fn run_encrypt(args: &EncryptArgs) -> Result<u8> {
    let plaintext = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let doc_hash = ContentDigest::from_hex(&args.doc_hash).context("parsing --doc-hash")?;
    let curve: CurveId = args.curve.parse()?;

    let recipient_pub = hex::decode(&crate::read_key_hex(&args.recipient_pub)?)
        .context("parsing recipient public key")?;

    // Scoped: the sender secret lives exactly as long as the seal call.
    let (artifact, artifact_hash) = {
        let sender = AgreementSecret::from_seed_hex(curve, &crate::read_key_hex(&args.sender_key)?)?;
        seal(&plaintext, &sender, &recipient_pub, &doc_hash)?
    };
    let metadata = EncryptionMetadata::for_artifact(&artifact, &plaintext);

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args
            .file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let stem = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());
    let artifact_path = out_dir.join(format!("{stem}.enc"));
    let metadata_path = out_dir.join(format!("{stem}.meta.json"));

    std::fs::write(&artifact_path, &artifact.ciphertext)
        .with_context(|| format!("writing {}", artifact_path.display()))?;
    std::fs::write(&metadata_path, format!("{}\n", metadata.to_json_pretty()?))
        .with_context(|| format!("writing {}", metadata_path.display()))?;

    tracing::info!(
        artifact = %artifact_path.display(),
        size = artifact.ciphertext.len(),
        curve = %curve,
        "artifact sealed"
    );
    println!("{}", artifact_hash.to_hex());
    Ok(0)
}
