//! # Artifact Decryption
//!
//! Opens an encrypted artifact using its metadata sidecar. Authentication
//! failures are terminal: no partial plaintext is ever written. The
//! plaintext digest is checked against the sidecar's `originalHash` (or a
//! caller-supplied digest) before anything touches disk.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use shroud_core::ContentDigest;
use shroud_crypto::{open, AgreementSecret};
use shroud_manifest::EncryptionMetadata;

/// Arguments for `shroud decrypt`.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Metadata sidecar file.
    pub metadata: PathBuf,

    /// Ciphertext file.
    #[arg(long)]
    pub artifact: PathBuf,

    /// Recipient secret key file (hex seed).
    #[arg(long)]
    pub recipient_key: PathBuf,

    /// Expected plaintext digest; defaults to the sidecar's originalHash.
    #[arg(long)]
    pub expect_hash: Option<String>,

    /// Write plaintext here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Decrypt an artifact.
pub fn run_decrypt(args: &DecryptArgs) -> Result<u8> {
    let metadata = EncryptionMetadata::load(&args.metadata)
        .with_context(|| format!("loading metadata {}", args.metadata.display()))?;
    let ciphertext = std::fs::read(&args.artifact)
        .with_context(|| format!("reading {}", args.artifact.display()))?;

    let artifact = metadata.to_artifact(ciphertext)?;
    let doc_hash = metadata.doc_hash()?;
    let expected: ContentDigest = match &args.expect_hash {
        Some(hex) => ContentDigest::from_hex(hex).context("parsing --expect-hash")?,
        None => metadata.original_digest()?,
    };

    // Scoped: the recipient secret lives exactly as long as the open call.
    let plaintext = {
        let recipient = AgreementSecret::from_seed_hex(
            metadata.curve,
            &crate::read_key_hex(&args.recipient_key)?,
        )?;
        open(&artifact, &recipient, &doc_hash, Some(&expected))?
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, &plaintext)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(out = %path.display(), size = plaintext.len(), "artifact opened");
        }
        None => {
            std::io::stdout().write_all(&plaintext)?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_core::{hex, sha256_bytes};
    use shroud_crypto::{seal, CurveId};

    struct Setup {
        dir: tempfile::TempDir,
        args: DecryptArgs,
    }

    fn setup(payload: &[u8], recipient_seed: u8) -> Setup {
        let dir = tempfile::tempdir().unwrap();
        let sender = AgreementSecret::from_seed_bytes(CurveId::X25519, [1u8; 32]).unwrap();
        let recipient = AgreementSecret::from_seed_bytes(CurveId::X25519, [2u8; 32]).unwrap();
        let doc = sha256_bytes(b"document");
        let (artifact, _) =
            seal(payload, &sender, &recipient.public_key().unwrap(), &doc).unwrap();
        let metadata = EncryptionMetadata::for_artifact(&artifact, payload);

        let metadata_path = dir.path().join("artifact.meta.json");
        let artifact_path = dir.path().join("artifact.enc");
        let key_path = dir.path().join("recipient.key");
        let out_path = dir.path().join("plaintext.bin");
        std::fs::write(&metadata_path, metadata.to_json_pretty().unwrap()).unwrap();
        std::fs::write(&artifact_path, &artifact.ciphertext).unwrap();
        std::fs::write(&key_path, hex::encode(&[recipient_seed; 32])).unwrap();

        Setup {
            dir,
            args: DecryptArgs {
                metadata: metadata_path,
                artifact: artifact_path,
                recipient_key: key_path,
                expect_hash: None,
                out: Some(out_path),
            },
        }
    }

    #[test]
    fn decrypt_roundtrip() {
        let s = setup(b"round trip payload", 2);
        assert_eq!(run_decrypt(&s.args).unwrap(), 0);
        let plaintext = std::fs::read(s.dir.path().join("plaintext.bin")).unwrap();
        assert_eq!(plaintext, b"round trip payload");
    }

    #[test]
    fn wrong_key_fails_and_writes_nothing() {
        let s = setup(b"secret payload", 9);
        assert!(run_decrypt(&s.args).is_err());
        assert!(!s.dir.path().join("plaintext.bin").exists());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let s = setup(b"secret payload", 2);
        let mut ciphertext = std::fs::read(&s.args.artifact).unwrap();
        ciphertext[0] ^= 0x01;
        std::fs::write(&s.args.artifact, &ciphertext).unwrap();
        assert!(run_decrypt(&s.args).is_err());
    }

    #[test]
    fn wrong_expect_hash_fails_integrity() {
        let mut s = setup(b"payload", 2);
        s.args.expect_hash = Some(sha256_bytes(b"different payload").to_hex());
        let err = run_decrypt(&s.args).unwrap_err();
        assert!(format!("{err:#}").contains("integrity"));
        assert!(!s.dir.path().join("plaintext.bin").exists());
    }
}
