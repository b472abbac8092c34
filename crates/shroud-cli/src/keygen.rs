//! # Key Generation
//!
//! Generates key material for the workflow: agreement keys (x25519, p256)
//! for artifact encryption and Ed25519 signing keys for signer identities.
//! Secret seeds are written hex-encoded to `{prefix}.key` with owner-only
//! permissions; public keys to `{prefix}.pub`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ed25519_dalek::SigningKey;
use rand_core::{OsRng, RngCore};

use shroud_core::hex;
use shroud_crypto::{AgreementSecret, CurveId};

/// Arguments for `shroud keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Curve family: x25519, p256, or ed25519 (signing).
    #[arg(long, default_value = "x25519")]
    pub curve: String,

    /// Output directory for the key pair.
    #[arg(long, default_value = ".")]
    pub output: PathBuf,

    /// Filename prefix; writes `{prefix}.key` and `{prefix}.pub`.
    #[arg(long, default_value = "shroud")]
    pub prefix: String,
}

/// Generate a key pair and write it to disk.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let (seed_hex, public_hex) = match args.curve.trim().to_lowercase().as_str() {
        "ed25519" => {
            let mut seed = [0u8; 32];
            OsRng.fill_bytes(&mut seed);
            let key = SigningKey::from_bytes(&seed);
            (hex::encode(&seed), hex::encode(key.verifying_key().as_bytes()))
        }
        other => {
            let curve: CurveId = other.parse()?;
            let (seed, secret) = fresh_agreement_seed(curve);
            (hex::encode(&seed), hex::encode(&secret.public_key()?))
        }
    };

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;
    let key_path = args.output.join(format!("{}.key", args.prefix));
    let pub_path = args.output.join(format!("{}.pub", args.prefix));

    std::fs::write(&key_path, format!("{seed_hex}\n"))
        .with_context(|| format!("writing {}", key_path.display()))?;
    restrict_permissions(&key_path)?;
    std::fs::write(&pub_path, format!("{public_hex}\n"))
        .with_context(|| format!("writing {}", pub_path.display()))?;

    tracing::info!(curve = %args.curve, key = %key_path.display(), "key pair written");
    println!("{}", pub_path.display());
    Ok(0)
}

/// Draw seeds until one is a valid scalar for the curve. X25519 accepts
/// any 32 bytes; P-256 rejects the rare out-of-range draw.
fn fresh_agreement_seed(curve: CurveId) -> ([u8; 32], AgreementSecret) {
    loop {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        if let Ok(secret) = AgreementSecret::from_seed_bytes(curve, seed) {
            return (seed, secret);
        }
    }
}

/// Owner-only read/write on the secret key file.
fn restrict_permissions(path: &std::path::Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("restricting permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(curve: &str, dir: &std::path::Path) -> KeygenArgs {
        KeygenArgs {
            curve: curve.to_string(),
            output: dir.to_path_buf(),
            prefix: "test".to_string(),
        }
    }

    #[test]
    fn x25519_keypair_files_written() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_keygen(&args("x25519", dir.path())).unwrap(), 0);
        let seed_hex = std::fs::read_to_string(dir.path().join("test.key")).unwrap();
        let pub_hex = std::fs::read_to_string(dir.path().join("test.pub")).unwrap();
        assert_eq!(seed_hex.trim().len(), 64);
        assert_eq!(pub_hex.trim().len(), 64);
    }

    #[test]
    fn p256_public_key_is_compressed_sec1() {
        let dir = tempfile::tempdir().unwrap();
        run_keygen(&args("p256", dir.path())).unwrap();
        let pub_hex = std::fs::read_to_string(dir.path().join("test.pub")).unwrap();
        // 33 bytes compressed.
        assert_eq!(pub_hex.trim().len(), 66);
    }

    #[test]
    fn ed25519_seed_recovers_public_key() {
        let dir = tempfile::tempdir().unwrap();
        run_keygen(&args("ed25519", dir.path())).unwrap();
        let seed_hex = std::fs::read_to_string(dir.path().join("test.key")).unwrap();
        let pub_hex = std::fs::read_to_string(dir.path().join("test.pub")).unwrap();
        let seed = shroud_core::hex::decode_array32(seed_hex.trim()).unwrap();
        let key = SigningKey::from_bytes(&seed);
        assert_eq!(
            hex::encode(key.verifying_key().as_bytes()),
            pub_hex.trim()
        );
    }

    #[test]
    fn unknown_curve_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_keygen(&args("curve9000", dir.path())).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn secret_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        run_keygen(&args("x25519", dir.path())).unwrap();
        let mode = std::fs::metadata(dir.path().join("test.key"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
