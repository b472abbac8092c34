//! # shroud-cli — Command-Line Interface
//!
//! Provides the `shroud` binary backing the attestation workflow:
//!
//! - `shroud keygen` — key generation (x25519, p256, ed25519).
//! - `shroud build-trust-list` — allow-list to Merkle root.
//! - `shroud encrypt` / `shroud decrypt` — artifact sealing and opening.
//! - `shroud prove` — membership proof into a manifest.
//! - `shroud verify` — the five-step manifest verification, exit 0/nonzero.
//!
//! Allow-list files are JSON arrays of hex-encoded Ed25519 public keys;
//! key files hold one hex-encoded 32-byte seed.

pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod prove;
pub mod trustlist;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

use shroud_crypto::{SignerRecord, TrustList};

/// Read a key file: one hex-encoded seed, surrounding whitespace ignored.
pub fn read_key_hex(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading key file {}", path.display()))?;
    Ok(content.trim().to_string())
}

/// Load an allow-list file: a JSON array of hex-encoded Ed25519 public
/// keys, in admission order.
pub fn load_allowlist(path: &Path) -> Result<Vec<SignerRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading allow-list {}", path.display()))?;
    let keys: Vec<String> = serde_json::from_str(&json)
        .with_context(|| format!("allow-list {} is not a JSON array of strings", path.display()))?;
    keys.iter()
        .enumerate()
        .map(|(i, key_hex)| {
            let bytes = shroud_core::hex::decode(key_hex)
                .with_context(|| format!("allow-list entry {i} is not valid hex"))?;
            SignerRecord::from_public_key_bytes(&bytes)
                .with_context(|| format!("allow-list entry {i} rejected"))
        })
        .collect()
}

/// Build the trust list for an allow-list file.
pub fn build_trust_list(path: &Path) -> Result<TrustList> {
    let records = load_allowlist(path)?;
    TrustList::build(&records).context("building trust list")
}
