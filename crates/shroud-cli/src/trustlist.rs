//! # Trust-List Construction
//!
//! Builds the Merkle trust list for an allow-list file and prints the root.
//! Optionally writes a summary file recording root, depth, and leaf count
//! for the allow-list version.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use shroud_core::hex;

/// Arguments for `shroud build-trust-list`.
#[derive(Args, Debug)]
pub struct BuildTrustListArgs {
    /// Allow-list file: JSON array of hex Ed25519 public keys.
    pub allowlist: PathBuf,

    /// Write a JSON summary (root, depth, leafCount) to this path.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrustListSummary {
    root: String,
    depth: usize,
    leaf_count: usize,
}

/// Build the trust list and print its root.
pub fn run_build_trust_list(args: &BuildTrustListArgs) -> Result<u8> {
    let list = crate::build_trust_list(&args.allowlist)?;
    let root_hex = hex::encode(&list.root());

    tracing::info!(
        leaves = list.len(),
        depth = list.depth(),
        root = %root_hex,
        "trust list built"
    );

    if let Some(out) = &args.out {
        let summary = TrustListSummary {
            root: root_hex.clone(),
            depth: list.depth(),
            leaf_count: list.len(),
        };
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(out, format!("{json}\n"))
            .with_context(|| format!("writing {}", out.display()))?;
    }

    println!("{root_hex}");
    Ok(0)
}
