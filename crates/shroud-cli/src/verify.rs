//! # Manifest Verification
//!
//! Runs the five-step verification of a manifest against an artifact and
//! the allow-list in force, prints the itemized report, and exits 0 only
//! when every check passed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use shroud_manifest::{Manifest, ManifestVerifier};
use shroud_zkp::WitnessCheckBackend;

/// Arguments for `shroud verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Manifest file to verify.
    pub manifest: PathBuf,

    /// Ciphertext file the manifest claims to bind.
    #[arg(long)]
    pub artifact: PathBuf,

    /// Allow-list file; the expected trust root is recomputed from it.
    #[arg(long)]
    pub trust_list: PathBuf,
}

/// Verify a manifest and print the report.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let manifest = Manifest::load(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest.display()))?;
    let ciphertext = std::fs::read(&args.artifact)
        .with_context(|| format!("reading {}", args.artifact.display()))?;

    // Recompute the expected root independently of the manifest.
    let list = crate::build_trust_list(&args.trust_list)?;

    let verifier = ManifestVerifier::new(
        Arc::new(WitnessCheckBackend),
        WitnessCheckBackend::verification_key(),
    );
    let report = verifier.verify(&manifest, &ciphertext, &list.root());

    print!("{report}");
    if report.passed() {
        println!("verification passed");
        Ok(0)
    } else {
        tracing::info!(
            failed_at = %report.failed_check().map(|c| c.as_str()).unwrap_or("unknown"),
            "verification failed"
        );
        println!("verification failed");
        Ok(1)
    }
}
