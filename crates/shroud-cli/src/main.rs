//! # shroud CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity flags configure the tracing filter.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shroud_cli::decrypt::{run_decrypt, DecryptArgs};
use shroud_cli::encrypt::{run_encrypt, EncryptArgs};
use shroud_cli::keygen::{run_keygen, KeygenArgs};
use shroud_cli::prove::{run_prove, ProveArgs};
use shroud_cli::trustlist::{run_build_trust_list, BuildTrustListArgs};
use shroud_cli::verify::{run_verify, VerifyArgs};

/// shroud — anonymous trust-list attestation toolchain.
///
/// Builds Merkle allow-lists, seals artifacts to signed documents, produces
/// membership-proof manifests, and verifies them with itemized diagnostics.
#[derive(Parser, Debug)]
#[command(name = "shroud", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a key pair (x25519, p256, or ed25519).
    Keygen(KeygenArgs),

    /// Build the Merkle trust list for an allow-list and print its root.
    BuildTrustList(BuildTrustListArgs),

    /// Encrypt a file for a recipient, bound to a document digest.
    Encrypt(EncryptArgs),

    /// Decrypt an artifact using its metadata sidecar.
    Decrypt(DecryptArgs),

    /// Produce a membership-proof manifest for a signed document.
    Prove(ProveArgs),

    /// Verify a manifest against an artifact and allow-list.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::BuildTrustList(args) => run_build_trust_list(&args),
        Commands::Encrypt(args) => run_encrypt(&args),
        Commands::Decrypt(args) => run_decrypt(&args),
        Commands::Prove(args) => run_prove(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
