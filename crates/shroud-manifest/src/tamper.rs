//! # Tamper Detector — Mutation Harness
//!
//! Takes a known-good manifest/artifact pair, applies one single-field
//! mutation at a time, and asserts that verification fails at exactly the
//! check corresponding to the mutated field — not an unrelated one. A
//! mutation that slips past its check, or trips a different check, is a
//! verifier defect and is itemized as such.
//!
//! Doubles as a deployment self-test: run it after wiring a new proof
//! backend to confirm each binding is still independently enforced.

use shroud_core::hex;

use crate::manifest::Manifest;
use crate::verifier::{ManifestVerifier, VerifyCheck};

/// A single-field mutation applied to a known-good pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Flip one byte in the middle of the ciphertext.
    FlipCiphertextByte,
    /// Replace the manifest's trust root with a different digest.
    SwapTrustRoot,
    /// Alter one nibble of the manifest's document hash.
    AlterDocHash,
    /// Truncate the proof to a structurally broken length.
    TruncateProof,
    /// Bump the manifest version to an unsupported value.
    UnsupportedVersion,
}

impl Mutation {
    /// Every built-in mutation.
    pub const ALL: [Mutation; 5] = [
        Mutation::FlipCiphertextByte,
        Mutation::SwapTrustRoot,
        Mutation::AlterDocHash,
        Mutation::TruncateProof,
        Mutation::UnsupportedVersion,
    ];

    /// The check this mutation must fail at.
    pub fn expected_check(&self) -> VerifyCheck {
        match self {
            Self::FlipCiphertextByte => VerifyCheck::ArtifactBinding,
            Self::SwapTrustRoot => VerifyCheck::TrustRoot,
            Self::AlterDocHash => VerifyCheck::ProofVerification,
            Self::TruncateProof => VerifyCheck::ProofFormat,
            Self::UnsupportedVersion => VerifyCheck::ManifestFormat,
        }
    }

    /// Stable identifier for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlipCiphertextByte => "flip-ciphertext-byte",
            Self::SwapTrustRoot => "swap-trust-root",
            Self::AlterDocHash => "alter-doc-hash",
            Self::TruncateProof => "truncate-proof",
            Self::UnsupportedVersion => "unsupported-version",
        }
    }

    /// Apply this mutation, returning the mutated manifest and artifact.
    fn apply(&self, manifest: &Manifest, artifact: &[u8]) -> (Manifest, Vec<u8>) {
        let mut manifest = manifest.clone();
        let mut artifact = artifact.to_vec();
        match self {
            Self::FlipCiphertextByte => {
                let mid = artifact.len() / 2;
                artifact[mid] ^= 0x01;
            }
            Self::SwapTrustRoot => {
                manifest.trust_root = hex::encode(&[0x42u8; 32]);
            }
            Self::AlterDocHash => {
                let mut chars = manifest.doc_hash.into_bytes();
                chars[0] = if chars[0] == b'0' { b'1' } else { b'0' };
                manifest.doc_hash = String::from_utf8(chars).unwrap_or_default();
            }
            Self::TruncateProof => {
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                manifest.proof = STANDARD.encode([0u8; 4]);
            }
            Self::UnsupportedVersion => {
                manifest.version = 99;
            }
        }
        (manifest, artifact)
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one mutation did to verification.
#[derive(Debug, Clone)]
pub struct TamperOutcome {
    /// The applied mutation.
    pub mutation: Mutation,
    /// The check verification actually failed at, if it failed at all.
    pub failed_at: Option<VerifyCheck>,
    /// The check it was expected to fail at.
    pub expected: VerifyCheck,
}

impl TamperOutcome {
    /// True when verification failed at exactly the expected check.
    pub fn as_expected(&self) -> bool {
        self.failed_at == Some(self.expected)
    }
}

/// The result of a full mutation sweep.
#[derive(Debug, Clone)]
pub struct TamperReport {
    /// One outcome per mutation.
    pub outcomes: Vec<TamperOutcome>,
}

impl TamperReport {
    /// True when every mutation failed at its corresponding check.
    pub fn all_as_expected(&self) -> bool {
        self.outcomes.iter().all(TamperOutcome::as_expected)
    }

    /// Outcomes that failed at the wrong check or did not fail at all.
    pub fn deviations(&self) -> Vec<&TamperOutcome> {
        self.outcomes.iter().filter(|o| !o.as_expected()).collect()
    }
}

impl std::fmt::Display for TamperReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for outcome in &self.outcomes {
            let verdict = if outcome.as_expected() { "ok" } else { "DEVIATION" };
            let failed = outcome
                .failed_at
                .map(|c| c.as_str())
                .unwrap_or("<verification passed>");
            writeln!(
                f,
                "{:<22} expected {:<19} failed at {:<19} {}",
                outcome.mutation.as_str(),
                outcome.expected.as_str(),
                failed,
                verdict
            )?;
        }
        Ok(())
    }
}

/// Runs the mutation sweep against a verifier.
pub struct TamperDetector<'a> {
    verifier: &'a ManifestVerifier,
}

impl<'a> TamperDetector<'a> {
    /// Create a detector over a configured verifier.
    pub fn new(verifier: &'a ManifestVerifier) -> Self {
        Self { verifier }
    }

    /// Apply every built-in mutation to the known-good pair and record
    /// where verification failed.
    ///
    /// The unmutated pair is expected to verify; callers should confirm
    /// that separately before drawing conclusions from the sweep.
    pub fn run(
        &self,
        manifest: &Manifest,
        artifact: &[u8],
        expected_root: &[u8; 32],
    ) -> TamperReport {
        let outcomes = Mutation::ALL
            .iter()
            .map(|mutation| {
                let (mutated_manifest, mutated_artifact) = mutation.apply(manifest, artifact);
                let report =
                    self.verifier
                        .verify(&mutated_manifest, &mutated_artifact, expected_root);
                let outcome = TamperOutcome {
                    mutation: *mutation,
                    failed_at: report.failed_check(),
                    expected: mutation.expected_check(),
                };
                if !outcome.as_expected() {
                    tracing::warn!(
                        mutation = %mutation,
                        expected = %outcome.expected,
                        failed_at = ?outcome.failed_at,
                        "mutation did not fail at the corresponding check"
                    );
                }
                outcome
            })
            .collect();
        TamperReport { outcomes }
    }
}
