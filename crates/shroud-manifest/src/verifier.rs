//! # Manifest Verifier — Five Ordered Checks
//!
//! Verification runs five checks in a fixed order, short-circuiting on the
//! first failure, each with its own diagnostic:
//!
//! 1. structural manifest validation → manifest-format
//! 2. recomputed artifact digest vs `artifactHash` → artifact-binding
//! 3. expected allow-list root vs `trustRoot` → trust-root
//! 4. proof byte size/structure sanity → proof-format
//! 5. backend proof verification → proof-verification
//!
//! The result is a [`VerificationReport`] itemizing every check — passed,
//! failed, or skipped — so callers can always answer *which* binding
//! failed, never just "verification failed".

use subtle::ConstantTimeEq;

use std::sync::Arc;

use shroud_core::{hex, sha256_bytes};
use shroud_zkp::{ProofBackend, VerificationKey};

use crate::error::ManifestError;
use crate::manifest::Manifest;

/// Proof byte lengths accepted by the structural sanity check (step 4).
///
/// Wide on purpose: real backends emit kilobyte-scale proofs, the
/// witness-check backend emits 32 bytes. Anything outside this range is
/// structurally broken rather than merely invalid.
const PROOF_LEN_RANGE: std::ops::RangeInclusive<usize> = 16..=65536;

/// Identifies one of the five verification checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyCheck {
    /// Step 1: structural manifest validation.
    ManifestFormat,
    /// Step 2: artifact digest binding.
    ArtifactBinding,
    /// Step 3: trust-root binding.
    TrustRoot,
    /// Step 4: proof size/structure sanity.
    ProofFormat,
    /// Step 5: cryptographic proof verification.
    ProofVerification,
}

impl VerifyCheck {
    /// All five checks in verification order.
    pub const ALL: [VerifyCheck; 5] = [
        VerifyCheck::ManifestFormat,
        VerifyCheck::ArtifactBinding,
        VerifyCheck::TrustRoot,
        VerifyCheck::ProofFormat,
        VerifyCheck::ProofVerification,
    ];

    /// Stable identifier used in reports and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManifestFormat => "manifest-format",
            Self::ArtifactBinding => "artifact-binding",
            Self::TrustRoot => "trust-root",
            Self::ProofFormat => "proof-format",
            Self::ProofVerification => "proof-verification",
        }
    }
}

impl std::fmt::Display for VerifyCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// The check ran and passed.
    Passed,
    /// The check ran and failed; verification stopped here.
    Failed,
    /// An earlier check failed; this one did not run.
    Skipped,
}

/// One line of the verification report.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Which check this is.
    pub check: VerifyCheck,
    /// How it went.
    pub status: CheckStatus,
    /// Human-readable detail for the report.
    pub detail: String,
}

/// The itemized result of verifying one manifest against one artifact.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// One entry per check, in verification order. Always five entries.
    pub checks: Vec<CheckResult>,
}

impl VerificationReport {
    /// True when all five checks passed.
    pub fn passed(&self) -> bool {
        self.checks
            .iter()
            .all(|c| c.status == CheckStatus::Passed)
    }

    /// The check that failed, if any.
    pub fn failed_check(&self) -> Option<VerifyCheck> {
        self.checks
            .iter()
            .find(|c| c.status == CheckStatus::Failed)
            .map(|c| c.check)
    }

    /// Detail string of the failed check, if any.
    pub fn failure_detail(&self) -> Option<&str> {
        self.checks
            .iter()
            .find(|c| c.status == CheckStatus::Failed)
            .map(|c| c.detail.as_str())
    }
}

impl std::fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for check in &self.checks {
            let tag = match check.status {
                CheckStatus::Passed => "PASS",
                CheckStatus::Failed => "FAIL",
                CheckStatus::Skipped => "SKIP",
            };
            writeln!(f, "[{tag}] {:<19} {}", check.check.as_str(), check.detail)?;
        }
        Ok(())
    }
}

/// Verifies manifests against artifacts and an expected trust root.
pub struct ManifestVerifier {
    backend: Arc<dyn ProofBackend>,
    verification_key: VerificationKey,
}

impl ManifestVerifier {
    /// Create a verifier over a proof backend and its verification key.
    pub fn new(backend: Arc<dyn ProofBackend>, verification_key: VerificationKey) -> Self {
        Self {
            backend,
            verification_key,
        }
    }

    /// Run the five checks.
    ///
    /// `artifact_bytes` is the raw ciphertext the manifest claims to bind;
    /// `expected_root` is the root the verifier independently computed for
    /// the allow-list version in use.
    pub fn verify(
        &self,
        manifest: &Manifest,
        artifact_bytes: &[u8],
        expected_root: &[u8; 32],
    ) -> VerificationReport {
        let mut run = CheckRun::default();

        // Step 1 — structure.
        match manifest.validate() {
            Ok(()) => run.pass(VerifyCheck::ManifestFormat, "manifest structure valid"),
            Err(e) => return run.fail(VerifyCheck::ManifestFormat, e),
        }

        // Step 2 — artifact binding.
        let recomputed = sha256_bytes(artifact_bytes);
        let claimed = match hex::decode_array32(&manifest.artifact.artifact_hash) {
            Ok(bytes) => bytes,
            Err(e) => {
                return run.fail(
                    VerifyCheck::ArtifactBinding,
                    ManifestError::ArtifactBinding(e.to_string()),
                )
            }
        };
        if bool::from(recomputed.as_bytes().ct_eq(&claimed)) {
            run.pass(
                VerifyCheck::ArtifactBinding,
                format!(
                    "artifact digest matches ({} bytes)",
                    artifact_bytes.len()
                ),
            );
        } else {
            tracing::warn!(
                claimed = %manifest.artifact.artifact_hash,
                recomputed = %recomputed.to_hex(),
                "artifact binding mismatch"
            );
            return run.fail(
                VerifyCheck::ArtifactBinding,
                ManifestError::ArtifactBinding(format!(
                    "manifest claims {} but the supplied artifact hashes to {}",
                    manifest.artifact.artifact_hash,
                    recomputed.to_hex()
                )),
            );
        }

        // Step 3 — trust root.
        let manifest_root = match hex::decode_array32(&manifest.trust_root) {
            Ok(bytes) => bytes,
            Err(e) => {
                return run.fail(
                    VerifyCheck::TrustRoot,
                    ManifestError::TrustRootMismatch(e.to_string()),
                )
            }
        };
        if bool::from(manifest_root.ct_eq(expected_root)) {
            run.pass(VerifyCheck::TrustRoot, "trust root matches the expected allow-list");
        } else {
            return run.fail(
                VerifyCheck::TrustRoot,
                ManifestError::TrustRootMismatch(format!(
                    "manifest carries root {} but the verifier expects {}",
                    manifest.trust_root,
                    hex::encode(expected_root)
                )),
            );
        }

        // Step 4 — proof structure.
        let proof = match manifest.proof_bytes() {
            Ok(bytes) => bytes,
            Err(e) => return run.fail(VerifyCheck::ProofFormat, e),
        };
        if !PROOF_LEN_RANGE.contains(&proof.len()) {
            return run.fail(
                VerifyCheck::ProofFormat,
                ManifestError::ProofFormat(format!(
                    "proof is {} bytes, outside the sane range {:?}",
                    proof.len(),
                    PROOF_LEN_RANGE
                )),
            );
        }
        run.pass(
            VerifyCheck::ProofFormat,
            format!("proof structure sane ({} bytes)", proof.len()),
        );

        // Step 5 — cryptographic verification.
        let public_inputs = match manifest.public_inputs() {
            Ok(pi) => pi,
            Err(e) => {
                return run.fail(
                    VerifyCheck::ProofVerification,
                    ManifestError::ProofVerification(e.to_string()),
                )
            }
        };
        match self
            .backend
            .verify(&proof, &public_inputs, &self.verification_key)
        {
            Ok(true) => {
                run.pass(
                    VerifyCheck::ProofVerification,
                    format!("{} backend accepts the proof", self.backend.backend_name()),
                );
                run.finish()
            }
            Ok(false) => run.fail(
                VerifyCheck::ProofVerification,
                ManifestError::ProofVerification(
                    "backend rejects the proof against the public inputs".to_string(),
                ),
            ),
            Err(e) => run.fail(
                VerifyCheck::ProofVerification,
                ManifestError::ProofVerification(e.to_string()),
            ),
        }
    }
}

/// Accumulates check results and fills in skips on failure.
#[derive(Default)]
struct CheckRun {
    results: Vec<CheckResult>,
}

impl CheckRun {
    fn pass(&mut self, check: VerifyCheck, detail: impl Into<String>) {
        tracing::debug!(check = %check, "verification check passed");
        self.results.push(CheckResult {
            check,
            status: CheckStatus::Passed,
            detail: detail.into(),
        });
    }

    fn fail(mut self, check: VerifyCheck, error: ManifestError) -> VerificationReport {
        let detail = error.to_string();
        tracing::info!(check = %check, detail = %detail, "verification failed");
        self.results.push(CheckResult {
            check,
            status: CheckStatus::Failed,
            detail,
        });
        self.finish()
    }

    fn finish(mut self) -> VerificationReport {
        for check in VerifyCheck::ALL {
            if !self.results.iter().any(|r| r.check == check) {
                self.results.push(CheckResult {
                    check,
                    status: CheckStatus::Skipped,
                    detail: "not reached".to_string(),
                });
            }
        }
        VerificationReport {
            checks: self.results,
        }
    }
}
