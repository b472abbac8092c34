//! # Manifest v1 — The Persisted Binding Record
//!
//! A manifest ties one attestation's public commitments together:
//! document hash, artifact hash, signer, trust root, proof bytes, and the
//! creation timestamp. The structure is rigid — unknown fields are rejected
//! at deserialization so nothing rides along unchecked.
//!
//! Field names in the persisted JSON are camelCase (`docHash`,
//! `artifactHash`, `trustRoot`), digests are lowercase hex, and proof bytes
//! are standard base64.
//!
//! A manifest is immutable once produced. Re-proving always yields a new
//! manifest; nothing edits one in place.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use shroud_core::{hex, Timestamp};
use shroud_zkp::PublicInputs;

use crate::error::ManifestError;

/// The manifest format version this crate reads and writes.
pub const MANIFEST_VERSION: u32 = 1;

/// What kind of artifact the manifest binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// An AEAD ciphertext; the hash commits to the encrypted bytes.
    Encrypted,
    /// An unencrypted payload bound by hash only.
    Plain,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encrypted => f.write_str("encrypted"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// The artifact binding section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactSection {
    /// Artifact kind.
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    /// Hex digest of the artifact bytes.
    #[serde(rename = "artifactHash")]
    pub artifact_hash: String,
}

/// The signer section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignerSection {
    /// Hex-encoded Ed25519 public key.
    #[serde(rename = "publicKey")]
    pub public_key: String,
    /// Hex fingerprint committing to the public key.
    pub fingerprint: String,
}

/// The persisted binding record for one attestation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Format version; this crate supports [`MANIFEST_VERSION`].
    pub version: u32,
    /// Hex digest of the signed document.
    #[serde(rename = "docHash")]
    pub doc_hash: String,
    /// The artifact binding.
    pub artifact: ArtifactSection,
    /// The signer binding.
    pub signer: SignerSection,
    /// Hex trust-list Merkle root.
    #[serde(rename = "trustRoot")]
    pub trust_root: String,
    /// Base64 proof bytes from the proof backend.
    pub proof: String,
    /// Creation time (UTC, seconds precision).
    pub timestamp: Timestamp,
}

impl Manifest {
    /// Structurally validate the manifest: supported version, well-formed
    /// digests and key, decodable proof.
    ///
    /// This is verification step 1; everything here is about shape, not
    /// about whether the bindings hold.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.version != MANIFEST_VERSION {
            return Err(ManifestError::ManifestFormat(format!(
                "unsupported manifest version {} (expected {MANIFEST_VERSION})",
                self.version
            )));
        }
        for (name, value) in [
            ("docHash", &self.doc_hash),
            ("artifact.artifactHash", &self.artifact.artifact_hash),
            ("signer.publicKey", &self.signer.public_key),
            ("signer.fingerprint", &self.signer.fingerprint),
            ("trustRoot", &self.trust_root),
        ] {
            if !hex::is_hex_32(value) {
                return Err(ManifestError::ManifestFormat(format!(
                    "{name} must be 64 hex chars, got {:?} ({} chars)",
                    truncate_for_display(value),
                    value.len()
                )));
            }
        }
        if self.proof.is_empty() {
            return Err(ManifestError::ManifestFormat(
                "proof field is empty".to_string(),
            ));
        }
        BASE64.decode(&self.proof).map_err(|e| {
            ManifestError::ManifestFormat(format!("proof is not valid base64: {e}"))
        })?;
        Ok(())
    }

    /// Decode the proof bytes.
    pub fn proof_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        BASE64
            .decode(&self.proof)
            .map_err(|e| ManifestError::ProofFormat(format!("proof is not valid base64: {e}")))
    }

    /// Reassemble the public-input tuple this manifest commits to.
    pub fn public_inputs(&self) -> Result<PublicInputs, ManifestError> {
        let field = |name: &str, value: &str| -> Result<[u8; 32], ManifestError> {
            hex::decode_array32(value)
                .map_err(|e| ManifestError::ManifestFormat(format!("{name}: {e}")))
        };
        Ok(PublicInputs {
            doc_hash: field("docHash", &self.doc_hash)?,
            artifact_hash: field("artifact.artifactHash", &self.artifact.artifact_hash)?,
            signer_commitment: field("signer.fingerprint", &self.signer.fingerprint)?,
            trust_root: field("trustRoot", &self.trust_root)?,
        })
    }

    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::ManifestFormat(format!("manifest does not parse: {e}")))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::ManifestFormat(format!("manifest serialization: {e}")))
    }

    /// Load a manifest from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Cap a field value for error messages.
fn truncate_for_display(value: &str) -> &str {
    value.get(..16).unwrap_or(value)
}
