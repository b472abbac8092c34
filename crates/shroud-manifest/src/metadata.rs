//! # Encryption Metadata — The Decryption Sidecar
//!
//! The sidecar file a recipient needs alongside the raw ciphertext:
//! nonce, document binding, sender public key, curve, algorithm identifier,
//! ciphertext size, and the original plaintext digest for the optional
//! post-decryption integrity check.
//!
//! Key material is deliberately absent — the sidecar carries only public
//! values and can be shared with the artifact.

use serde::{Deserialize, Serialize};

use shroud_core::{hex, sha256_bytes, ContentDigest};
use shroud_crypto::{CurveId, EncryptedArtifact, AEAD_ALGORITHM, NONCE_LEN};

use crate::error::ManifestError;

/// Persisted decryption parameters for one encrypted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptionMetadata {
    /// Hex AES-GCM nonce.
    pub iv: String,
    /// Hex document digest used as AAD.
    pub aad: String,
    /// Hex sender public key.
    #[serde(rename = "senderPublicKey")]
    pub sender_public_key: String,
    /// Key-agreement curve family.
    pub curve: CurveId,
    /// AEAD algorithm identifier.
    pub algorithm: String,
    /// Ciphertext length in bytes (tag included).
    #[serde(rename = "encryptedSize")]
    pub encrypted_size: u64,
    /// Hex digest of the original plaintext.
    #[serde(rename = "originalHash")]
    pub original_hash: String,
}

impl EncryptionMetadata {
    /// Record the metadata for a freshly sealed artifact.
    pub fn for_artifact(artifact: &EncryptedArtifact, plaintext: &[u8]) -> Self {
        Self {
            iv: hex::encode(&artifact.iv),
            aad: hex::encode(&artifact.aad),
            sender_public_key: hex::encode(&artifact.sender_public_key),
            curve: artifact.curve,
            algorithm: AEAD_ALGORITHM.to_string(),
            encrypted_size: artifact.ciphertext.len() as u64,
            original_hash: sha256_bytes(plaintext).to_hex(),
        }
    }

    /// Reassemble an [`EncryptedArtifact`] from this metadata and the raw
    /// ciphertext bytes.
    ///
    /// # Errors
    ///
    /// [`ManifestError::ManifestFormat`] for unknown algorithms, malformed
    /// hex fields, or a ciphertext whose length disagrees with
    /// `encryptedSize`.
    pub fn to_artifact(&self, ciphertext: Vec<u8>) -> Result<EncryptedArtifact, ManifestError> {
        if self.algorithm != AEAD_ALGORITHM {
            return Err(ManifestError::ManifestFormat(format!(
                "unsupported algorithm {:?} (expected {AEAD_ALGORITHM:?})",
                self.algorithm
            )));
        }
        if ciphertext.len() as u64 != self.encrypted_size {
            return Err(ManifestError::ManifestFormat(format!(
                "ciphertext is {} bytes but metadata records {}",
                ciphertext.len(),
                self.encrypted_size
            )));
        }
        let iv_bytes = hex::decode(&self.iv)
            .map_err(|e| ManifestError::ManifestFormat(format!("iv: {e}")))?;
        let iv: [u8; NONCE_LEN] = iv_bytes.try_into().map_err(|v: Vec<u8>| {
            ManifestError::ManifestFormat(format!(
                "iv must be {NONCE_LEN} bytes, got {}",
                v.len()
            ))
        })?;
        let aad = hex::decode_array32(&self.aad)
            .map_err(|e| ManifestError::ManifestFormat(format!("aad: {e}")))?;
        let sender_public_key = hex::decode(&self.sender_public_key)
            .map_err(|e| ManifestError::ManifestFormat(format!("senderPublicKey: {e}")))?;

        Ok(EncryptedArtifact {
            ciphertext,
            iv,
            sender_public_key,
            curve: self.curve,
            aad,
        })
    }

    /// The document digest recorded as AAD.
    pub fn doc_hash(&self) -> Result<ContentDigest, ManifestError> {
        ContentDigest::from_hex(&self.aad)
            .map_err(|e| ManifestError::ManifestFormat(format!("aad: {e}")))
    }

    /// The original plaintext digest for the integrity check.
    pub fn original_digest(&self) -> Result<ContentDigest, ManifestError> {
        ContentDigest::from_hex(&self.original_hash)
            .map_err(|e| ManifestError::ManifestFormat(format!("originalHash: {e}")))
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::ManifestFormat(format!("metadata does not parse: {e}")))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::ManifestFormat(format!("metadata serialization: {e}")))
    }

    /// Load from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_crypto::{seal, AgreementSecret};

    fn sealed() -> (EncryptedArtifact, Vec<u8>) {
        let sender = AgreementSecret::from_seed_bytes(CurveId::X25519, [5u8; 32]).unwrap();
        let recipient = AgreementSecret::from_seed_bytes(CurveId::X25519, [6u8; 32]).unwrap();
        let doc = sha256_bytes(b"document");
        let plaintext = b"sidecar test payload".to_vec();
        let (artifact, _) =
            seal(&plaintext, &sender, &recipient.public_key().unwrap(), &doc).unwrap();
        (artifact, plaintext)
    }

    #[test]
    fn metadata_records_artifact_parameters() {
        let (artifact, plaintext) = sealed();
        let meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        assert_eq!(meta.algorithm, AEAD_ALGORITHM);
        assert_eq!(meta.curve, CurveId::X25519);
        assert_eq!(meta.encrypted_size, artifact.ciphertext.len() as u64);
        assert_eq!(meta.iv, hex::encode(&artifact.iv));
        assert_eq!(meta.original_hash, sha256_bytes(&plaintext).to_hex());
    }

    #[test]
    fn artifact_roundtrip_through_metadata() {
        let (artifact, plaintext) = sealed();
        let meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        let rebuilt = meta.to_artifact(artifact.ciphertext.clone()).unwrap();
        assert_eq!(rebuilt, artifact);
    }

    #[test]
    fn json_field_names_are_camel_case() {
        let (artifact, plaintext) = sealed();
        let meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        let val = serde_json::to_value(&meta).unwrap();
        assert!(val.get("senderPublicKey").is_some());
        assert!(val.get("encryptedSize").is_some());
        assert!(val.get("originalHash").is_some());
        assert!(val.get("sender_public_key").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let (artifact, plaintext) = sealed();
        let meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        let back = EncryptionMetadata::from_json(&meta.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let (artifact, plaintext) = sealed();
        let mut meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        meta.algorithm = "rot13".to_string();
        assert!(meta.to_artifact(artifact.ciphertext).is_err());
    }

    #[test]
    fn size_disagreement_rejected() {
        let (artifact, plaintext) = sealed();
        let meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        let mut truncated = artifact.ciphertext.clone();
        truncated.pop();
        let err = meta.to_artifact(truncated).unwrap_err();
        assert!(matches!(err, ManifestError::ManifestFormat(_)));
    }

    #[test]
    fn malformed_iv_rejected() {
        let (artifact, plaintext) = sealed();
        let mut meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        meta.iv = "abcd".to_string();
        assert!(meta.to_artifact(artifact.ciphertext).is_err());
    }

    #[test]
    fn doc_hash_accessor_matches_aad() {
        let (artifact, plaintext) = sealed();
        let meta = EncryptionMetadata::for_artifact(&artifact, &plaintext);
        assert_eq!(meta.doc_hash().unwrap().as_bytes(), &artifact.aad);
    }
}
