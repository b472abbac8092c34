//! # Artifact Envelopes — Authenticated Key-Agreement Encryption
//!
//! Encrypts a payload for a recipient and binds the ciphertext to one
//! specific signed document:
//!
//! ```text
//! ECDH(sender_secret, recipient_public)
//!        │
//!        ▼
//! HKDF-SHA256 (salt = protocol context, info = curve label || doc hash)
//!        │
//!        ▼
//! AES-256-GCM (fresh 12-byte nonce, AAD = document digest)
//! ```
//!
//! ## Security Invariant
//!
//! The document digest rides as AAD, so decrypting with the correct key but
//! the wrong document fails tag verification — it does not produce garbage
//! plaintext. Tag failures of any cause (tampered ciphertext, wrong key,
//! wrong AAD) surface as [`CryptoError::Authentication`] with no partial
//! plaintext output.
//!
//! The public commitment to the artifact is `SHA256(ciphertext)` — the
//! plaintext never appears in any persisted binding.

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use hkdf::Hkdf;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use shroud_core::{sha256_bytes, ContentDigest};

use crate::error::CryptoError;
use crate::secret::{AgreementSecret, CurveId};

/// AEAD algorithm identifier recorded in encryption metadata.
pub const AEAD_ALGORITHM: &str = "aes-256-gcm";

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// HKDF salt fixing the protocol context for key derivation.
const KDF_SALT: &[u8] = b"shroud.envelope.v1";

/// An encrypted artifact and the metadata needed to decrypt it.
///
/// The authentication tag is embedded at the end of `ciphertext`. Key
/// material is deliberately absent — only public values are carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedArtifact {
    /// AEAD ciphertext with the 16-byte tag appended.
    pub ciphertext: Vec<u8>,
    /// The AES-GCM nonce.
    pub iv: [u8; NONCE_LEN],
    /// The sender's ephemeral-use public key for the recipient's ECDH.
    pub sender_public_key: Vec<u8>,
    /// The key-agreement curve family used.
    pub curve: CurveId,
    /// The document digest authenticated alongside the ciphertext.
    pub aad: [u8; 32],
}

impl EncryptedArtifact {
    /// The public commitment to this artifact: `SHA256(ciphertext)`.
    pub fn artifact_hash(&self) -> ContentDigest {
        sha256_bytes(&self.ciphertext)
    }
}

/// Derive the AES-256 key for one envelope.
///
/// The info string mixes the curve label and the document digest so keys
/// are never shared across curves or documents even for identical ECDH
/// outputs.
fn derive_key(
    shared: &Zeroizing<[u8; 32]>,
    curve: CurveId,
    doc_hash: &ContentDigest,
) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let hk = Hkdf::<Sha256>::new(Some(KDF_SALT), shared.as_ref());
    let mut info = Vec::with_capacity(curve.kdf_label().len() + 32);
    info.extend_from_slice(curve.kdf_label());
    info.extend_from_slice(doc_hash.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(&info, key.as_mut())
        .map_err(|e| CryptoError::Encryption(format!("key derivation failed: {e}")))?;
    Ok(key)
}

/// Encrypt a payload for a recipient, bound to one signed document.
///
/// Returns the artifact and its hash commitment. The sender secret is only
/// read for this call; the derived key and shared secret are zeroized
/// before returning.
///
/// # Errors
///
/// [`CryptoError::KeyAgreement`] for an invalid recipient key and
/// [`CryptoError::Encryption`] if the AEAD rejects the input.
pub fn seal(
    plaintext: &[u8],
    sender: &AgreementSecret,
    recipient_public: &[u8],
    doc_hash: &ContentDigest,
) -> Result<(EncryptedArtifact, ContentDigest), CryptoError> {
    let shared = sender.shared_secret(recipient_public)?;
    let key = derive_key(&shared, sender.curve(), doc_hash)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| CryptoError::Encryption(format!("cipher init failed: {e}")))?;

    let mut iv = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: doc_hash.as_bytes(),
            },
        )
        .map_err(|_| CryptoError::Encryption("AEAD encryption failed".to_string()))?;

    let artifact = EncryptedArtifact {
        ciphertext,
        iv,
        sender_public_key: sender.public_key()?,
        curve: sender.curve(),
        aad: *doc_hash.as_bytes(),
    };
    let artifact_hash = artifact.artifact_hash();
    Ok((artifact, artifact_hash))
}

/// Decrypt an artifact, verifying the document binding.
///
/// `doc_hash` must be the digest of the document the artifact was sealed
/// against; any other value fails authentication. When
/// `expected_plaintext_hash` is given, the decrypted payload's digest is
/// checked against it and a mismatch is reported without returning the
/// plaintext.
///
/// # Errors
///
/// - [`CryptoError::KeyAgreement`] — curve mismatch or invalid sender key.
/// - [`CryptoError::Authentication`] — tag failure (tampered ciphertext,
///   wrong key, or wrong document binding). No partial plaintext.
/// - [`CryptoError::IntegrityMismatch`] — the optional plaintext digest
///   check failed.
pub fn open(
    artifact: &EncryptedArtifact,
    recipient: &AgreementSecret,
    doc_hash: &ContentDigest,
    expected_plaintext_hash: Option<&ContentDigest>,
) -> Result<Vec<u8>, CryptoError> {
    if recipient.curve() != artifact.curve {
        return Err(CryptoError::KeyAgreement(format!(
            "artifact uses {} but the recipient secret is {}",
            artifact.curve,
            recipient.curve()
        )));
    }

    let shared = recipient.shared_secret(&artifact.sender_public_key)?;
    let key = derive_key(&shared, artifact.curve, doc_hash)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| CryptoError::Encryption(format!("cipher init failed: {e}")))?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&artifact.iv),
            Payload {
                msg: &artifact.ciphertext,
                aad: doc_hash.as_bytes(),
            },
        )
        .map_err(|_| {
            CryptoError::Authentication(
                "tag verification failed: tampered ciphertext, wrong key, or wrong document binding"
                    .to_string(),
            )
        })?;

    if let Some(expected) = expected_plaintext_hash {
        let actual = sha256_bytes(&plaintext);
        if &actual != expected {
            return Err(CryptoError::IntegrityMismatch {
                expected: expected.to_hex(),
                actual: actual.to_hex(),
            });
        }
    }

    Ok(plaintext)
}
