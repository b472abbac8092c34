//! # Agreement Secrets — Scoped Private-Key Handles
//!
//! Private scalars for key agreement are held only inside
//! [`AgreementSecret`]: loaded immediately before a seal/open call, consumed
//! through a narrow API, and zeroized when the handle drops — on success,
//! error, and cancellation paths alike. No function in this workspace
//! accepts or returns raw private-key bytes outside this module's
//! constructors, and nothing persists them.
//!
//! ## Curve Families
//!
//! The key-agreement curve is interchangeable per deployment:
//!
//! - [`CurveId::X25519`] — Curve25519 Montgomery ladder.
//! - [`CurveId::P256`] — NIST P-256 weierstrass ECDH.
//!
//! Binding and artifact-hash semantics downstream are curve-agnostic.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

use shroud_core::hex;

use crate::error::CryptoError;

/// The key-agreement curve family, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveId {
    /// Curve25519 (X25519 function). 32-byte public keys.
    X25519,
    /// NIST P-256. 33-byte SEC1 compressed public keys.
    P256,
}

impl CurveId {
    /// Curve identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X25519 => "x25519",
            Self::P256 => "p256",
        }
    }

    /// Domain-separation label mixed into the key derivation info.
    pub(crate) fn kdf_label(&self) -> &'static [u8] {
        match self {
            Self::X25519 => b"x25519",
            Self::P256 => b"p256",
        }
    }
}

impl std::fmt::Display for CurveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurveId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x25519" => Ok(Self::X25519),
            "p256" | "p-256" | "secp256r1" => Ok(Self::P256),
            other => Err(CryptoError::KeyAgreement(format!(
                "unknown curve identifier: {other:?}"
            ))),
        }
    }
}

/// A scoped private scalar for one curve family.
///
/// The scalar lives in a [`Zeroizing`] buffer and is wiped when the handle
/// drops. The only operations are public-key derivation and shared-secret
/// computation; raw scalar bytes are unreachable.
pub struct AgreementSecret {
    curve: CurveId,
    scalar: Zeroizing<[u8; 32]>,
}

impl AgreementSecret {
    /// Generate a fresh secret from the OS CSPRNG.
    pub fn generate(curve: CurveId) -> Self {
        match curve {
            CurveId::X25519 => {
                let secret = StaticSecret::random_from_rng(OsRng);
                Self {
                    curve,
                    scalar: Zeroizing::new(secret.to_bytes()),
                }
            }
            CurveId::P256 => {
                let secret = p256::SecretKey::random(&mut OsRng);
                Self {
                    curve,
                    scalar: Zeroizing::new(secret.to_bytes().into()),
                }
            }
        }
    }

    /// Load a secret from a 32-byte seed.
    ///
    /// P-256 scalars are validated (nonzero, below the group order);
    /// X25519 accepts any 32 bytes and clamps at use.
    pub fn from_seed_bytes(curve: CurveId, seed: [u8; 32]) -> Result<Self, CryptoError> {
        if curve == CurveId::P256 {
            p256::SecretKey::from_slice(&seed).map_err(|e| {
                CryptoError::KeyAgreement(format!("invalid P-256 secret scalar: {e}"))
            })?;
        }
        Ok(Self {
            curve,
            scalar: Zeroizing::new(seed),
        })
    }

    /// Load a secret from a 64-hex-char seed string.
    pub fn from_seed_hex(curve: CurveId, seed_hex: &str) -> Result<Self, CryptoError> {
        let seed = hex::decode_array32(seed_hex)
            .map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        Self::from_seed_bytes(curve, seed)
    }

    /// The curve family this secret belongs to.
    pub fn curve(&self) -> CurveId {
        self.curve
    }

    /// Derive the public key (32 bytes for X25519, 33-byte compressed SEC1
    /// for P-256).
    pub fn public_key(&self) -> Result<Vec<u8>, CryptoError> {
        match self.curve {
            CurveId::X25519 => {
                let secret = StaticSecret::from(*self.scalar);
                Ok(X25519PublicKey::from(&secret).as_bytes().to_vec())
            }
            CurveId::P256 => {
                let secret = p256::SecretKey::from_slice(self.scalar.as_ref()).map_err(|e| {
                    CryptoError::KeyAgreement(format!("invalid P-256 secret scalar: {e}"))
                })?;
                Ok(secret
                    .public_key()
                    .to_encoded_point(true)
                    .as_bytes()
                    .to_vec())
            }
        }
    }

    /// Compute the ECDH shared secret with a peer public key.
    ///
    /// The result is itself zeroized on drop; callers feed it straight into
    /// the key derivation and let it fall out of scope.
    pub(crate) fn shared_secret(
        &self,
        peer_public: &[u8],
    ) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
        match self.curve {
            CurveId::X25519 => {
                let peer: [u8; 32] = peer_public.try_into().map_err(|_| {
                    CryptoError::KeyAgreement(format!(
                        "expected 32-byte X25519 public key, got {} bytes",
                        peer_public.len()
                    ))
                })?;
                let secret = StaticSecret::from(*self.scalar);
                let shared = secret.diffie_hellman(&X25519PublicKey::from(peer));
                if !shared.was_contributory() {
                    return Err(CryptoError::KeyAgreement(
                        "non-contributory shared secret (low-order peer key)".to_string(),
                    ));
                }
                Ok(Zeroizing::new(*shared.as_bytes()))
            }
            CurveId::P256 => {
                let secret = p256::SecretKey::from_slice(self.scalar.as_ref()).map_err(|e| {
                    CryptoError::KeyAgreement(format!("invalid P-256 secret scalar: {e}"))
                })?;
                let peer = p256::PublicKey::from_sec1_bytes(peer_public).map_err(|e| {
                    CryptoError::KeyAgreement(format!("invalid P-256 public key: {e}"))
                })?;
                let shared =
                    p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
                let mut out = Zeroizing::new([0u8; 32]);
                out.copy_from_slice(shared.raw_secret_bytes().as_slice());
                Ok(out)
            }
        }
    }
}

impl std::fmt::Debug for AgreementSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgreementSecret")
            .field("curve", &self.curve)
            .field("scalar", &"<redacted>")
            .finish()
    }
}
