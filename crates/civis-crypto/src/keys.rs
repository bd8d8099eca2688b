use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use civis_core::{FieldElement, ReducedPublicKey};

use crate::error::CryptoError;

/// secp256k1 issuer key pair.
/// Private key material is zeroized on drop.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a key pair from a 32-byte big-endian secret scalar.
    /// Fails for zero and for values at or above the curve order.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(seed)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid secret scalar: {}", e)))?;
        Ok(Self { signing_key })
    }

    /// Create a key pair from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(bytes);
        let kp = Self::from_seed(&seed);
        seed.zeroize();
        kp
    }

    /// Decode a hex-encoded secret.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(hex_str.trim().trim_start_matches("0x"))
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        let kp = Self::from_bytes(&bytes);
        bytes.zeroize();
        kp
    }

    /// Get the public key.
    pub fn public_key(&self) -> IssuerPublicKey {
        IssuerPublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Get the raw private key bytes (32 bytes).
    /// Prefer the signing functions; this exists for key files.
    pub fn secret_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// Hex-encoded secret, for key files.
    pub fn secret_hex(&self) -> String {
        let mut bytes = self.secret_bytes();
        let encoded = hex::encode(bytes);
        bytes.zeroize();
        encoded
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

/// A full secp256k1 public key as big-endian affine coordinates.
///
/// These coordinates are 256-bit values and do not fit the proving field;
/// only [`IssuerPublicKey::reduced`] may appear in public signals or registry
/// lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerPublicKey {
    #[serde(with = "crate::hex32")]
    pub x: [u8; 32],
    #[serde(with = "crate::hex32")]
    pub y: [u8; 32],
}

impl IssuerPublicKey {
    pub(crate) fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.as_affine().to_encoded_point(false);
        // Uncompressed SEC1: 0x04 || x || y. A verifying key is never the identity.
        let bytes = point.as_bytes();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[1..33]);
        y.copy_from_slice(&bytes[33..65]);
        Self { x, y }
    }

    /// Uncompressed SEC1 encoding (65 bytes).
    pub fn to_sec1_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x);
        out[33..].copy_from_slice(&self.y);
        out
    }

    /// Parse a SEC1 encoding (compressed or uncompressed), checking the point is on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid public key: {}", e)))?;
        Ok(Self::from_verifying_key(&key))
    }

    pub(crate) fn to_verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        VerifyingKey::from_sec1_bytes(&self.to_sec1_bytes())
            .map_err(|e| CryptoError::InvalidKey(format!("point not on curve: {}", e)))
    }

    /// Both coordinates reduced into the proving field.
    pub fn reduced(&self) -> ReducedPublicKey {
        ReducedPublicKey::new(FieldElement::reduce(&self.x), FieldElement::reduce(&self.y))
    }

    /// Encode as hex (uncompressed SEC1).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_sec1_bytes())
    }

    /// Decode from hex (SEC1).
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim().trim_start_matches("0x"))
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        Self::from_sec1_bytes(&bytes)
    }
}
