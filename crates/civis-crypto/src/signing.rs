use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::Signature;
use serde::{Deserialize, Serialize};

use civis_core::FieldElement;

use crate::error::CryptoError;
use crate::keys::{IssuerPublicKey, KeyPair};

/// secp256k1 ECDSA signature as raw big-endian scalars.
///
/// Stored unparsed so that a tampered signature can still be carried into the
/// constraint model and fail there, instead of failing to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EcdsaSignature {
    #[serde(with = "crate::hex32")]
    pub r: [u8; 32],
    #[serde(with = "crate::hex32")]
    pub s: [u8; 32],
}

impl EcdsaSignature {
    /// `r || s` (64 bytes).
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Create from raw bytes (64 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 64 {
            return Err(CryptoError::MalformedSignature(format!(
                "signature must be 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(Self { r, s })
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim().trim_start_matches("0x"))
            .map_err(|e| CryptoError::MalformedSignature(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// `(r, s)` reduced into the proving field, as the circuit sees them.
    pub fn reduced(&self) -> (FieldElement, FieldElement) {
        (FieldElement::reduce(&self.r), FieldElement::reduce(&self.s))
    }

    fn parse(&self) -> Result<Signature, CryptoError> {
        Signature::from_slice(&self.to_bytes())
            .map_err(|e| CryptoError::MalformedSignature(e.to_string()))
    }
}

/// Sign a field element: ECDSA over its 32-byte big-endian encoding, treated
/// as an already-hashed message. Nonces are RFC 6979 deterministic and the
/// result is low-S normalised.
pub fn sign_field(message: &FieldElement, keypair: &KeyPair) -> Result<EcdsaSignature, CryptoError> {
    let prehash = message.to_be_bytes();
    let sig: Signature = keypair
        .signing_key()
        .sign_prehash(&prehash)
        .map_err(|e| CryptoError::SigningError(e.to_string()))?;
    let sig = sig.normalize_s().unwrap_or(sig);
    EcdsaSignature::from_bytes(&sig.to_bytes())
}

/// Verify a signature produced by [`sign_field`].
pub fn verify_field(
    message: &FieldElement,
    signature: &EcdsaSignature,
    pubkey: &IssuerPublicKey,
) -> Result<(), CryptoError> {
    let sig = signature.parse()?;
    let vk = pubkey.to_verifying_key()?;
    vk.verify_prehash(&message.to_be_bytes(), &sig)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
