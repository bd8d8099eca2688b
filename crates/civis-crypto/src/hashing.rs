use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

use civis_core::{AttestationKind, FieldElement, ReducedPublicKey};

use crate::error::CryptoError;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Circom-compatible Poseidon over the BN254 scalar field.
pub fn poseidon_hash(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    if inputs.is_empty() {
        return Err(CryptoError::HashError("poseidon needs at least one input".into()));
    }
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())
        .map_err(|e| CryptoError::HashError(format!("poseidon width {}: {}", inputs.len(), e)))?;
    let scalars: Vec<Fr> = inputs.iter().map(FieldElement::inner).collect();
    hasher
        .hash(&scalars)
        .map(FieldElement::from)
        .map_err(|e| CryptoError::HashError(e.to_string()))
}

/// The message an issuer signs: `Poseidon(subject_value, subject_key, nonce)`.
pub fn message_hash(
    subject_value: &FieldElement,
    subject_key: &FieldElement,
    nonce: &FieldElement,
) -> Result<FieldElement, CryptoError> {
    poseidon_hash(&[*subject_value, *subject_key, *nonce])
}

/// Registry key for a reduced issuer public key: `BLAKE3(tag || x || y)`.
///
/// The attestation kind is mixed in so a key trusted to attest one fact is not
/// implicitly trusted for the other.
pub fn registry_key(kind: AttestationKind, key: &ReducedPublicKey) -> Hash {
    let mut input = Vec::with_capacity(65);
    input.push(kind.tag());
    input.extend_from_slice(&key.x.to_be_bytes());
    input.extend_from_slice(&key.y.to_be_bytes());
    hash(&input)
}
