use ark_bn254::{Bn254, G1Affine, G2Affine};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use civis_core::{FieldElement, PublicSignals, PUBLIC_SIGNAL_COUNT};

use crate::circuit::ConstraintMode;
use crate::error::ProofError;

/// A Groth16 proof on BN254: `a ∈ G1`, `b ∈ G2`, `c ∈ G1`.
///
/// Opaque on its own; only meaningful together with its public signals.
/// Serialized as hex of the compressed canonical encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Proof(ark_groth16::Proof<Bn254>);

// `ark_groth16::Proof` only derives `Eq` under bounds BN254 doesn't name; its
// curve points are `Eq`, so equality is a true equivalence.
impl Eq for Proof {}

impl Proof {
    pub fn from_parts(a: G1Affine, b: G2Affine, c: G1Affine) -> Self {
        Self(ark_groth16::Proof { a, b, c })
    }

    pub fn a(&self) -> G1Affine {
        self.0.a
    }

    pub fn b(&self) -> G2Affine {
        self.0.b
    }

    pub fn c(&self) -> G1Affine {
        self.0.c
    }

    pub fn inner(&self) -> &ark_groth16::Proof<Bn254> {
        &self.0
    }

    /// Compressed canonical encoding (128 bytes).
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProofError> {
        let mut bytes = Vec::with_capacity(self.0.compressed_size());
        self.0
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProofError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Decode and subgroup-check a compressed proof.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        ark_groth16::Proof::<Bn254>::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| ProofError::InvalidProofData(e.to_string()))
    }

    pub fn to_hex(&self) -> Result<String, ProofError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ProofError> {
        let bytes = hex::decode(hex_str.trim().trim_start_matches("0x"))
            .map_err(|e| ProofError::InvalidProofData(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl From<ark_groth16::Proof<Bn254>> for Proof {
    fn from(inner: ark_groth16::Proof<Bn254>) -> Self {
        Self(inner)
    }
}

impl Serialize for Proof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.to_hex().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Proof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// What a holder hands to a verifier: the proof, its named public signals,
/// and the circuit variant that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub mode: ConstraintMode,
    pub proof: Proof,
    pub signals: PublicSignals,
}

impl ProofBundle {
    /// Positional public inputs, as submitted to a verifier.
    pub fn signal_array(&self) -> [FieldElement; PUBLIC_SIGNAL_COUNT] {
        self.signals.to_array()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ProofError> {
        serde_json::to_string_pretty(self).map_err(|e| ProofError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProofError> {
        serde_json::from_str(json).map_err(|e| ProofError::Serialization(e.to_string()))
    }
}
