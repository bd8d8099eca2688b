use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, CoreError};
use crate::field::{encode_short_string, FieldElement};

/// Width of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Number of public signals crossing the prover/verifier boundary.
pub const PUBLIC_SIGNAL_COUNT: usize = 9;

/// Positions in the public signal vector. Only [`PublicSignals::to_array`]
/// and [`PublicSignals::from_array`] should index by these.
pub mod signal_index {
    pub const CURRENT_DATE: usize = 0;
    pub const MIN_AGE: usize = 1;
    pub const REQUIRED_CITIZENSHIP: usize = 2;
    pub const ISSUER_A_X: usize = 3;
    pub const ISSUER_A_Y: usize = 4;
    pub const ISSUER_B_X: usize = 5;
    pub const ISSUER_B_Y: usize = 6;
    pub const SUBJECT_KEY: usize = 7;
    pub const SUBJECT_WALLET: usize = 8;
}

/// A fixed-width account address (`0x`-prefixed hex in text form).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Wrap raw address bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Zero-extend into a field element.
    pub fn to_field(&self) -> FieldElement {
        let mut bytes = [0u8; 32];
        bytes[32 - ADDRESS_LEN..].copy_from_slice(&self.0);
        FieldElement::reduce(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("0x");
        let bytes = hex::decode(digits)
            .map_err(|e| CodecError::InvalidAddress(format!("{}: {}", s, e)))?;
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            CodecError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LEN,
                b.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The fact an issuer attests to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationKind {
    /// Subject value is a Unix timestamp of the holder's birth.
    DateOfBirth,
    /// Subject value is a short-string-encoded country code.
    Citizenship,
}

impl AttestationKind {
    /// Domain-separation tag used when hashing registry keys.
    pub fn tag(&self) -> u8 {
        match self {
            Self::DateOfBirth => 1,
            Self::Citizenship => 2,
        }
    }
}

impl fmt::Display for AttestationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateOfBirth => write!(f, "DateOfBirth"),
            Self::Citizenship => write!(f, "Citizenship"),
        }
    }
}

impl FromStr for AttestationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dob" | "date_of_birth" | "dateofbirth" => Ok(Self::DateOfBirth),
            "citizenship" => Ok(Self::Citizenship),
            other => Err(CoreError::ValidationError(format!(
                "unknown attestation kind: {}",
                other
            ))),
        }
    }
}

/// An issuer public key with both coordinates reduced into the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReducedPublicKey {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl ReducedPublicKey {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ReducedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Verifier policy: the age threshold and the single accepted citizenship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyParameters {
    /// Minimum age in whole years.
    pub min_age: u64,
    /// Short-string encoding of the required country code.
    pub required_citizenship: FieldElement,
}

impl PolicyParameters {
    /// Build a policy from a plain country code.
    pub fn new(min_age: u64, required_citizenship: &str) -> Result<Self, CodecError> {
        Ok(Self {
            min_age,
            required_citizenship: encode_short_string(required_citizenship)?,
        })
    }

    /// `min_age` as it appears in the public signals.
    pub fn min_age_field(&self) -> FieldElement {
        FieldElement::from_u64(self.min_age)
    }
}

impl Default for PolicyParameters {
    fn default() -> Self {
        Self {
            min_age: 18,
            // "US"
            required_citizenship: FieldElement::from_u64(0x5553),
        }
    }
}

/// The nine public signals of an eligibility proof, by name.
///
/// The positional vector is converted into this struct as soon as it enters
/// the process; the rest of the code base never indexes by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSignals {
    /// Unix timestamp (seconds) the holder claims as "now".
    pub current_date: FieldElement,
    pub min_age: FieldElement,
    pub required_citizenship: FieldElement,
    /// Date-of-birth issuer key.
    pub issuer_a: ReducedPublicKey,
    /// Citizenship issuer key.
    pub issuer_b: ReducedPublicKey,
    /// Key both credentials were issued to.
    pub subject_key: FieldElement,
    /// Wallet the proof is bound to.
    pub subject_wallet: FieldElement,
}

impl PublicSignals {
    /// Positional form, in the order the proving toolchain expects.
    pub fn to_array(&self) -> [FieldElement; PUBLIC_SIGNAL_COUNT] {
        use signal_index::*;
        let mut out = [FieldElement::zero(); PUBLIC_SIGNAL_COUNT];
        out[CURRENT_DATE] = self.current_date;
        out[MIN_AGE] = self.min_age;
        out[REQUIRED_CITIZENSHIP] = self.required_citizenship;
        out[ISSUER_A_X] = self.issuer_a.x;
        out[ISSUER_A_Y] = self.issuer_a.y;
        out[ISSUER_B_X] = self.issuer_b.x;
        out[ISSUER_B_Y] = self.issuer_b.y;
        out[SUBJECT_KEY] = self.subject_key;
        out[SUBJECT_WALLET] = self.subject_wallet;
        out
    }

    /// Wrap a positional vector.
    pub fn from_array(values: &[FieldElement; PUBLIC_SIGNAL_COUNT]) -> Self {
        use signal_index::*;
        Self {
            current_date: values[CURRENT_DATE],
            min_age: values[MIN_AGE],
            required_citizenship: values[REQUIRED_CITIZENSHIP],
            issuer_a: ReducedPublicKey::new(values[ISSUER_A_X], values[ISSUER_A_Y]),
            issuer_b: ReducedPublicKey::new(values[ISSUER_B_X], values[ISSUER_B_Y]),
            subject_key: values[SUBJECT_KEY],
            subject_wallet: values[SUBJECT_WALLET],
        }
    }

    /// Wrap a positional vector of unchecked length.
    pub fn from_slice(values: &[FieldElement]) -> Result<Self, CoreError> {
        let arr: &[FieldElement; PUBLIC_SIGNAL_COUNT] =
            values
                .try_into()
                .map_err(|_| CoreError::InvalidSignalVector {
                    expected: PUBLIC_SIGNAL_COUNT,
                    actual: values.len(),
                })?;
        Ok(Self::from_array(arr))
    }
}
