//! Canonical mapping between 256-bit values and the BN254 scalar field.
//!
//! Every public key coordinate, country code, timestamp and account address
//! that crosses the prover/verifier boundary goes through this module. Using
//! an unreduced value anywhere does not fail loudly: the proof simply stops
//! verifying, so all encodings live in one place.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodecError;
use crate::types::{Address, ADDRESS_LEN};

/// Decimal form of the BN254 scalar field order.
pub const FIELD_ORDER_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Maximum number of bytes a short string can pack into one element.
/// The field order is just under 2^254, so 31 bytes always fit unreduced.
pub const SHORT_STRING_CAPACITY: usize = 31;

/// An element of the proving system's scalar field.
///
/// Serialized as a decimal string, matching the public-signal convention of
/// circuit toolchains.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    /// Reduce a big-endian uint256 modulo the field order. Total.
    pub fn reduce(value: &[u8; 32]) -> Self {
        Self(Fr::from_be_bytes_mod_order(value))
    }

    /// Reduce an arbitrary-length big-endian integer modulo the field order.
    pub fn reduce_slice(value: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(value))
    }

    /// Embed a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Canonical 32-byte big-endian representation.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// The canonical representative as an unbounded integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_be_bytes())
    }

    /// Narrow to `u64` if the canonical representative fits.
    pub fn to_u64(&self) -> Option<u64> {
        let bytes = self.to_be_bytes();
        if bytes[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&bytes[24..]);
        Some(u64::from_be_bytes(low))
    }

    /// Truncate to the low 20 bytes; inverse of [`Address::to_field`].
    pub fn to_address(&self) -> Address {
        let bytes = self.to_be_bytes();
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&bytes[32 - ADDRESS_LEN..]);
        Address::from_bytes(out)
    }

    /// The underlying arkworks scalar.
    pub fn inner(&self) -> Fr {
        self.0
    }

    /// Parse a canonical decimal (or `0x`-prefixed hex) representative.
    /// Values at or above the field order are rejected rather than reduced.
    pub fn parse_canonical(s: &str) -> Result<Self, CodecError> {
        let trimmed = s.trim();
        let value = match trimmed.strip_prefix("0x") {
            Some(hex_digits) => BigUint::parse_bytes(hex_digits.as_bytes(), 16),
            None => BigUint::parse_bytes(trimmed.as_bytes(), 10),
        }
        .ok_or_else(|| CodecError::NonCanonical(format!("not an integer: {:?}", s)))?;

        if value >= field_order() {
            return Err(CodecError::NonCanonical(format!(
                "{} is not below the field order",
                value
            )));
        }
        Ok(Self::reduce_slice(&value.to_bytes_be()))
    }
}

/// The BN254 scalar field order as an integer.
pub fn field_order() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}

/// Big-endian byte-pack a short string: `Σ byte[i] · 256^(n-1-i)`.
pub fn encode_short_string(s: &str) -> Result<FieldElement, CodecError> {
    let bytes = s.as_bytes();
    if bytes.len() > SHORT_STRING_CAPACITY {
        return Err(CodecError::EncodingTooLong {
            len: bytes.len(),
            capacity: SHORT_STRING_CAPACITY,
        });
    }
    let mut packed = [0u8; 32];
    packed[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(FieldElement::reduce(&packed))
}

/// Unpack a string produced by [`encode_short_string`].
/// Leading NUL bytes are not recoverable and are dropped.
pub fn decode_short_string(value: &FieldElement) -> Result<String, CodecError> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    if bytes.len() - start > SHORT_STRING_CAPACITY {
        return Err(CodecError::EncodingTooLong {
            len: bytes.len() - start,
            capacity: SHORT_STRING_CAPACITY,
        });
    }
    String::from_utf8(bytes[start..].to_vec()).map_err(|_| CodecError::InvalidUtf8)
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_biguint())
    }
}

impl FromStr for FieldElement {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_canonical(s)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_canonical(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_constant_matches_modulus() {
        assert_eq!(field_order().to_string(), FIELD_ORDER_DECIMAL);
    }

    #[test]
    fn test_reduce_small_value_unchanged() {
        let mut bytes = [0u8; 32];
        bytes[31] = 42;
        assert_eq!(FieldElement::reduce(&bytes), FieldElement::from_u64(42));
    }

    #[test]
    fn test_reduce_modulus_is_zero() {
        let modulus = field_order().to_bytes_be();
        let mut bytes = [0u8; 32];
        bytes[32 - modulus.len()..].copy_from_slice(&modulus);
        assert_eq!(FieldElement::reduce(&bytes), FieldElement::zero());
    }

    #[test]
    fn test_reduce_idempotent() {
        let samples = [[0xFFu8; 32], [0x30u8; 32], [0x00u8; 32], {
            let mut b = [0u8; 32];
            b[0] = 0x80;
            b
        }];
        for raw in samples {
            let once = FieldElement::reduce(&raw);
            let twice = FieldElement::reduce(&once.to_be_bytes());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_reduce_max_uint256() {
        let reduced = FieldElement::reduce(&[0xFFu8; 32]);
        let expected = (BigUint::from_bytes_be(&[0xFFu8; 32])) % field_order();
        assert_eq!(reduced.to_biguint(), expected);
    }

    #[test]
    fn test_encode_short_string_us() {
        let us = encode_short_string("US").unwrap();
        assert_eq!(us, FieldElement::from_u64(0x5553));
        assert_eq!(us.to_string(), "21843");
    }

    #[test]
    fn test_encode_empty_string_is_zero() {
        assert_eq!(encode_short_string("").unwrap(), FieldElement::zero());
    }

    #[test]
    fn test_encode_at_capacity() {
        let s = "A".repeat(SHORT_STRING_CAPACITY);
        let encoded = encode_short_string(&s).unwrap();
        assert_eq!(decode_short_string(&encoded).unwrap(), s);
    }

    #[test]
    fn test_encode_too_long() {
        let s = "A".repeat(SHORT_STRING_CAPACITY + 1);
        let err = encode_short_string(&s).unwrap_err();
        assert_eq!(
            err,
            CodecError::EncodingTooLong {
                len: 32,
                capacity: SHORT_STRING_CAPACITY
            }
        );
    }

    #[test]
    fn test_decode_short_string() {
        let encoded = encode_short_string("BR").unwrap();
        assert_eq!(decode_short_string(&encoded).unwrap(), "BR");
    }

    #[test]
    fn test_to_u64() {
        assert_eq!(FieldElement::from_u64(1_717_200_000).to_u64(), Some(1_717_200_000));
        assert_eq!(FieldElement::reduce(&[0x11u8; 32]).to_u64(), None);
    }

    #[test]
    fn test_address_roundtrip() {
        let addr: Address = "0x00000000000000000000000000000000deadbeef".parse().unwrap();
        let fe = addr.to_field();
        assert_eq!(fe.to_u64(), Some(0xdeadbeef));
        assert_eq!(fe.to_address(), addr);
    }

    #[test]
    fn test_parse_canonical_decimal_and_hex() {
        let a: FieldElement = "21843".parse().unwrap();
        let b: FieldElement = "0x5553".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_field_order() {
        assert!(FieldElement::parse_canonical(FIELD_ORDER_DECIMAL).is_err());
        assert!(FieldElement::parse_canonical("not-a-number").is_err());
    }

    #[test]
    fn test_serde_decimal_string() {
        let fe = FieldElement::from_u64(18);
        let json = serde_json::to_string(&fe).unwrap();
        assert_eq!(json, "\"18\"");
        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fe);
    }
}
