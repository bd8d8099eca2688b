//! Serde adapter for 32-byte arrays as lowercase hex strings.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
    let s = String::deserialize(deserializer)?;
    let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| serde::de::Error::custom(format!("expected 32 bytes, got {}", b.len())))
}
