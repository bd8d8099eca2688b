pub mod error;
pub mod hashing;
pub mod hex32;
pub mod keys;
pub mod signing;

pub use error::CryptoError;
pub use hashing::{hash, message_hash, poseidon_hash, registry_key, Hash};
pub use keys::{IssuerPublicKey, KeyPair};
pub use signing::{sign_field, verify_field, EcdsaSignature};
