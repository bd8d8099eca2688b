/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    SigningError(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("hash computation failed: {0}")]
    HashError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
