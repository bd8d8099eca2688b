use civis_core::AttestationKind;

/// Credential system errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("issuance failed: {0}")]
    IssuanceFailed(String),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("wrong attestation kind: expected {expected}, got {actual}")]
    WrongKind {
        expected: AttestationKind,
        actual: AttestationKind,
    },

    #[error("crypto error: {0}")]
    Crypto(#[from] civis_crypto::CryptoError),

    #[error("encoding error: {0}")]
    Codec(#[from] civis_core::CodecError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
