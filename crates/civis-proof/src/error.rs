use crate::circuit::ConstraintCategory;

/// Zero-knowledge proof errors.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("constraint violation: {}", join_categories(.failed))]
    ConstraintViolation { failed: Vec<ConstraintCategory> },

    #[error("proof generation failed: {0}")]
    GenerationFailed(String),

    #[error("invalid proof data: {0}")]
    InvalidProofData(String),

    #[error("invalid verifying key: {0}")]
    InvalidVerifyingKey(String),

    #[error("proving task failed: {0}")]
    TaskFailed(String),

    #[error("credential error: {0}")]
    Credential(#[from] civis_credentials::CredentialError),

    #[error("crypto error: {0}")]
    Crypto(#[from] civis_crypto::CryptoError),

    #[error("core error: {0}")]
    Core(#[from] civis_core::CoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

fn join_categories(failed: &[ConstraintCategory]) -> String {
    failed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
