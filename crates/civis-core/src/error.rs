use crate::verification_state::VerificationStage;

/// Errors raised while mapping values into and out of the scalar field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("encoding too long: {len} bytes exceeds field capacity of {capacity} bytes")]
    EncodingTooLong { len: usize, capacity: usize },

    #[error("not a canonical field element: {0}")]
    NonCanonical(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("encoded string is not valid UTF-8")]
    InvalidUtf8,
}

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid verification transition from {from} to {to}")]
    InvalidStateTransition {
        from: VerificationStage,
        to: VerificationStage,
    },

    #[error("public signal vector must have {expected} elements, got {actual}")]
    InvalidSignalVector { expected: usize, actual: usize },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("validation error: {0}")]
    ValidationError(String),
}
