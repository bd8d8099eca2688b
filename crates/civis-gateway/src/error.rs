use civis_core::Address;

/// Issuer registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("caller {caller} is not the registry owner")]
    NotOwner { caller: Address },

    #[error("corrupt registry snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Verification gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("caller {caller} is not the gateway owner")]
    NotOwner { caller: Address },

    /// Carries no reason; use the inspection report to narrow it down.
    #[error("verification rejected")]
    VerificationRejected,

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("core error: {0}")]
    Core(#[from] civis_core::CoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
