//! Civis Core: field codec, the public signal contract, and the
//! verification state machine shared by every other crate.

pub mod config;
pub mod error;
pub mod field;
pub mod types;
pub mod verification_state;

pub use config::{
    ProtocolConfig, DEFAULT_FRESHNESS_WINDOW_DAYS, SECONDS_PER_DAY, SECONDS_PER_YEAR,
};
pub use error::{CodecError, CoreError};
pub use field::{decode_short_string, encode_short_string, FieldElement};
pub use types::{
    Address, AttestationKind, PolicyParameters, PublicSignals, ReducedPublicKey,
    PUBLIC_SIGNAL_COUNT,
};
pub use verification_state::{
    GatewayCheck, StageOutcome, VerificationStage, VerificationStateMachine,
};
