//! Civis Gateway: the verifier side of the protocol.
//!
//! A [`VerificationGateway`] wraps an opaque pairing check with freshness,
//! policy, issuer-trust and wallet-binding checks, backed by an
//! owner-controlled [`IssuerRegistry`].

pub mod audit;
pub mod clock;
pub mod error;
pub mod gateway;
pub mod inspect;
pub mod registry;

pub use audit::{AuditLog, VerificationRecord};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{GatewayError, RegistryError};
pub use gateway::VerificationGateway;
pub use inspect::{InspectionCheck, InspectionReport};
pub use registry::{IssuerEntry, IssuerRegistry, RegistrySnapshot, SnapshotEntry};
