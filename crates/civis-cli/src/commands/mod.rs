pub mod init;
pub mod inspect;
pub mod issue;
pub mod keygen;
pub mod prove;
pub mod registry;
pub mod verify;

use anyhow::Context;
use chrono::NaiveDate;
use std::sync::Arc;

use civis_gateway::VerificationGateway;
use civis_proof::{Groth16Verifier, PairingVerifier, SimulatedBackend};

use crate::config::{BackendKind, CivisConfig};
use crate::store;

/// Parse a `YYYY-MM-DD` date.
pub(crate) fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date {:?}, expected YYYY-MM-DD", value))
}

/// Pairing verifier for `[gateway] verifier_mode` on the configured backend.
fn build_verifier(config: &CivisConfig) -> anyhow::Result<Arc<dyn PairingVerifier>> {
    let mode = config.verifier_mode()?;
    let verifier: Arc<dyn PairingVerifier> = match config.backend()? {
        BackendKind::Simulated => Arc::new(SimulatedBackend::new(&config.backend_seed()?, mode)),
        BackendKind::Groth16 => {
            Arc::new(Groth16Verifier::from_bytes(&config.verifying_key()?, mode)?)
        }
    };
    Ok(verifier)
}

/// Gateway wired to the configured backend, registry and audit log.
pub(crate) fn build_gateway(config: &CivisConfig) -> anyhow::Result<VerificationGateway> {
    let owner = config.owner()?;
    let protocol = config.protocol();
    let registry = store::load_registry(&config.storage.registry_path, owner)?;
    let audit = store::load_audit_log(&config.storage.audit_path)?;

    Ok(VerificationGateway::new(
        owner,
        Arc::new(registry),
        build_verifier(config)?,
        protocol.policy()?,
    )
    .with_freshness_window(protocol.freshness_window()?)
    .with_audit_log(audit))
}
