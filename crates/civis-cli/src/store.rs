//! File persistence for the registry, the audit log and JSON artefacts.

use anyhow::Context;
use std::path::Path;

use civis_core::Address;
use civis_credentials::Credential;
use civis_crypto::KeyPair;
use civis_gateway::{AuditLog, IssuerRegistry};
use civis_proof::ProofBundle;

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Write `contents`, creating parent directories.
pub fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))
}

/// Load the registry snapshot, or start an empty registry owned by `owner`.
pub fn load_registry(path: &Path, owner: Address) -> anyhow::Result<IssuerRegistry> {
    if !path.exists() {
        return Ok(IssuerRegistry::new(owner));
    }
    Ok(IssuerRegistry::from_json(&read(path)?)?)
}

pub fn save_registry(path: &Path, registry: &IssuerRegistry) -> anyhow::Result<()> {
    write(path, &registry.to_json()?)
}

pub fn load_audit_log(path: &Path) -> anyhow::Result<AuditLog> {
    if !path.exists() {
        return Ok(AuditLog::new());
    }
    Ok(AuditLog::from_json(&read(path)?)?)
}

pub fn save_audit_log(path: &Path, log: &AuditLog) -> anyhow::Result<()> {
    write(path, &log.to_json()?)
}

pub fn load_credential(path: &Path) -> anyhow::Result<Credential> {
    Credential::from_json(&read(path)?)
        .with_context(|| format!("invalid credential {}", path.display()))
}

pub fn load_bundle(path: &Path) -> anyhow::Result<ProofBundle> {
    ProofBundle::from_json(&read(path)?)
        .with_context(|| format!("invalid proof bundle {}", path.display()))
}

pub fn load_keypair(path: &Path) -> anyhow::Result<KeyPair> {
    KeyPair::from_hex(&read(path)?).with_context(|| format!("invalid key file {}", path.display()))
}
