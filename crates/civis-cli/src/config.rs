//! CLI configuration loading and management.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use civis_core::{Address, ProtocolConfig, DEFAULT_FRESHNESS_WINDOW_DAYS};
use civis_proof::ConstraintMode;

/// Full configuration for the `civis` tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CivisConfig {
    /// Verifier policy.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Proving backend settings.
    #[serde(default)]
    pub prover: ProverConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Minimum age in whole years.
    #[serde(default = "default_min_age")]
    pub min_age: u64,
    /// Required country code.
    #[serde(default = "default_required_citizenship")]
    pub required_citizenship: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Days `current_date` may deviate from the gateway clock.
    #[serde(default = "default_freshness_window_days")]
    pub freshness_window_days: u64,
    /// Address allowed to change the registry and the policy.
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Verifying key variant the gateway checks proofs against (strict,
    /// permissive). Independent of `prover.mode`.
    #[serde(default = "default_mode")]
    pub verifier_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Circuit variant (strict, permissive).
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Proving system (simulated, groth16).
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Hex-encoded 32-byte seed of the simulated backend.
    #[serde(default)]
    pub backend_seed: String,
    /// Compressed Groth16 verifying key exported by the circuit toolchain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_key_path: Option<PathBuf>,
}

/// Proving system behind the gateway's pairing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Keyed stand-in, seeded by `prover.backend_seed`.
    Simulated,
    /// Groth16 over BN254; proofs come from the external toolchain.
    Groth16,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "groth16" => Ok(Self::Groth16),
            other => anyhow::bail!("unknown prover backend: {}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Issuer registry snapshot (JSON).
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
    /// Verification audit log (JSON).
    #[serde(default = "default_audit_path")]
    pub audit_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_min_age() -> u64 {
    18
}
fn default_required_citizenship() -> String {
    "US".into()
}
fn default_freshness_window_days() -> u64 {
    DEFAULT_FRESHNESS_WINDOW_DAYS
}
fn default_owner() -> String {
    Address::default().to_string()
}
fn default_mode() -> String {
    "strict".into()
}
fn default_backend() -> String {
    "simulated".into()
}
fn default_registry_path() -> PathBuf {
    PathBuf::from("./data/registry.json")
}
fn default_audit_path() -> PathBuf {
    PathBuf::from("./data/audit.json")
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            required_citizenship: default_required_citizenship(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            freshness_window_days: default_freshness_window_days(),
            owner: default_owner(),
            verifier_mode: default_mode(),
        }
    }
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            backend: default_backend(),
            backend_seed: String::new(),
            verifying_key_path: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            audit_path: default_audit_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CivisConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: CivisConfig = toml::from_str(&contents)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Protocol parameters shared by prover and gateway.
    pub fn protocol(&self) -> ProtocolConfig {
        ProtocolConfig {
            min_age: self.policy.min_age,
            required_citizenship: self.policy.required_citizenship.clone(),
            freshness_window_days: self.gateway.freshness_window_days,
        }
    }

    pub fn owner(&self) -> anyhow::Result<Address> {
        self.gateway
            .owner
            .parse()
            .with_context(|| format!("invalid gateway owner {:?}", self.gateway.owner))
    }

    /// Circuit variant used by `civis prove`.
    pub fn mode(&self) -> anyhow::Result<ConstraintMode> {
        Ok(self.prover.mode.parse()?)
    }

    /// Circuit variant the gateway verifies against.
    pub fn verifier_mode(&self) -> anyhow::Result<ConstraintMode> {
        Ok(self.gateway.verifier_mode.parse()?)
    }

    pub fn backend(&self) -> anyhow::Result<BackendKind> {
        self.prover.backend.parse()
    }

    /// Raw bytes of the Groth16 verifying key.
    pub fn verifying_key(&self) -> anyhow::Result<Vec<u8>> {
        let path = self
            .prover
            .verifying_key_path
            .as_ref()
            .context("prover.verifying_key_path is required for the groth16 backend")?;
        std::fs::read(path).with_context(|| format!("cannot read verifying key {}", path.display()))
    }

    /// The simulated backend seed. Run `civis init` to generate one.
    pub fn backend_seed(&self) -> anyhow::Result<[u8; 32]> {
        if self.prover.backend_seed.is_empty() {
            anyhow::bail!("prover.backend_seed is not set; run `civis init` first");
        }
        let bytes = hex::decode(&self.prover.backend_seed)
            .context("prover.backend_seed is not valid hex")?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| anyhow::anyhow!("prover.backend_seed must be 32 bytes, got {}", b.len()))
    }
}
