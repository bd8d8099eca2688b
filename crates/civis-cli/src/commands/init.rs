//! `civis init`: Write a default configuration with a fresh backend seed.

use clap::Args;
use std::path::PathBuf;

use civis_core::Address;

use crate::config::CivisConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Address allowed to manage the registry and policy.
    #[arg(long)]
    pub owner: Option<Address>,

    /// Overwrite an existing configuration.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("civis.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {}",
            config_path.display()
        );
    }

    let mut config = CivisConfig::default();
    config.prover.backend_seed = hex::encode(rand::random::<[u8; 32]>());
    if let Some(owner) = args.owner {
        config.gateway.owner = owner.to_string();
    }
    config.storage.registry_path = args.dir.join("data").join("registry.json");
    config.storage.audit_path = args.dir.join("data").join("audit.json");

    config.save(&config_path)?;
    std::fs::create_dir_all(args.dir.join("data"))?;

    tracing::info!(path = %config_path.display(), "wrote default config");
    println!("Initialized civis at {}", config_path.display());
    println!("  Owner:  {}", config.gateway.owner);
    println!("  Policy: age >= {}, citizenship {}", config.policy.min_age, config.policy.required_citizenship);
    println!("Edit civis.toml to customize the policy.");

    Ok(())
}
