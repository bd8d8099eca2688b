//! `civis registry`: Manage trusted issuer keys.

use clap::{Args, Subcommand};

use civis_core::{Address, AttestationKind};
use civis_crypto::IssuerPublicKey;

use crate::config::CivisConfig;
use crate::store;

#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// Trust an issuer key for one attestation kind.
    Add(KeyArgs),
    /// Stop trusting an issuer key.
    Remove(KeyArgs),
    /// List known issuer keys.
    List,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Attestation kind: dob or citizenship.
    #[arg(long)]
    pub kind: AttestationKind,

    /// Issuer public key (SEC1 hex, as printed by `civis keygen`).
    #[arg(long)]
    pub issuer: String,

    /// Address performing the change; must be the registry owner.
    #[arg(long)]
    pub caller: Address,
}

pub fn run(args: &RegistryArgs, config: &CivisConfig) -> anyhow::Result<()> {
    let path = &config.storage.registry_path;
    let registry = store::load_registry(path, config.owner()?)?;

    match &args.command {
        RegistryCommand::Add(key_args) => {
            let key = IssuerPublicKey::from_hex(&key_args.issuer)?.reduced();
            registry.add(key_args.caller, key_args.kind, key)?;
            store::save_registry(path, &registry)?;
            println!("Trusted {} issuer {}", key_args.kind, key);
        }
        RegistryCommand::Remove(key_args) => {
            let key = IssuerPublicKey::from_hex(&key_args.issuer)?.reduced();
            let was_trusted = registry.remove(key_args.caller, key_args.kind, key)?;
            store::save_registry(path, &registry)?;
            if was_trusted {
                println!("Removed {} issuer {}", key_args.kind, key);
            } else {
                println!("{} issuer {} was not trusted", key_args.kind, key);
            }
        }
        RegistryCommand::List => {
            println!("Owner: {}", registry.owner());
            let entries = registry.entries();
            if entries.is_empty() {
                println!("No issuers registered.");
            }
            for entry in entries {
                let status = if entry.trusted { "trusted" } else { "removed" };
                println!("  {:<12} {:<8} {}", entry.kind.to_string(), status, entry.key);
            }
        }
    }

    Ok(())
}
