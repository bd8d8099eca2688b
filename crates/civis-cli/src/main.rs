//! Civis CLI: issue credentials, assemble eligibility proofs and run the
//! verification gateway against local files.
//!
//! Subcommands: init, keygen, issue, prove, verify, inspect, registry.

mod commands;
mod config;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::CivisConfig;

/// Civis: Private eligibility proofs over issuer-signed credentials.
#[derive(Parser, Debug)]
#[command(name = "civis", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "civis.toml")]
    config: PathBuf,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a fresh configuration with a new backend seed.
    Init(commands::init::InitArgs),
    /// Generate an issuer signing key.
    Keygen(commands::keygen::KeygenArgs),
    /// Issue a date-of-birth or citizenship credential.
    Issue(commands::issue::IssueArgs),
    /// Assemble an eligibility proof from two credentials.
    Prove(commands::prove::ProveArgs),
    /// Verify a proof bundle and record the decision.
    Verify(commands::verify::VerifyArgs),
    /// Explain which gateway checks a proof bundle fails.
    Inspect(commands::inspect::InspectArgs),
    /// Manage the trusted issuer registry.
    Registry(commands::registry::RegistryArgs),
}

fn init_tracing(config: &CivisConfig, override_level: Option<&str>) {
    let level = override_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CivisConfig::load(&cli.config)?;
    init_tracing(&config, cli.log_level.as_deref());

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::Issue(args) => commands::issue::run(args),
        Commands::Prove(args) => commands::prove::run(args, &config).await,
        Commands::Verify(args) => commands::verify::run(args, &config),
        Commands::Inspect(args) => commands::inspect::run(args, &config),
        Commands::Registry(args) => commands::registry::run(args, &config),
    }
}
