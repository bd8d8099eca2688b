//! `civis prove`: Assemble an eligibility proof from two credentials.

use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use civis_core::Address;
use civis_credentials::date_to_timestamp;
use civis_proof::{AssemblyRequest, ConstraintMode, ProofAssembler, SimulatedBackend};

use crate::commands::parse_date;
use crate::config::{BackendKind, CivisConfig};
use crate::store;

#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Date-of-birth credential JSON.
    #[arg(long)]
    pub dob: PathBuf,

    /// Citizenship credential JSON.
    #[arg(long)]
    pub citizenship: PathBuf,

    /// Wallet that will submit the proof.
    #[arg(long)]
    pub wallet: Address,

    /// Date to prove against (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub current_date: Option<String>,

    /// Override the configured circuit variant (strict, permissive).
    #[arg(long)]
    pub mode: Option<ConstraintMode>,

    /// Output file for the proof bundle.
    #[arg(short, long)]
    pub out: PathBuf,
}

pub async fn run(args: &ProveArgs, config: &CivisConfig) -> anyhow::Result<()> {
    if config.backend()? == BackendKind::Groth16 {
        anyhow::bail!(
            "groth16 proofs are generated by the circuit toolchain; `civis prove` drives the simulated backend only"
        );
    }
    let mode = match args.mode {
        Some(mode) => mode,
        None => config.mode()?,
    };
    let current_date = match &args.current_date {
        Some(date) => date_to_timestamp(parse_date(date)?)?,
        None => u64::try_from(Utc::now().timestamp())?,
    };

    let request = AssemblyRequest {
        date_of_birth: store::load_credential(&args.dob)?,
        citizenship: store::load_credential(&args.citizenship)?,
        wallet: args.wallet,
        current_date,
    };

    let backend = Arc::new(SimulatedBackend::new(&config.backend_seed()?, mode));
    let assembler = ProofAssembler::new(backend, config.protocol().policy()?);

    let bundle = assembler.assemble_off_thread(request).await?;
    store::write(&args.out, &bundle.to_json()?)?;

    println!("Eligibility proof generated!");
    println!("  Mode:    {}", bundle.mode);
    println!("  Wallet:  {}", args.wallet);
    println!("  Date:    {}", bundle.signals.current_date);
    println!("  Written: {}", args.out.display());
    if bundle.mode == ConstraintMode::Permissive {
        println!("  Warning: permissive proofs do not demonstrate eligibility");
    }

    Ok(())
}
