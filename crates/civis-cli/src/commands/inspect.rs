//! `civis inspect`: Explain which gateway checks a proof bundle fails.

use clap::Args;
use std::path::PathBuf;

use civis_core::Address;

use crate::commands::build_gateway;
use crate::config::CivisConfig;
use crate::store;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Proof bundle JSON (from `civis prove`).
    #[arg(short, long)]
    pub proof: PathBuf,

    /// Address that would submit the proof.
    #[arg(long)]
    pub caller: Address,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &InspectArgs, config: &CivisConfig) -> anyhow::Result<()> {
    let bundle = store::load_bundle(&args.proof)?;
    let gateway = build_gateway(config)?;
    let report = gateway.inspect(&bundle.signals, args.caller);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Proof mode: {} (gateway: {})", bundle.mode, gateway.verifier_mode());
    for check in &report.checks {
        let mark = if check.passed { "ok  " } else { "FAIL" };
        match &check.detail {
            Some(detail) => println!("  [{}] {:<12} {}", mark, check.name, detail),
            None => println!("  [{}] {}", mark, check.name),
        }
    }
    println!(
        "Pairing check not replayed; {} of {} checks passed.",
        report.checks.iter().filter(|c| c.passed).count(),
        report.checks.len()
    );

    Ok(())
}
