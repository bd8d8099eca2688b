//! `civis verify`: Run a proof bundle through the verification gateway.

use clap::Args;
use std::path::PathBuf;

use civis_core::Address;
use civis_gateway::GatewayError;
use civis_proof::ConstraintMode;

use crate::commands::build_gateway;
use crate::config::CivisConfig;
use crate::store;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof bundle JSON (from `civis prove`).
    #[arg(short, long)]
    pub proof: PathBuf,

    /// Address submitting the proof.
    #[arg(long)]
    pub caller: Address,
}

/// What a gateway decision says about the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Eligible,
    Rejected,
    /// Accepted by a permissive verifier: the pairing holds, the claim is unproven.
    Unproven,
}

impl Verdict {
    fn of(accepted: bool, verifier_mode: ConstraintMode) -> Self {
        match (accepted, verifier_mode) {
            (false, _) => Self::Rejected,
            (true, ConstraintMode::Strict) => Self::Eligible,
            (true, ConstraintMode::Permissive) => Self::Unproven,
        }
    }
}

pub fn run(args: &VerifyArgs, config: &CivisConfig) -> anyhow::Result<()> {
    let bundle = store::load_bundle(&args.proof)?;
    let gateway = build_gateway(config)?;

    let record = gateway.verify_and_record(&bundle.proof, &bundle.signal_array(), args.caller);
    store::save_audit_log(&config.storage.audit_path, gateway.audit_log())?;

    println!("Record:  {}", record.id);
    println!("Caller:  {}", record.caller);
    match Verdict::of(record.accepted, gateway.verifier_mode()) {
        Verdict::Eligible => {
            println!("Result:  ACCEPTED");
            Ok(())
        }
        Verdict::Rejected => {
            println!("Result:  REJECTED (run `civis inspect` for details)");
            Err(GatewayError::VerificationRejected.into())
        }
        Verdict::Unproven => {
            println!("Result:  NOT ELIGIBLE (permissive verifier: pairing holds, eligibility unproven)");
            anyhow::bail!("gateway.verifier_mode is permissive; set it to strict to decide eligibility")
        }
    }
}
