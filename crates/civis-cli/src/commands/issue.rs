//! `civis issue`: Sign a date-of-birth or citizenship credential.

use clap::Args;
use std::path::PathBuf;

use civis_core::{Address, AttestationKind, FieldElement};
use civis_credentials::{Credential, CredentialIssuer};

use crate::commands::parse_date;
use crate::store;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issuer secret key file (from `civis keygen`).
    #[arg(short, long)]
    pub key: PathBuf,

    /// Attestation kind: dob or citizenship.
    #[arg(long)]
    pub kind: AttestationKind,

    /// Birth date (YYYY-MM-DD) or country code, depending on the kind.
    /// Birth dates before 1970-01-01 are not supported.
    #[arg(long)]
    pub value: String,

    /// Holder wallet address the credential is bound to.
    #[arg(long)]
    pub holder: Address,

    /// Explicit nonce (decimal or 0x-hex). Random when omitted.
    #[arg(long)]
    pub nonce: Option<FieldElement>,

    /// Output file for the credential JSON.
    #[arg(short, long)]
    pub out: PathBuf,
}

pub fn run(args: &IssueArgs) -> anyhow::Result<()> {
    let issuer = CredentialIssuer::new(store::load_keypair(&args.key)?);
    let credential = issue(&issuer, args)?;
    store::write(&args.out, &credential.to_json()?)?;

    println!("Credential issued!");
    println!("  Kind:    {}", credential.attestation_kind);
    println!("  Value:   {}", credential.describe_value());
    println!("  Holder:  {}", args.holder);
    println!("  Issuer:  {}", credential.issuer_public_key);
    println!("  Written: {}", args.out.display());

    Ok(())
}

fn issue(issuer: &CredentialIssuer, args: &IssueArgs) -> anyhow::Result<Credential> {
    let credential = match (args.kind, args.nonce) {
        (AttestationKind::DateOfBirth, None) => {
            issuer.issue_date_of_birth(parse_date(&args.value)?, args.holder)?
        }
        (AttestationKind::Citizenship, None) => {
            issuer.issue_citizenship(&args.value, args.holder)?
        }
        (AttestationKind::DateOfBirth, Some(nonce)) => {
            let timestamp = civis_credentials::date_to_timestamp(parse_date(&args.value)?)?;
            issuer.issue(
                args.kind,
                FieldElement::from_u64(timestamp),
                args.holder,
                nonce,
            )?
        }
        (AttestationKind::Citizenship, Some(nonce)) => issuer.issue(
            args.kind,
            civis_core::encode_short_string(&args.value)?,
            args.holder,
            nonce,
        )?,
    };
    Ok(credential)
}
