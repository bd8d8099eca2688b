//! `civis keygen`: Generate an issuer signing key.

use clap::Args;
use std::path::PathBuf;

use civis_crypto::KeyPair;

use crate::store;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Where to write the hex-encoded secret key.
    #[arg(short, long)]
    pub out: PathBuf,
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    if args.out.exists() {
        anyhow::bail!("refusing to overwrite {}", args.out.display());
    }

    let keypair = KeyPair::generate();
    store::write(&args.out, &keypair.secret_hex())?;

    let public_key = keypair.public_key();
    let reduced = public_key.reduced();
    println!("Issuer key written to {}", args.out.display());
    println!("  Public key: {}", public_key.to_hex());
    println!("  Reduced x:  {}", reduced.x);
    println!("  Reduced y:  {}", reduced.y);

    Ok(())
}
