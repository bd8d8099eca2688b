//! Shared fixtures for the cross-crate scenarios: two issuers, a registry
//! that trusts them, and a gateway pinned to 2024-06-01.

use std::sync::Arc;

use chrono::NaiveDate;
use civis_core::{Address, AttestationKind, PolicyParameters};
use civis_credentials::{Credential, CredentialIssuer};
use civis_crypto::KeyPair;
use civis_gateway::{FixedClock, IssuerRegistry, VerificationGateway};
use civis_proof::{
    AssemblyRequest, ConstraintMode, ProofAssembler, ProofBundle, ProofError, SimulatedBackend,
};

/// Backend seed shared by prover and verifier.
pub const SEED: [u8; 32] = [0x42; 32];

/// 2024-06-01T00:00:00Z.
pub const JUNE_1_2024: u64 = 1_717_200_000;

pub fn owner() -> Address {
    "0x00000000000000000000000000000000000000aa".parse().unwrap()
}

pub fn alice() -> Address {
    "0x4b20993bc481177ec7e8f571cecae8a9e22c02db".parse().unwrap()
}

pub fn mallory() -> Address {
    "0x78731d3ca6b7e34ac0f824c42a7cc18a495cabab".parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Everything a scenario needs, wired the way a deployment would be.
pub struct World {
    pub dob_issuer: CredentialIssuer,
    pub citizenship_issuer: CredentialIssuer,
    pub registry: Arc<IssuerRegistry>,
    pub gateway: VerificationGateway,
}

impl World {
    /// Strict gateway, default policy (18, "US"), both issuers trusted.
    pub fn new() -> Self {
        let dob_issuer = CredentialIssuer::new(KeyPair::from_seed(&[0xD0; 32]).unwrap());
        let citizenship_issuer = CredentialIssuer::new(KeyPair::from_seed(&[0xC1; 32]).unwrap());

        let registry = Arc::new(IssuerRegistry::new(owner()));
        registry
            .add(
                owner(),
                AttestationKind::DateOfBirth,
                dob_issuer.public_key().reduced(),
            )
            .unwrap();
        registry
            .add(
                owner(),
                AttestationKind::Citizenship,
                citizenship_issuer.public_key().reduced(),
            )
            .unwrap();

        let gateway = VerificationGateway::new(
            owner(),
            Arc::clone(&registry),
            Arc::new(SimulatedBackend::strict(&SEED)),
            PolicyParameters::default(),
        )
        .with_clock(Arc::new(FixedClock::from_unix(JUNE_1_2024 as i64).unwrap()));

        Self {
            dob_issuer,
            citizenship_issuer,
            registry,
            gateway,
        }
    }

    pub fn dob_credential(&self, born: NaiveDate, holder: Address) -> Credential {
        self.dob_issuer.issue_date_of_birth(born, holder).unwrap()
    }

    pub fn citizenship_credential(&self, country: &str, holder: Address) -> Credential {
        self.citizenship_issuer
            .issue_citizenship(country, holder)
            .unwrap()
    }

    /// A request for `holder` with their own credentials, submitted from `holder`.
    pub fn request(&self, born: NaiveDate, country: &str, holder: Address) -> AssemblyRequest {
        AssemblyRequest {
            date_of_birth: self.dob_credential(born, holder),
            citizenship: self.citizenship_credential(country, holder),
            wallet: holder,
            current_date: JUNE_1_2024,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// An assembler for `mode` sharing the gateway's backend seed.
pub fn assembler(mode: ConstraintMode) -> ProofAssembler {
    ProofAssembler::new(
        Arc::new(SimulatedBackend::new(&SEED, mode)),
        PolicyParameters::default(),
    )
}

pub fn prove(mode: ConstraintMode, request: &AssemblyRequest) -> Result<ProofBundle, ProofError> {
    assembler(mode).assemble(request)
}
