//! Civis Proof: the eligibility circuit's constraint model and the proving
//! backends around it.
//!
//! - [`circuit`]: what a proof may claim (signatures, age, citizenship, binding)
//! - [`backend`]: the `Prover` / `PairingVerifier` capabilities
//! - [`simulated`]: deterministic keyed backend for development and tests
//! - [`groth16`]: BN254 Groth16 pairing check
//! - [`assembler`]: credentials + wallet → proof bundle

pub mod assembler;
pub mod backend;
pub mod circuit;
pub mod error;
pub mod groth16;
pub mod proof;
pub mod simulated;

pub use assembler::{AssemblyRequest, ProofAssembler};
pub use backend::{PairingVerifier, Prover};
pub use circuit::{
    age_in_years, CircuitConstraintModel, CircuitInputs, CircuitWitness, ConstraintCategory,
    ConstraintMode, ConstraintReport,
};
pub use error::ProofError;
pub use groth16::Groth16Verifier;
pub use proof::{Proof, ProofBundle};
pub use simulated::SimulatedBackend;
