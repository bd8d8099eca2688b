use civis_core::{FieldElement, PUBLIC_SIGNAL_COUNT};

use crate::circuit::{CircuitInputs, ConstraintMode};
use crate::error::ProofError;
use crate::proof::Proof;

/// Produces a succinct proof for one set of circuit inputs.
///
/// A strict prover returns [`ProofError::ConstraintViolation`] instead of a
/// proof when the inputs fail the constraint set.
pub trait Prover: Send + Sync {
    fn mode(&self) -> ConstraintMode;

    fn prove(&self, inputs: &CircuitInputs) -> Result<Proof, ProofError>;
}

/// The pairing check: does `proof` attest to `public_inputs` under this
/// verifier's key?
pub trait PairingVerifier: Send + Sync {
    fn mode(&self) -> ConstraintMode;

    fn verify_pairing(&self, proof: &Proof, public_inputs: &[FieldElement; PUBLIC_SIGNAL_COUNT])
        -> bool;
}
