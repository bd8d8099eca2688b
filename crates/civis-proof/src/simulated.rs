//! Deterministic stand-in for the external proving toolchain.
//!
//! Proof points are derived from a keyed BLAKE3 hash of the public signals, so
//! the verifier accepts exactly the signal vectors its prover was willing to
//! prove. Anyone holding the seed can forge proofs: not zero-knowledge and not
//! sound against the key holder. Local development and tests only.

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;

use civis_core::{FieldElement, PUBLIC_SIGNAL_COUNT};

use crate::backend::{PairingVerifier, Prover};
use crate::circuit::{CircuitConstraintModel, CircuitInputs, ConstraintMode};
use crate::error::ProofError;
use crate::proof::Proof;

const STRICT_CONTEXT: &str = "civis simulated backend 2024 strict proving key";
const PERMISSIVE_CONTEXT: &str = "civis simulated backend 2024 permissive proving key";

/// Keyed prover/verifier pair for one [`ConstraintMode`].
///
/// The mode is part of the key, so proofs from the permissive variant never
/// verify under the strict one.
pub struct SimulatedBackend {
    key: [u8; 32],
    model: CircuitConstraintModel,
}

impl SimulatedBackend {
    pub fn new(seed: &[u8; 32], mode: ConstraintMode) -> Self {
        let context = match mode {
            ConstraintMode::Strict => STRICT_CONTEXT,
            ConstraintMode::Permissive => PERMISSIVE_CONTEXT,
        };
        Self {
            key: blake3::derive_key(context, seed),
            model: CircuitConstraintModel::new(mode),
        }
    }

    pub fn strict(seed: &[u8; 32]) -> Self {
        Self::new(seed, ConstraintMode::Strict)
    }

    pub fn permissive(seed: &[u8; 32]) -> Self {
        Self::new(seed, ConstraintMode::Permissive)
    }

    fn scalar(&self, label: u8, public_inputs: &[FieldElement; PUBLIC_SIGNAL_COUNT]) -> Fr {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(&[label]);
        for value in public_inputs {
            hasher.update(&value.to_be_bytes());
        }
        Fr::from_be_bytes_mod_order(hasher.finalize().as_bytes())
    }

    fn proof_for(&self, public_inputs: &[FieldElement; PUBLIC_SIGNAL_COUNT]) -> Proof {
        let a = (G1Affine::generator() * self.scalar(b'a', public_inputs)).into_affine();
        let b = (G2Affine::generator() * self.scalar(b'b', public_inputs)).into_affine();
        let c = (G1Affine::generator() * self.scalar(b'c', public_inputs)).into_affine();
        Proof::from_parts(a, b, c)
    }
}

impl Prover for SimulatedBackend {
    fn mode(&self) -> ConstraintMode {
        self.model.mode()
    }

    fn prove(&self, inputs: &CircuitInputs) -> Result<Proof, ProofError> {
        let report = self.model.enforce(inputs)?;
        tracing::debug!(
            mode = %self.model.mode(),
            all_checks_passed = report.all_checks_passed(),
            "simulated proof generated"
        );
        Ok(self.proof_for(&inputs.signals.to_array()))
    }
}

impl PairingVerifier for SimulatedBackend {
    fn mode(&self) -> ConstraintMode {
        self.model.mode()
    }

    fn verify_pairing(
        &self,
        proof: &Proof,
        public_inputs: &[FieldElement; PUBLIC_SIGNAL_COUNT],
    ) -> bool {
        *proof == self.proof_for(public_inputs)
    }
}
