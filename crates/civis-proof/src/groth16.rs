use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, VerifyingKey};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;

use civis_core::{FieldElement, PUBLIC_SIGNAL_COUNT};

use crate::backend::PairingVerifier;
use crate::circuit::ConstraintMode;
use crate::error::ProofError;
use crate::proof::Proof;

/// BN254 Groth16 pairing check against a verifying key exported by the
/// circuit toolchain.
pub struct Groth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
    mode: ConstraintMode,
}

impl Groth16Verifier {
    /// Prepare a verifying key. It must expect exactly the public signal vector.
    pub fn new(vk: &VerifyingKey<Bn254>, mode: ConstraintMode) -> Result<Self, ProofError> {
        // gamma_abc_g1 has one entry for the constant wire plus one per input.
        let inputs = vk.gamma_abc_g1.len().saturating_sub(1);
        if inputs != PUBLIC_SIGNAL_COUNT {
            return Err(ProofError::InvalidVerifyingKey(format!(
                "key expects {} public inputs, circuit has {}",
                inputs, PUBLIC_SIGNAL_COUNT
            )));
        }
        let pvk = Groth16::<Bn254>::process_vk(vk)
            .map_err(|e| ProofError::InvalidVerifyingKey(e.to_string()))?;
        Ok(Self { pvk, mode })
    }

    /// Decode a compressed canonical verifying key.
    pub fn from_bytes(bytes: &[u8], mode: ConstraintMode) -> Result<Self, ProofError> {
        let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes)
            .map_err(|e| ProofError::InvalidVerifyingKey(e.to_string()))?;
        Self::new(&vk, mode)
    }
}

impl PairingVerifier for Groth16Verifier {
    fn mode(&self) -> ConstraintMode {
        self.mode
    }

    fn verify_pairing(
        &self,
        proof: &Proof,
        public_inputs: &[FieldElement; PUBLIC_SIGNAL_COUNT],
    ) -> bool {
        let inputs: Vec<Fr> = public_inputs.iter().map(FieldElement::inner).collect();
        match Groth16::<Bn254>::verify_with_processed_vk(&self.pvk, &inputs, proof.inner()) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "groth16 verification errored");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_r1cs_std::alloc::AllocVar;
    use ark_r1cs_std::eq::EqGadget;
    use ark_r1cs_std::fields::fp::FpVar;
    use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
    use ark_serialize::CanonicalSerialize;
    use ark_snark::CircuitSpecificSetupSNARK;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Nine public inputs; enforces only `subject_key == subject_wallet`.
    #[derive(Clone)]
    struct BindingCircuit {
        signals: [Fr; PUBLIC_SIGNAL_COUNT],
    }

    impl ConstraintSynthesizer<Fr> for BindingCircuit {
        fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
            let mut vars = Vec::with_capacity(PUBLIC_SIGNAL_COUNT);
            for value in self.signals {
                vars.push(FpVar::new_input(cs.clone(), || Ok(value))?);
            }
            vars[7].enforce_equal(&vars[8])?;
            Ok(())
        }
    }

    fn signals(wallet: u64) -> [FieldElement; PUBLIC_SIGNAL_COUNT] {
        let mut s = [FieldElement::from_u64(1); PUBLIC_SIGNAL_COUNT];
        s[7] = FieldElement::from_u64(wallet);
        s[8] = FieldElement::from_u64(wallet);
        s
    }

    fn circuit(s: &[FieldElement; PUBLIC_SIGNAL_COUNT]) -> BindingCircuit {
        let mut fr = [Fr::from(0u64); PUBLIC_SIGNAL_COUNT];
        for (slot, v) in fr.iter_mut().zip(s.iter()) {
            *slot = v.inner();
        }
        BindingCircuit { signals: fr }
    }

    fn setup() -> (ark_groth16::ProvingKey<Bn254>, VerifyingKey<Bn254>, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let (pk, vk) =
            Groth16::<Bn254>::circuit_specific_setup(circuit(&signals(0)), &mut rng).unwrap();
        (pk, vk, rng)
    }

    #[test]
    fn test_groth16_verify_valid_proof() {
        let (pk, vk, mut rng) = setup();
        let s = signals(0xc0ffee);
        let proof = Groth16::<Bn254>::prove(&pk, circuit(&s), &mut rng).unwrap();
        let verifier = Groth16Verifier::new(&vk, ConstraintMode::Strict).unwrap();
        assert!(verifier.verify_pairing(&Proof::from(proof), &s));
    }

    #[test]
    fn test_groth16_rejects_other_signals() {
        let (pk, vk, mut rng) = setup();
        let s = signals(0xc0ffee);
        let proof = Proof::from(Groth16::<Bn254>::prove(&pk, circuit(&s), &mut rng).unwrap());
        let verifier = Groth16Verifier::new(&vk, ConstraintMode::Strict).unwrap();
        assert!(!verifier.verify_pairing(&proof, &signals(0xbad)));
    }

    #[test]
    fn test_groth16_from_serialized_key() {
        let (pk, vk, mut rng) = setup();
        let mut bytes = Vec::new();
        vk.serialize_compressed(&mut bytes).unwrap();
        let verifier = Groth16Verifier::from_bytes(&bytes, ConstraintMode::Strict).unwrap();
        let s = signals(7);
        let proof = Groth16::<Bn254>::prove(&pk, circuit(&s), &mut rng).unwrap();
        let roundtripped = Proof::from_bytes(&Proof::from(proof).to_bytes().unwrap()).unwrap();
        assert!(verifier.verify_pairing(&roundtripped, &s));
    }

    #[test]
    fn test_groth16_rejects_wrong_input_count() {
        let (_, mut vk, _) = setup();
        vk.gamma_abc_g1.pop();
        assert!(matches!(
            Groth16Verifier::new(&vk, ConstraintMode::Strict),
            Err(ProofError::InvalidVerifyingKey(_))
        ));
    }

    #[test]
    fn test_groth16_rejects_garbage_key() {
        assert!(Groth16Verifier::from_bytes(&[1, 2, 3], ConstraintMode::Strict).is_err());
    }
}
