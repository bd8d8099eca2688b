use std::sync::Arc;

use civis_core::{Address, PolicyParameters};
use civis_credentials::Credential;

use crate::backend::Prover;
use crate::circuit::{CircuitInputs, ConstraintMode};
use crate::error::ProofError;
use crate::proof::ProofBundle;

/// One holder's request for an eligibility proof.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub date_of_birth: Credential,
    pub citizenship: Credential,
    /// The account that will submit the proof.
    pub wallet: Address,
    /// Unix timestamp claimed as "now".
    pub current_date: u64,
}

/// Turns two credentials and a wallet into a proof bundle via a [`Prover`].
pub struct ProofAssembler {
    prover: Arc<dyn Prover>,
    policy: PolicyParameters,
}

impl ProofAssembler {
    pub fn new(prover: Arc<dyn Prover>, policy: PolicyParameters) -> Self {
        Self { prover, policy }
    }

    pub fn mode(&self) -> ConstraintMode {
        self.prover.mode()
    }

    pub fn policy(&self) -> &PolicyParameters {
        &self.policy
    }

    /// Map a request onto private and public circuit inputs.
    pub fn build_inputs(&self, request: &AssemblyRequest) -> Result<CircuitInputs, ProofError> {
        CircuitInputs::from_credentials(
            &request.date_of_birth,
            &request.citizenship,
            request.wallet,
            request.current_date,
            &self.policy,
        )
    }

    /// Prove on the calling thread.
    pub fn assemble(&self, request: &AssemblyRequest) -> Result<ProofBundle, ProofError> {
        let inputs = self.build_inputs(request)?;
        let proof = self.prover.prove(&inputs)?;
        let bundle = ProofBundle {
            mode: self.prover.mode(),
            proof,
            signals: inputs.signals,
        };

        tracing::info!(
            mode = %bundle.mode,
            wallet = %request.wallet,
            current_date = request.current_date,
            "eligibility proof assembled"
        );

        Ok(bundle)
    }

    /// Prove on tokio's blocking pool so the caller's executor stays free.
    pub async fn assemble_off_thread(
        &self,
        request: AssemblyRequest,
    ) -> Result<ProofBundle, ProofError> {
        let inputs = self.build_inputs(&request)?;
        let prover = Arc::clone(&self.prover);
        let mode = prover.mode();

        let (proof, signals) = tokio::task::spawn_blocking(move || {
            prover.prove(&inputs).map(|proof| (proof, inputs.signals))
        })
        .await
        .map_err(|e| ProofError::TaskFailed(e.to_string()))??;

        tracing::info!(
            mode = %mode,
            wallet = %request.wallet,
            current_date = request.current_date,
            "eligibility proof assembled off-thread"
        );

        Ok(ProofBundle {
            mode,
            proof,
            signals,
        })
    }
}
