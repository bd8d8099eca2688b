use std::fmt;

use crate::error::CoreError;

/// Stages of a single verification decision.
///
/// Each call to the gateway starts at `Received` and walks forward one check
/// at a time. Nothing is persisted between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VerificationStage {
    /// Proof and signals received, nothing checked yet.
    Received,
    /// The pairing check accepted the proof for these signals.
    PairingChecked,
    /// `current_date` lies within the freshness window.
    FreshnessChecked,
    /// Signals carry the gateway's own policy.
    PolicyChecked,
    /// Both issuer keys are trusted for their attestation kind.
    IssuersChecked,
    /// Caller is the bound wallet and matches the subject key.
    BindingChecked,
    /// Proof accepted. Final state.
    Accepted,
    /// Proof rejected. Final state.
    Rejected,
}

/// The check performed to leave a non-final stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayCheck {
    Pairing,
    Freshness,
    Policy,
    Issuers,
    Binding,
}

impl fmt::Display for GatewayCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pairing => write!(f, "pairing"),
            Self::Freshness => write!(f, "freshness"),
            Self::Policy => write!(f, "policy"),
            Self::Issuers => write!(f, "issuers"),
            Self::Binding => write!(f, "binding"),
        }
    }
}

impl VerificationStage {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// The check that decides the next transition. `BindingChecked` has none:
    /// passing every check means acceptance.
    pub fn pending_check(&self) -> Option<GatewayCheck> {
        match self {
            Self::Received => Some(GatewayCheck::Pairing),
            Self::PairingChecked => Some(GatewayCheck::Freshness),
            Self::FreshnessChecked => Some(GatewayCheck::Policy),
            Self::PolicyChecked => Some(GatewayCheck::Issuers),
            Self::IssuersChecked => Some(GatewayCheck::Binding),
            Self::BindingChecked | Self::Accepted | Self::Rejected => None,
        }
    }

    fn successor(&self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::PairingChecked),
            Self::PairingChecked => Some(Self::FreshnessChecked),
            Self::FreshnessChecked => Some(Self::PolicyChecked),
            Self::PolicyChecked => Some(Self::IssuersChecked),
            Self::IssuersChecked => Some(Self::BindingChecked),
            Self::BindingChecked => Some(Self::Accepted),
            Self::Accepted | Self::Rejected => None,
        }
    }
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => write!(f, "Received"),
            Self::PairingChecked => write!(f, "PairingChecked"),
            Self::FreshnessChecked => write!(f, "FreshnessChecked"),
            Self::PolicyChecked => write!(f, "PolicyChecked"),
            Self::IssuersChecked => write!(f, "IssuersChecked"),
            Self::BindingChecked => write!(f, "BindingChecked"),
            Self::Accepted => write!(f, "Accepted"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Result of the check pending at the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Pass,
    Fail,
}

impl From<bool> for StageOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// Drives a verification through its stages.
///
/// Valid transitions:
/// - Received → PairingChecked → FreshnessChecked → PolicyChecked →
///   IssuersChecked → BindingChecked → Accepted (Pass)
/// - any non-final stage → Rejected (Fail)
pub struct VerificationStateMachine;

impl VerificationStateMachine {
    /// Apply the outcome of the pending check.
    pub fn transition(
        current: VerificationStage,
        outcome: StageOutcome,
    ) -> Result<VerificationStage, CoreError> {
        let next = match (current.successor(), outcome) {
            (Some(_), StageOutcome::Fail) => VerificationStage::Rejected,
            (Some(next), StageOutcome::Pass) => next,
            (None, _) => {
                let target = match outcome {
                    StageOutcome::Pass => VerificationStage::Accepted,
                    StageOutcome::Fail => VerificationStage::Rejected,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %next,
            outcome = ?outcome,
            "verification stage transition"
        );

        Ok(next)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: VerificationStage, outcome: StageOutcome) -> bool {
        Self::transition(current, outcome).is_ok()
    }
}
