use chrono::Duration;
use std::sync::{Arc, PoisonError, RwLock};

use civis_core::{
    decode_short_string, Address, AttestationKind, FieldElement, GatewayCheck, PolicyParameters,
    PublicSignals, StageOutcome, VerificationStage, VerificationStateMachine,
    DEFAULT_FRESHNESS_WINDOW_DAYS, PUBLIC_SIGNAL_COUNT,
};
use civis_proof::{ConstraintMode, PairingVerifier, Proof};

use crate::audit::{AuditLog, VerificationRecord};
use crate::clock::{Clock, SystemClock};
use crate::error::GatewayError;
use crate::inspect::{InspectionCheck, InspectionReport};
use crate::registry::IssuerRegistry;

/// Final stage of one verification plus the check that rejected it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision {
    stage: VerificationStage,
    failed_check: Option<GatewayCheck>,
}

impl Decision {
    fn accepted(&self) -> bool {
        self.stage == VerificationStage::Accepted
    }
}

/// Accepts or rejects eligibility proofs for a given caller.
///
/// Wraps an opaque pairing check with freshness, policy, issuer-trust and
/// wallet-binding checks. Each call is independent; `&self` methods are safe
/// to call concurrently.
pub struct VerificationGateway {
    owner: Address,
    registry: Arc<IssuerRegistry>,
    verifier: Arc<dyn PairingVerifier>,
    policy: RwLock<PolicyParameters>,
    freshness_window: Duration,
    clock: Arc<dyn Clock>,
    audit: AuditLog,
}

impl VerificationGateway {
    pub fn new(
        owner: Address,
        registry: Arc<IssuerRegistry>,
        verifier: Arc<dyn PairingVerifier>,
        policy: PolicyParameters,
    ) -> Self {
        if verifier.mode() == ConstraintMode::Permissive {
            tracing::warn!(
                "gateway wired to a permissive verifier; accepted proofs do not imply eligibility"
            );
        }
        Self {
            owner,
            registry,
            verifier,
            policy: RwLock::new(policy),
            freshness_window: Duration::days(DEFAULT_FRESHNESS_WINDOW_DAYS as i64),
            clock: Arc::new(SystemClock),
            audit: AuditLog::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = audit;
        self
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn registry(&self) -> &Arc<IssuerRegistry> {
        &self.registry
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    pub fn verifier_mode(&self) -> ConstraintMode {
        self.verifier.mode()
    }

    pub fn policy(&self) -> PolicyParameters {
        *self.policy.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the policy. Owner only.
    pub fn set_policy(
        &self,
        caller: Address,
        policy: PolicyParameters,
    ) -> Result<(), GatewayError> {
        if caller != self.owner {
            return Err(GatewayError::NotOwner { caller });
        }
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = policy;
        tracing::info!(
            min_age = policy.min_age,
            required_citizenship = %policy.required_citizenship,
            "gateway policy updated"
        );
        Ok(())
    }

    /// Decide whether `caller` may act on `proof` for `input`. Never explains
    /// a rejection; see [`Self::inspect`].
    pub fn verify(
        &self,
        proof: &Proof,
        input: &[FieldElement; PUBLIC_SIGNAL_COUNT],
        caller: Address,
    ) -> bool {
        self.decide(proof, input, caller).accepted()
    }

    pub fn verify_signals(&self, proof: &Proof, signals: &PublicSignals, caller: Address) -> bool {
        self.verify(proof, &signals.to_array(), caller)
    }

    /// [`Self::verify`] for `Result`-based callers.
    pub fn require_verified(
        &self,
        proof: &Proof,
        input: &[FieldElement; PUBLIC_SIGNAL_COUNT],
        caller: Address,
    ) -> Result<(), GatewayError> {
        if self.verify(proof, input, caller) {
            Ok(())
        } else {
            Err(GatewayError::VerificationRejected)
        }
    }

    /// Verify, then append the decision to the audit log.
    pub fn verify_and_record(
        &self,
        proof: &Proof,
        input: &[FieldElement; PUBLIC_SIGNAL_COUNT],
        caller: Address,
    ) -> VerificationRecord {
        let accepted = self.verify(proof, input, caller);
        self.audit.record(
            caller,
            accepted,
            self.clock.now(),
            PublicSignals::from_array(input),
            proof.clone(),
        )
    }

    fn decide(
        &self,
        proof: &Proof,
        input: &[FieldElement; PUBLIC_SIGNAL_COUNT],
        caller: Address,
    ) -> Decision {
        let signals = PublicSignals::from_array(input);
        let mut stage = VerificationStage::Received;
        let mut failed_check = None;

        while !stage.is_final() {
            let outcome = match stage.pending_check() {
                Some(check) => {
                    let passed = self.run_check(check, proof, input, &signals, caller);
                    if !passed {
                        failed_check = Some(check);
                    }
                    StageOutcome::from(passed)
                }
                None => StageOutcome::Pass,
            };
            stage = match VerificationStateMachine::transition(stage, outcome) {
                Ok(next) => next,
                Err(_) => VerificationStage::Rejected,
            };
        }

        let decision = Decision {
            stage,
            failed_check,
        };
        if decision.accepted() {
            tracing::info!(caller = %caller, "eligibility proof accepted");
        } else {
            tracing::info!(caller = %caller, "eligibility proof rejected");
            tracing::debug!(caller = %caller, check = ?failed_check, "rejecting check");
        }
        decision
    }

    fn run_check(
        &self,
        check: GatewayCheck,
        proof: &Proof,
        input: &[FieldElement; PUBLIC_SIGNAL_COUNT],
        signals: &PublicSignals,
        caller: Address,
    ) -> bool {
        match check {
            GatewayCheck::Pairing => self.verifier.verify_pairing(proof, input),
            GatewayCheck::Freshness => self.is_fresh(&signals.current_date),
            GatewayCheck::Policy => {
                let policy = self.policy();
                signals.min_age == policy.min_age_field()
                    && signals.required_citizenship == policy.required_citizenship
            }
            GatewayCheck::Issuers => self.registry.all_trusted(&[
                (AttestationKind::DateOfBirth, signals.issuer_a),
                (AttestationKind::Citizenship, signals.issuer_b),
            ]),
            GatewayCheck::Binding => {
                signals.subject_wallet == caller.to_field()
                    && signals.subject_key == signals.subject_wallet
            }
        }
    }

    /// `current_date` within `[now - window, now + window]`.
    fn is_fresh(&self, current_date: &FieldElement) -> bool {
        let Some(claimed) = current_date.to_u64() else {
            return false;
        };
        let now = i128::from(self.clock.now().timestamp());
        let window = i128::from(self.freshness_window.num_seconds());
        (i128::from(claimed) - now).abs() <= window
    }

    /// Replay every non-pairing check with named results.
    ///
    /// Read-only and separate from [`Self::verify`]; it never consults the
    /// proof, so it can only narrow down why a rejection happened.
    pub fn inspect(&self, signals: &PublicSignals, caller: Address) -> InspectionReport {
        let policy = self.policy();
        let now = self.clock.now();
        let caller_field = caller.to_field();

        let checks = vec![
            InspectionCheck::new("freshness", self.is_fresh(&signals.current_date), || {
                format!(
                    "current_date {} is more than {} days from {}",
                    signals.current_date,
                    self.freshness_window.num_days(),
                    now.timestamp()
                )
            }),
            InspectionCheck::new("min_age", signals.min_age == policy.min_age_field(), || {
                format!(
                    "signals require age {}, policy requires {}",
                    signals.min_age, policy.min_age
                )
            }),
            InspectionCheck::new(
                "citizenship",
                signals.required_citizenship == policy.required_citizenship,
                || {
                    format!(
                        "signals require {:?}, policy requires {:?}",
                        describe_country(&signals.required_citizenship),
                        describe_country(&policy.required_citizenship)
                    )
                },
            ),
            InspectionCheck::new(
                "issuer_a",
                self.registry
                    .is_trusted(AttestationKind::DateOfBirth, &signals.issuer_a),
                || format!("{} is not trusted for date of birth", signals.issuer_a),
            ),
            InspectionCheck::new(
                "issuer_b",
                self.registry
                    .is_trusted(AttestationKind::Citizenship, &signals.issuer_b),
                || format!("{} is not trusted for citizenship", signals.issuer_b),
            ),
            InspectionCheck::new("wallet", signals.subject_wallet == caller_field, || {
                format!("proof is bound to {}, not to {}", signals.subject_wallet.to_address(), caller)
            }),
            InspectionCheck::new(
                "subject",
                signals.subject_key == signals.subject_wallet,
                || "credential subject differs from the bound wallet".to_string(),
            ),
        ];

        InspectionReport::from_checks(checks)
    }
}

fn describe_country(value: &FieldElement) -> String {
    decode_short_string(value).unwrap_or_else(|_| value.to_string())
}
