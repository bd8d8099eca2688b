//! Executable model of the eligibility circuit.
//!
//! The constraint set is evaluated natively over the same field encodings the
//! circuit uses. Provers call [`CircuitConstraintModel::enforce`] before they
//! produce anything, and tests use [`CircuitConstraintModel::evaluate`] as the
//! oracle for what a proof is allowed to claim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use civis_core::{
    Address, AttestationKind, FieldElement, PolicyParameters, PublicSignals, ReducedPublicKey,
    SECONDS_PER_YEAR,
};
use civis_credentials::Credential;
use civis_crypto::{message_hash, verify_field, EcdsaSignature, IssuerPublicKey};

use crate::error::ProofError;

/// Which circuit variant a prover or verifier implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintMode {
    /// Every check must hold or no proof is produced.
    Strict,
    /// A proof is always produced; the checks are only reported. Testing only.
    Permissive,
}

impl fmt::Display for ConstraintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

impl FromStr for ConstraintMode {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(ProofError::Serialization(format!(
                "unknown constraint mode: {}",
                other
            ))),
        }
    }
}

/// A family of constraints, as reported in a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintCategory {
    Signature,
    Age,
    Citizenship,
    Binding,
}

impl fmt::Display for ConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signature => write!(f, "signature"),
            Self::Age => write!(f, "age"),
            Self::Citizenship => write!(f, "citizenship"),
            Self::Binding => write!(f, "binding"),
        }
    }
}

/// Private inputs. Never leave the holder's machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitWitness {
    pub date_of_birth: FieldElement,
    pub citizenship: FieldElement,
    pub signature_a: EcdsaSignature,
    pub signature_b: EcdsaSignature,
    pub nonce_a: FieldElement,
    pub nonce_b: FieldElement,
    /// Full date-of-birth issuer key; its reduction must equal `issuer_a`.
    pub issuer_a_key: IssuerPublicKey,
    /// Full citizenship issuer key; its reduction must equal `issuer_b`.
    pub issuer_b_key: IssuerPublicKey,
}

/// Everything a prover needs: the witness plus the public signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitInputs {
    pub witness: CircuitWitness,
    pub signals: PublicSignals,
}

impl CircuitInputs {
    /// Wire two credentials, a wallet and a policy into circuit inputs.
    ///
    /// The public subject key is taken from the date-of-birth credential; a
    /// citizenship credential issued to someone else fails its signature
    /// check against it.
    pub fn from_credentials(
        date_of_birth: &Credential,
        citizenship: &Credential,
        wallet: Address,
        current_date: u64,
        policy: &PolicyParameters,
    ) -> Result<Self, ProofError> {
        date_of_birth.expect_kind(AttestationKind::DateOfBirth)?;
        citizenship.expect_kind(AttestationKind::Citizenship)?;

        let witness = CircuitWitness {
            date_of_birth: date_of_birth.subject_value,
            citizenship: citizenship.subject_value,
            signature_a: date_of_birth.signature,
            signature_b: citizenship.signature,
            nonce_a: date_of_birth.nonce,
            nonce_b: citizenship.nonce,
            issuer_a_key: date_of_birth.issuer_key,
            issuer_b_key: citizenship.issuer_key,
        };

        let signals = PublicSignals {
            current_date: FieldElement::from_u64(current_date),
            min_age: policy.min_age_field(),
            required_citizenship: policy.required_citizenship,
            issuer_a: date_of_birth.issuer_public_key,
            issuer_b: citizenship.issuer_public_key,
            subject_key: date_of_birth.subject_key,
            subject_wallet: wallet.to_field(),
        };

        Ok(Self { witness, signals })
    }
}

/// Outcome of every named check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub sig_a_ok: bool,
    pub sig_b_ok: bool,
    /// Whole Julian years between birth and `current_date`, when defined.
    pub age_years: Option<u64>,
    pub age_ok: bool,
    pub citizenship_ok: bool,
    pub binding_ok: bool,
}

impl ConstraintReport {
    pub fn all_checks_passed(&self) -> bool {
        self.sig_a_ok && self.sig_b_ok && self.age_ok && self.citizenship_ok && self.binding_ok
    }

    /// Categories with at least one failing check, in evaluation order.
    pub fn failed_categories(&self) -> Vec<ConstraintCategory> {
        let mut failed = Vec::new();
        if !(self.sig_a_ok && self.sig_b_ok) {
            failed.push(ConstraintCategory::Signature);
        }
        if !self.age_ok {
            failed.push(ConstraintCategory::Age);
        }
        if !self.citizenship_ok {
            failed.push(ConstraintCategory::Citizenship);
        }
        if !self.binding_ok {
            failed.push(ConstraintCategory::Binding);
        }
        failed
    }

    /// Named checks, for display.
    pub fn checks(&self) -> [(&'static str, bool); 5] {
        [
            ("sig_a", self.sig_a_ok),
            ("sig_b", self.sig_b_ok),
            ("age", self.age_ok),
            ("citizenship", self.citizenship_ok),
            ("binding", self.binding_ok),
        ]
    }
}

/// The constraint set, parameterised by [`ConstraintMode`].
#[derive(Debug, Clone, Copy)]
pub struct CircuitConstraintModel {
    mode: ConstraintMode,
}

impl CircuitConstraintModel {
    pub fn new(mode: ConstraintMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ConstraintMode {
        self.mode
    }

    /// Evaluate every check. Never fails; a malformed input is a failed check.
    pub fn evaluate(&self, inputs: &CircuitInputs) -> ConstraintReport {
        let w = &inputs.witness;
        let s = &inputs.signals;

        let sig_a_ok = signature_holds(
            &w.date_of_birth,
            &s.subject_key,
            &w.nonce_a,
            &w.signature_a,
            &w.issuer_a_key,
            &s.issuer_a,
        );
        let sig_b_ok = signature_holds(
            &w.citizenship,
            &s.subject_key,
            &w.nonce_b,
            &w.signature_b,
            &w.issuer_b_key,
            &s.issuer_b,
        );

        let age_years = age_in_years(&w.date_of_birth, &s.current_date);
        let age_ok = match (age_years, s.min_age.to_u64()) {
            (Some(age), Some(min_age)) => age >= min_age,
            _ => false,
        };

        ConstraintReport {
            sig_a_ok,
            sig_b_ok,
            age_years,
            age_ok,
            citizenship_ok: w.citizenship == s.required_citizenship,
            binding_ok: s.subject_key == s.subject_wallet,
        }
    }

    /// Evaluate and apply the mode: strict refuses on any failure, permissive
    /// passes the report through.
    pub fn enforce(&self, inputs: &CircuitInputs) -> Result<ConstraintReport, ProofError> {
        let report = self.evaluate(inputs);
        if report.all_checks_passed() {
            return Ok(report);
        }

        let failed = report.failed_categories();
        match self.mode {
            ConstraintMode::Strict => Err(ProofError::ConstraintViolation { failed }),
            ConstraintMode::Permissive => {
                tracing::warn!(
                    failed = ?failed,
                    "permissive circuit accepting inputs that fail constraints"
                );
                Ok(report)
            }
        }
    }
}

/// Whole Julian years between `date_of_birth` and `current_date`, or `None`
/// when the birth date lies in the future or either value is not a timestamp.
///
/// A calendar birthday whose span holds only `years / 4` leap days lands up to
/// a day before the Julian boundary, so such holders pass one day late.
pub fn age_in_years(date_of_birth: &FieldElement, current_date: &FieldElement) -> Option<u64> {
    let dob = date_of_birth.to_u64()?;
    let now = current_date.to_u64()?;
    let elapsed = now.checked_sub(dob)?;
    Some(elapsed / SECONDS_PER_YEAR)
}

fn signature_holds(
    value: &FieldElement,
    subject_key: &FieldElement,
    nonce: &FieldElement,
    signature: &EcdsaSignature,
    full_key: &IssuerPublicKey,
    public_key: &ReducedPublicKey,
) -> bool {
    if full_key.reduced() != *public_key {
        return false;
    }
    match message_hash(value, subject_key, nonce) {
        Ok(message) => verify_field(&message, signature, full_key).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use civis_credentials::{date_to_timestamp, CredentialIssuer};
    use civis_crypto::KeyPair;

    const JUNE_1_2024: u64 = 1_717_200_000;

    fn wallet() -> Address {
        "0x00000000000000000000000000000000000c1715".parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inputs_for(dob: NaiveDate, country: &str, holder: Address, caller: Address) -> CircuitInputs {
        let issuer_a = CredentialIssuer::new(KeyPair::from_seed(&[0xA1; 32]).unwrap());
        let issuer_b = CredentialIssuer::new(KeyPair::from_seed(&[0xB2; 32]).unwrap());
        let dob_cred = issuer_a.issue_date_of_birth(dob, holder).unwrap();
        let cit_cred = issuer_b.issue_citizenship(country, holder).unwrap();
        CircuitInputs::from_credentials(
            &dob_cred,
            &cit_cred,
            caller,
            JUNE_1_2024,
            &PolicyParameters::default(),
        )
        .unwrap()
    }

    fn strict() -> CircuitConstraintModel {
        CircuitConstraintModel::new(ConstraintMode::Strict)
    }

    #[test]
    fn test_eligible_holder_passes() {
        let inputs = inputs_for(date(2000, 1, 1), "US", wallet(), wallet());
        let report = strict().enforce(&inputs).unwrap();
        assert!(report.all_checks_passed());
        assert_eq!(report.age_years, Some(24));
    }

    #[test]
    fn test_signals_from_credentials() {
        let inputs = inputs_for(date(2000, 1, 1), "US", wallet(), wallet());
        let s = inputs.signals;
        assert_eq!(s.current_date, FieldElement::from_u64(JUNE_1_2024));
        assert_eq!(s.min_age, FieldElement::from_u64(18));
        assert_eq!(s.required_citizenship, FieldElement::from_u64(0x5553));
        assert_eq!(s.subject_key, wallet().to_field());
        assert_eq!(s.subject_wallet, wallet().to_field());
    }

    #[test]
    fn test_underage_strict_violation() {
        // 17 years and 11 months on 2024-06-01.
        let inputs = inputs_for(date(2006, 7, 1), "US", wallet(), wallet());
        let err = strict().enforce(&inputs).unwrap_err();
        match err {
            ProofError::ConstraintViolation { failed } => {
                assert_eq!(failed, vec![ConstraintCategory::Age])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_underage_permissive_reports() {
        let inputs = inputs_for(date(2006, 7, 1), "US", wallet(), wallet());
        let model = CircuitConstraintModel::new(ConstraintMode::Permissive);
        let report = model.enforce(&inputs).unwrap();
        assert!(!report.age_ok);
        assert_eq!(report.age_years, Some(17));
    }

    #[test]
    fn test_wrong_citizenship() {
        let inputs = inputs_for(date(2000, 1, 1), "CA", wallet(), wallet());
        let report = strict().evaluate(&inputs);
        assert!(!report.citizenship_ok);
        assert_eq!(report.failed_categories(), vec![ConstraintCategory::Citizenship]);
    }

    #[test]
    fn test_binding_mismatch() {
        let other: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let inputs = inputs_for(date(2000, 1, 1), "US", wallet(), other);
        let report = strict().evaluate(&inputs);
        assert!(!report.binding_ok);
        assert!(report.sig_a_ok && report.sig_b_ok);
    }

    #[test]
    fn test_tampered_signature_fails() {
        let mut inputs = inputs_for(date(2000, 1, 1), "US", wallet(), wallet());
        inputs.witness.signature_a.s[31] ^= 0x01;
        let report = strict().evaluate(&inputs);
        assert!(!report.sig_a_ok);
        assert!(report.sig_b_ok);
        assert_eq!(report.failed_categories(), vec![ConstraintCategory::Signature]);
    }

    #[test]
    fn test_issuer_key_substitution_fails() {
        let mut inputs = inputs_for(date(2000, 1, 1), "US", wallet(), wallet());
        inputs.signals.issuer_b = KeyPair::from_seed(&[0xC3; 32]).unwrap().public_key().reduced();
        assert!(!strict().evaluate(&inputs).sig_b_ok);
    }

    #[test]
    fn test_credentials_for_different_subjects_fail() {
        let holder_a = wallet();
        let holder_b: Address = "0x0000000000000000000000000000000000000b0b".parse().unwrap();
        let issuer = CredentialIssuer::new(KeyPair::from_seed(&[0xA1; 32]).unwrap());
        let dob_cred = issuer.issue_date_of_birth(date(2000, 1, 1), holder_a).unwrap();
        let cit_cred = issuer.issue_citizenship("US", holder_b).unwrap();
        let inputs = CircuitInputs::from_credentials(
            &dob_cred,
            &cit_cred,
            holder_a,
            JUNE_1_2024,
            &PolicyParameters::default(),
        )
        .unwrap();
        let report = strict().evaluate(&inputs);
        assert!(report.sig_a_ok);
        assert!(!report.sig_b_ok);
    }

    #[test]
    fn test_swapped_credentials_rejected() {
        let issuer = CredentialIssuer::new(KeyPair::from_seed(&[0xA1; 32]).unwrap());
        let dob_cred = issuer.issue_date_of_birth(date(2000, 1, 1), wallet()).unwrap();
        let cit_cred = issuer.issue_citizenship("US", wallet()).unwrap();
        let result = CircuitInputs::from_credentials(
            &cit_cred,
            &dob_cred,
            wallet(),
            JUNE_1_2024,
            &PolicyParameters::default(),
        );
        assert!(matches!(result, Err(ProofError::Credential(_))));
    }

    #[test]
    fn test_age_boundary_exact_multiple() {
        let dob = date_to_timestamp(date(2000, 1, 1)).unwrap();
        let exact = FieldElement::from_u64(dob + 18 * SECONDS_PER_YEAR);
        let short = FieldElement::from_u64(dob + 18 * SECONDS_PER_YEAR - 86_400);
        let dob = FieldElement::from_u64(dob);
        assert_eq!(age_in_years(&dob, &exact), Some(18));
        assert_eq!(age_in_years(&dob, &short), Some(17));
    }

    #[test]
    fn test_age_boundary_calendar_dates() {
        // 18 Julian years after 2006-06-01 falls before 2024-06-01 midnight.
        let passes = inputs_for(date(2006, 6, 1), "US", wallet(), wallet());
        assert!(strict().evaluate(&passes).age_ok);
        let fails = inputs_for(date(2006, 6, 2), "US", wallet(), wallet());
        assert!(!strict().evaluate(&fails).age_ok);
    }

    #[test]
    fn test_birthday_with_four_leap_days_is_one_day_short() {
        // 2001-03-01 to 2019-03-01 is 6574 days: under 18 Julian years.
        let dob = date_to_timestamp(date(2001, 3, 1)).unwrap();
        let birthday = date_to_timestamp(date(2019, 3, 1)).unwrap();
        let day_after = date_to_timestamp(date(2019, 3, 2)).unwrap();
        assert_eq!(birthday - dob, 6574 * 86_400);

        let dob_fe = FieldElement::from_u64(dob);
        assert_eq!(age_in_years(&dob_fe, &FieldElement::from_u64(birthday)), Some(17));
        assert_eq!(age_in_years(&dob_fe, &FieldElement::from_u64(day_after)), Some(18));

        let mut inputs = inputs_for(date(2001, 3, 1), "US", wallet(), wallet());
        inputs.signals.current_date = FieldElement::from_u64(birthday);
        match strict().enforce(&inputs) {
            Err(ProofError::ConstraintViolation { failed }) => {
                assert_eq!(failed, vec![ConstraintCategory::Age])
            }
            other => panic!("unexpected result: {other:?}"),
        }

        inputs.signals.current_date = FieldElement::from_u64(day_after);
        assert!(strict().enforce(&inputs).is_ok());
    }

    #[test]
    fn test_future_birth_date_fails_age() {
        let dob = FieldElement::from_u64(JUNE_1_2024 + 1);
        let now = FieldElement::from_u64(JUNE_1_2024);
        assert_eq!(age_in_years(&dob, &now), None);

        let mut inputs = inputs_for(date(2000, 1, 1), "US", wallet(), wallet());
        inputs.signals.min_age = FieldElement::zero();
        inputs.witness.date_of_birth = dob;
        let report = strict().evaluate(&inputs);
        assert!(!report.age_ok);
    }

    #[test]
    fn test_violation_lists_all_categories() {
        let other: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let mut inputs = inputs_for(date(2010, 1, 1), "CA", wallet(), other);
        inputs.witness.signature_b.r[31] ^= 0x01;
        let err = strict().enforce(&inputs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "constraint violation: signature, age, citizenship, binding"
        );
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("strict".parse::<ConstraintMode>().unwrap(), ConstraintMode::Strict);
        assert_eq!("Permissive".parse::<ConstraintMode>().unwrap(), ConstraintMode::Permissive);
        assert!("lenient".parse::<ConstraintMode>().is_err());
        assert_eq!(ConstraintMode::Strict.to_string(), "strict");
    }
}
