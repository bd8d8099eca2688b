use serde::{Deserialize, Serialize};

use civis_core::{decode_short_string, AttestationKind, FieldElement, ReducedPublicKey};
use civis_crypto::{message_hash, verify_field, EcdsaSignature, IssuerPublicKey};

use crate::error::CredentialError;

/// An issuer's signed statement about one fact of a holder.
///
/// The signature covers `Poseidon(subject_value, subject_key, nonce)`. Credentials
/// are immutable once issued; the proof assembler only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// What `subject_value` means.
    pub attestation_kind: AttestationKind,
    /// Unix timestamp of birth, or a short-string-encoded country code.
    pub subject_value: FieldElement,
    /// The holder's binding key (their wallet address as a field element).
    pub subject_key: FieldElement,
    /// Issuer-chosen, unique per credential.
    pub nonce: FieldElement,
    pub signature: EcdsaSignature,
    /// Issuer key with both coordinates reduced into the field.
    pub issuer_public_key: ReducedPublicKey,
    /// Full secp256k1 issuer key. Private witness only.
    pub issuer_key: IssuerPublicKey,
}

impl Credential {
    /// The signed message: `Poseidon(subject_value, subject_key, nonce)`.
    pub fn message_hash(&self) -> Result<FieldElement, CredentialError> {
        Ok(message_hash(
            &self.subject_value,
            &self.subject_key,
            &self.nonce,
        )?)
    }

    /// Verify the issuer signature over the message hash.
    pub fn verify_signature(&self) -> Result<(), CredentialError> {
        let message = self.message_hash()?;
        verify_field(&message, &self.signature, &self.issuer_key)?;
        Ok(())
    }

    /// Full consistency check: the reduced key matches the full key and the
    /// signature verifies.
    pub fn check_integrity(&self) -> Result<(), CredentialError> {
        if self.issuer_key.reduced() != self.issuer_public_key {
            return Err(CredentialError::InvalidCredential(
                "reduced issuer key does not match full issuer key".into(),
            ));
        }
        self.verify_signature()
    }

    /// Fail unless this credential attests `expected`.
    pub fn expect_kind(&self, expected: AttestationKind) -> Result<(), CredentialError> {
        if self.attestation_kind != expected {
            return Err(CredentialError::WrongKind {
                expected,
                actual: self.attestation_kind,
            });
        }
        Ok(())
    }

    /// Human-readable subject value: an RFC 3339 date for a birth date, the
    /// decoded country code for citizenship.
    pub fn describe_value(&self) -> String {
        match self.attestation_kind {
            AttestationKind::DateOfBirth => self
                .subject_value
                .to_u64()
                .and_then(|ts| i64::try_from(ts).ok())
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.date_naive().to_string())
                .unwrap_or_else(|| self.subject_value.to_string()),
            AttestationKind::Citizenship => decode_short_string(&self.subject_value)
                .unwrap_or_else(|_| self.subject_value.to_string()),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, CredentialError> {
        serde_json::to_string_pretty(self).map_err(|e| CredentialError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        serde_json::from_str(json).map_err(|e| CredentialError::Serialization(e.to_string()))
    }
}
