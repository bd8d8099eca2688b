use chrono::{NaiveDate, NaiveTime};

use civis_core::{encode_short_string, Address, AttestationKind, FieldElement};
use civis_crypto::{message_hash, sign_field, IssuerPublicKey, KeyPair};

use crate::credential::Credential;
use crate::error::CredentialError;

/// Sign a credential over `Poseidon(subject_value, subject_key, nonce)`.
///
/// Deterministic for a given key and inputs. The issuer key is derived from
/// `keypair` and reduced into the field before it is attached.
pub fn issue(
    kind: AttestationKind,
    subject_value: FieldElement,
    subject_key: FieldElement,
    nonce: FieldElement,
    keypair: &KeyPair,
) -> Result<Credential, CredentialError> {
    let message = message_hash(&subject_value, &subject_key, &nonce)
        .map_err(|e| CredentialError::IssuanceFailed(e.to_string()))?;
    let signature =
        sign_field(&message, keypair).map_err(|e| CredentialError::IssuanceFailed(e.to_string()))?;
    let issuer_key = keypair.public_key();

    let credential = Credential {
        attestation_kind: kind,
        subject_value,
        subject_key,
        nonce,
        signature,
        issuer_public_key: issuer_key.reduced(),
        issuer_key,
    };

    tracing::info!(
        kind = %kind,
        subject_key = %subject_key,
        issuer_x = %credential.issuer_public_key.x,
        "credential issued"
    );

    Ok(credential)
}

/// An issuing authority holding one signing key.
pub struct CredentialIssuer {
    keypair: KeyPair,
}

impl CredentialIssuer {
    /// Create a new credential issuer.
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// The issuer's full public key.
    pub fn public_key(&self) -> IssuerPublicKey {
        self.keypair.public_key()
    }

    /// Issue with an explicit nonce.
    pub fn issue(
        &self,
        kind: AttestationKind,
        subject_value: FieldElement,
        holder: Address,
        nonce: FieldElement,
    ) -> Result<Credential, CredentialError> {
        issue(kind, subject_value, holder.to_field(), nonce, &self.keypair)
    }

    /// Attest a birth date (midnight UTC). Dates before 1970 are rejected
    /// because the age check works on unsigned timestamps.
    pub fn issue_date_of_birth(
        &self,
        date_of_birth: NaiveDate,
        holder: Address,
    ) -> Result<Credential, CredentialError> {
        let timestamp = date_to_timestamp(date_of_birth)?;
        self.issue(
            AttestationKind::DateOfBirth,
            FieldElement::from_u64(timestamp),
            holder,
            random_nonce(),
        )
    }

    /// Attest citizenship by country code, e.g. "US".
    pub fn issue_citizenship(
        &self,
        country_code: &str,
        holder: Address,
    ) -> Result<Credential, CredentialError> {
        let value = encode_short_string(country_code)?;
        self.issue(AttestationKind::Citizenship, value, holder, random_nonce())
    }
}

/// Seconds since the Unix epoch at midnight UTC of `date`.
pub fn date_to_timestamp(date: NaiveDate) -> Result<u64, CredentialError> {
    let ts = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    u64::try_from(ts).map_err(|_| {
        CredentialError::IssuanceFailed(format!("date {} precedes the Unix epoch", date))
    })
}

/// A uniformly random nonce below the field order.
pub fn random_nonce() -> FieldElement {
    FieldElement::reduce(&rand::random::<[u8; 32]>())
}
