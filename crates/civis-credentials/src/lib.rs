//! Civis Credentials: issuer-signed attestations over a holder's date of
//! birth or citizenship.

pub mod credential;
pub mod error;
pub mod issuer;

pub use credential::Credential;
pub use error::CredentialError;
pub use issuer::{date_to_timestamp, issue, random_nonce, CredentialIssuer};
