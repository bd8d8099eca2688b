use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CoreError};
use crate::types::PolicyParameters;

/// Seconds in a Julian year (365.25 days); the divisor of the age computation.
pub const SECONDS_PER_YEAR: u64 = 31_557_600;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Default half-width of the accepted `current_date` window.
pub const DEFAULT_FRESHNESS_WINDOW_DAYS: u64 = 365;

/// Protocol parameters shared by the proof assembler and the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Minimum age in whole years.
    #[serde(default = "default_min_age")]
    pub min_age: u64,
    /// Required country code, e.g. "US".
    #[serde(default = "default_required_citizenship")]
    pub required_citizenship: String,
    /// Days `current_date` may deviate from the verifier's clock.
    #[serde(default = "default_freshness_window_days")]
    pub freshness_window_days: u64,
}

fn default_min_age() -> u64 {
    18
}
fn default_required_citizenship() -> String {
    "US".into()
}
fn default_freshness_window_days() -> u64 {
    DEFAULT_FRESHNESS_WINDOW_DAYS
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            required_citizenship: default_required_citizenship(),
            freshness_window_days: default_freshness_window_days(),
        }
    }
}

impl ProtocolConfig {
    /// Encode the configured policy into field form.
    pub fn policy(&self) -> Result<PolicyParameters, CodecError> {
        PolicyParameters::new(self.min_age, &self.required_citizenship)
    }

    /// Freshness window as a duration. Fails when the day count does not fit
    /// a `chrono::Duration`.
    pub fn freshness_window(&self) -> Result<chrono::Duration, CoreError> {
        i64::try_from(self.freshness_window_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "freshness_window_days {} is out of range",
                    self.freshness_window_days
                ))
            })
    }
}
