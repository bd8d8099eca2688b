use serde::{Deserialize, Serialize};

/// Named results of the gateway's non-pairing checks for one signal vector.
///
/// Diagnostic only: a report with every check passed says nothing about
/// whether the proof itself verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionReport {
    pub all_passed: bool,
    pub checks: Vec<InspectionCheck>,
}

/// An individual inspection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionCheck {
    /// Name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Optional detail message.
    pub detail: Option<String>,
}

impl InspectionReport {
    pub(crate) fn from_checks(checks: Vec<InspectionCheck>) -> Self {
        Self {
            all_passed: checks.iter().all(|c| c.passed),
            checks,
        }
    }

    /// Look up a check by name.
    pub fn check(&self, name: &str) -> Option<&InspectionCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Names of the failing checks.
    pub fn failed(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl InspectionCheck {
    pub(crate) fn new(name: &str, passed: bool, failure_detail: impl FnOnce() -> String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail: if passed { None } else { Some(failure_detail()) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_aggregates() {
        let report = InspectionReport::from_checks(vec![
            InspectionCheck::new("freshness", true, || unreachable!()),
            InspectionCheck::new("binding", false, || "wallet mismatch".into()),
        ]);
        assert!(!report.all_passed);
        assert_eq!(report.failed(), vec!["binding"]);
        assert_eq!(
            report.check("binding").unwrap().detail.as_deref(),
            Some("wallet mismatch")
        );
        assert!(report.check("freshness").unwrap().detail.is_none());
    }

    #[test]
    fn test_empty_report_passes() {
        assert!(InspectionReport::from_checks(Vec::new()).all_passed);
    }
}
