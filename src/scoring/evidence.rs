//! Aggregate evidence strength.
//!
//! Additive score over a bucket of findings. This is a scalar signal of
//! how much verification evidence exists, not a measure of whether the
//! claim is true: a not_found finding still counts, because the source
//! was consulted and answered.

use crate::domain::{Finding, FindingStatus};

/// Weight of a single finding by status
fn finding_weight(status: FindingStatus) -> f64 {
    match status {
        FindingStatus::Confirmed => 0.25,
        FindingStatus::Inconsistent => 0.20,
        FindingStatus::NotFound => 0.15,
        FindingStatus::Unknown => 0.0,
    }
}

/// Evidence strength in [0, 1] for a set of findings.
///
/// Empty input scores 0.0; the sum saturates at 1.0 (four confirmed
/// findings are as strong as evidence gets).
pub fn confidence_from_findings(findings: &[Finding]) -> f64 {
    let score: f64 = findings.iter().map(|f| finding_weight(f.status)).sum();
    score.min(1.0)
}
