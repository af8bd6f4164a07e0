//! Merging of duplicate discrepancies.
//!
//! Several marketing claims on one page often fail against the same
//! evidence set; reviewers want one record listing every affected claim,
//! not a pile of identical ones. Only `MarketingMetricUnverified` merges;
//! every other kind stays one record per rule firing.

use crate::domain::{Discrepancy, Finding};

/// Unordered fingerprint of a finding set.
///
/// Two discrepancies merge only when their finding sets are identical as
/// multisets of (adapter, key, value, status).
pub fn fingerprint_findings(findings: &[Finding]) -> Vec<(String, String, String, String)> {
    let mut fp: Vec<_> = findings
        .iter()
        .map(|f| {
            (
                f.adapter.clone(),
                f.key.clone(),
                f.value.render(),
                format!("{:?}", f.status).to_lowercase(),
            )
        })
        .collect();
    fp.sort();
    fp
}

/// Merge a new discrepancy into the batch, or append it.
///
/// On merge: related claims and texts are unioned in first-seen order,
/// follow-up actions are unioned, and an "Also flagged claim" note is
/// appended once per newly merged claim text.
pub fn merge_or_push(discrepancies: &mut Vec<Discrepancy>, new: Discrepancy) {
    if !new.kind.is_mergeable() {
        discrepancies.push(new);
        return;
    }

    let new_fp = fingerprint_findings(&new.findings);
    let existing = discrepancies
        .iter_mut()
        .find(|d| d.kind == new.kind && fingerprint_findings(&d.findings) == new_fp);

    let Some(existing) = existing else {
        discrepancies.push(new);
        return;
    };

    let mut added_claim = false;
    for (idx, claim_id) in new.related_claims.iter().enumerate() {
        if !existing.related_claims.contains(claim_id) {
            existing.related_claims.push(claim_id.clone());
            added_claim = true;
            if let Some(text) = new.related_claim_texts.get(idx) {
                if !text.is_empty() && !existing.related_claim_texts.contains(text) {
                    existing.related_claim_texts.push(text.clone());
                }
            }
        }
    }

    for action in &new.explanation.follow_up_actions {
        if !existing.explanation.follow_up_actions.contains(action) {
            existing.explanation.follow_up_actions.push(action.clone());
        }
    }

    if added_claim {
        if let Some(text) = &new.claim_text {
            let extra_note = format!("Also flagged claim: {}", text);
            let notes = existing.explanation.notes.get_or_insert_with(String::new);
            if !notes.contains(&extra_note) {
                if !notes.is_empty() {
                    notes.push('\n');
                }
                notes.push_str(&extra_note);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Claim, ClaimCategory, DiscrepancyKind, EvidencePointer, ExplanationBundle,
        FindingProvenance, FindingStatus, FindingValue, Severity, Verdict,
    };

    fn finding(adapter: &str, key: &str, value: &str, status: FindingStatus) -> Finding {
        Finding::new(adapter, key, FindingValue::text(value), status)
    }

    fn discrepancy(kind: DiscrepancyKind, claim: &Claim, findings: Vec<Finding>) -> Discrepancy {
        Discrepancy {
            claim_id: claim.id.clone(),
            kind,
            severity: Severity::Low,
            confidence: 0.5,
            why_it_matters: "why".to_string(),
            expected_evidence: "expected".to_string(),
            explanation: ExplanationBundle {
                verdict: Verdict::Monitor,
                supporting_evidence: EvidencePointer::from_findings(&findings),
                confidence: 0.5,
                follow_up_actions: vec![format!("follow up for {}", claim.id)],
                notes: None,
            },
            provenance: FindingProvenance::from_findings(&findings),
            findings,
            claim_text: Some(claim.claim_text.clone()),
            related_claims: vec![claim.id.clone()],
            related_claim_texts: vec![claim.claim_text.clone()],
        }
    }

    #[test]
    fn test_fingerprint_is_order_insensitive() {
        let a = vec![
            finding("edgar", "k1", "v1", FindingStatus::NotFound),
            finding("news", "k2", "v2", FindingStatus::Confirmed),
        ];
        let b = vec![
            finding("news", "k2", "v2", FindingStatus::Confirmed),
            finding("edgar", "k1", "v1", FindingStatus::NotFound),
        ];
        assert_eq!(fingerprint_findings(&a), fingerprint_findings(&b));
    }

    #[test]
    fn test_identical_metric_discrepancies_merge() {
        let claim_a = Claim::new("c1", ClaimCategory::Marketing, "Over 5M customers");
        let claim_b = Claim::new("c2", ClaimCategory::Marketing, "$10B processed annually");
        let findings = vec![finding("edgar", "edgar_search", "x", FindingStatus::NotFound)];

        let mut batch = Vec::new();
        merge_or_push(
            &mut batch,
            discrepancy(DiscrepancyKind::MarketingMetricUnverified, &claim_a, findings.clone()),
        );
        merge_or_push(
            &mut batch,
            discrepancy(DiscrepancyKind::MarketingMetricUnverified, &claim_b, findings),
        );

        assert_eq!(batch.len(), 1);
        let merged = &batch[0];
        assert_eq!(merged.related_claims, vec!["c1", "c2"]);
        assert_eq!(merged.explanation.follow_up_actions.len(), 2);
        assert!(merged
            .explanation
            .notes
            .as_deref()
            .unwrap()
            .contains("Also flagged claim: $10B processed annually"));
    }

    #[test]
    fn test_merge_is_idempotent_per_claim() {
        let claim = Claim::new("c1", ClaimCategory::Marketing, "Over 5M customers");
        let findings = vec![finding("edgar", "edgar_search", "x", FindingStatus::NotFound)];

        let mut batch = Vec::new();
        merge_or_push(
            &mut batch,
            discrepancy(DiscrepancyKind::MarketingMetricUnverified, &claim, findings.clone()),
        );
        merge_or_push(
            &mut batch,
            discrepancy(DiscrepancyKind::MarketingMetricUnverified, &claim, findings),
        );

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].related_claims, vec!["c1"]);
        // Same claim re-merged adds no note
        assert!(batch[0].explanation.notes.is_none());
    }

    #[test]
    fn test_different_fingerprints_do_not_merge() {
        let claim_a = Claim::new("c1", ClaimCategory::Marketing, "Over 5M customers");
        let claim_b = Claim::new("c2", ClaimCategory::Marketing, "$10B processed");

        let mut batch = Vec::new();
        merge_or_push(
            &mut batch,
            discrepancy(
                DiscrepancyKind::MarketingMetricUnverified,
                &claim_a,
                vec![finding("edgar", "a", "1", FindingStatus::NotFound)],
            ),
        );
        merge_or_push(
            &mut batch,
            discrepancy(
                DiscrepancyKind::MarketingMetricUnverified,
                &claim_b,
                vec![finding("edgar", "b", "2", FindingStatus::NotFound)],
            ),
        );

        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_non_mergeable_kinds_always_append() {
        let claim = Claim::new("c1", ClaimCategory::Marketing, "The leading platform");
        let findings = vec![finding("news", "k", "v", FindingStatus::NotFound)];

        let mut batch = Vec::new();
        merge_or_push(
            &mut batch,
            discrepancy(DiscrepancyKind::VagueMarketingClaim, &claim, findings.clone()),
        );
        merge_or_push(
            &mut batch,
            discrepancy(DiscrepancyKind::VagueMarketingClaim, &claim, findings),
        );

        assert_eq!(batch.len(), 2);
    }
}
