//! Severity rubric and forced-severity policy.
//!
//! Severity and confidence are always produced together here; no other
//! module sets either on its own. The rubric is category-keyed exact
//! rules, not a learned model. Kinds with regulatory weight carry a
//! forced severity that overrides the rubric outcome.

use crate::domain::{ClaimCategory, DiscrepancyKind, Severity};

use super::adjustments::AdjustmentTable;

/// One rubric row: evidence at or above the threshold earns the stronger tier
struct Rule {
    threshold: f64,
    met: (Severity, f64),
    unmet: (Severity, f64),
}

/// Rubric row for a claim category
fn rule_for(category: ClaimCategory) -> Rule {
    use ClaimCategory::*;
    use Severity::*;

    match category {
        Licensing | PartnerBank => Rule {
            threshold: 0.6,
            met: (High, 0.75),
            unmet: (Med, 0.55),
        },
        Security | Compliance => Rule {
            threshold: 0.5,
            met: (Med, 0.6),
            unmet: (Low, 0.45),
        },
        FinancialPerformance | Litigation | MaterialEvents => Rule {
            threshold: 0.5,
            met: (High, 0.7),
            unmet: (Med, 0.55),
        },
        ForwardLooking | MarketPosition | BusinessMetrics => Rule {
            threshold: 0.4,
            met: (Med, 0.6),
            unmet: (Low, 0.5),
        },
        // No category-specific rubric: everything bottoms out at low
        Regulatory | Marketing | Governance | IntellectualProperty => Rule {
            threshold: f64::INFINITY,
            met: (Low, 0.5),
            unmet: (Low, 0.5),
        },
    }
}

/// Post-rubric policy for kinds whose severity is fixed by rule
enum Policy {
    /// Rubric output stands
    Rubric,
    /// Severity is always this tier
    Force(Severity),
    /// A med outcome is demoted to low; high stands
    DemoteMedToLow,
}

fn policy_for(kind: DiscrepancyKind) -> Policy {
    use DiscrepancyKind::*;

    match kind {
        // Direct contradictions and missing mandatory filings are always critical
        ProfitabilityClaimContradictsFiling | LitigationClaimMissingFiling
        | MaterialEventMissing8k => Policy::Force(Severity::High),
        // Verification reminders, not problems
        MaterialEventPressReleaseVerificationNeeded | HistoricalClaimsChanged => {
            Policy::Force(Severity::Low)
        }
        RevenueClaimVerificationNeeded => Policy::DemoteMedToLow,
        _ => Policy::Rubric,
    }
}

/// Maps (claim category, discrepancy kind, evidence strength) to
/// (severity, confidence), applying feedback-derived adjustments.
#[derive(Debug, Clone, Default)]
pub struct SeverityScorer {
    adjustments: AdjustmentTable,
}

impl SeverityScorer {
    /// Scorer with an injected adjustment table
    pub fn new(adjustments: AdjustmentTable) -> Self {
        Self { adjustments }
    }

    /// Scorer that applies no adjustments
    pub fn unadjusted() -> Self {
        Self::new(AdjustmentTable::empty())
    }

    /// Score one rule firing.
    ///
    /// Boundary equality counts as met. Confidence is shifted by feedback
    /// even when the severity is forced; forcing only pins the tier.
    pub fn score(
        &self,
        category: ClaimCategory,
        kind: DiscrepancyKind,
        evidence_strength: f64,
    ) -> (Severity, f64) {
        let rule = rule_for(category);
        let adjustment = self.adjustments.get(kind);

        let threshold = (rule.threshold + adjustment.threshold_shift).clamp(0.0, 1.0);
        let (severity, base_confidence) = if evidence_strength >= threshold {
            rule.met
        } else {
            rule.unmet
        };

        let severity = match policy_for(kind) {
            Policy::Rubric => severity,
            Policy::Force(forced) => forced,
            Policy::DemoteMedToLow => {
                if severity == Severity::Med {
                    Severity::Low
                } else {
                    severity
                }
            }
        };

        let confidence = (base_confidence + adjustment.confidence_shift).clamp(0.0, 1.0);
        (severity, confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::adjustments::{Adjustment, AdjustmentStore};

    fn scorer() -> SeverityScorer {
        SeverityScorer::unadjusted()
    }

    #[test]
    fn test_licensing_rubric_boundaries() {
        let s = scorer();
        let kind = DiscrepancyKind::UnderlicensedVsClaim;

        // Boundary equality counts as met
        let (sev, conf) = s.score(ClaimCategory::Licensing, kind, 0.6);
        assert_eq!(sev, Severity::High);
        assert_eq!(conf, 0.75);

        let (sev, conf) = s.score(ClaimCategory::Licensing, kind, 0.59);
        assert_eq!(sev, Severity::Med);
        assert_eq!(conf, 0.55);
    }

    #[test]
    fn test_security_and_compliance_rubric() {
        let s = scorer();

        let (sev, conf) = s.score(
            ClaimCategory::Security,
            DiscrepancyKind::Soc2Unsubstantiated,
            0.5,
        );
        assert_eq!((sev, conf), (Severity::Med, 0.6));

        let (sev, conf) = s.score(
            ClaimCategory::Compliance,
            DiscrepancyKind::ComplianceProgramMentioned,
            0.49,
        );
        assert_eq!((sev, conf), (Severity::Low, 0.45));
    }

    #[test]
    fn test_financial_rubric() {
        let s = scorer();
        let kind = DiscrepancyKind::RevenueClaimUnverified;

        let (sev, _) = s.score(ClaimCategory::FinancialPerformance, kind, 0.5);
        assert_eq!(sev, Severity::High);
        let (sev, conf) = s.score(ClaimCategory::FinancialPerformance, kind, 0.3);
        assert_eq!((sev, conf), (Severity::Med, 0.55));
    }

    #[test]
    fn test_forward_looking_rubric() {
        let s = scorer();
        let kind = DiscrepancyKind::ForwardLookingMissingDisclaimer;

        let (sev, conf) = s.score(ClaimCategory::ForwardLooking, kind, 0.4);
        assert_eq!((sev, conf), (Severity::Med, 0.6));
        let (sev, conf) = s.score(ClaimCategory::ForwardLooking, kind, 0.0);
        assert_eq!((sev, conf), (Severity::Low, 0.5));
    }

    #[test]
    fn test_uncovered_categories_are_low() {
        let s = scorer();
        let (sev, conf) = s.score(
            ClaimCategory::Governance,
            DiscrepancyKind::VagueMarketingClaim,
            1.0,
        );
        assert_eq!((sev, conf), (Severity::Low, 0.5));
    }

    #[test]
    fn test_forced_high_ignores_evidence_strength() {
        let s = scorer();
        for strength in [0.0, 0.3, 0.5, 1.0] {
            let (sev, _) = s.score(
                ClaimCategory::FinancialPerformance,
                DiscrepancyKind::ProfitabilityClaimContradictsFiling,
                strength,
            );
            assert_eq!(sev, Severity::High);

            let (sev, _) = s.score(
                ClaimCategory::Litigation,
                DiscrepancyKind::LitigationClaimMissingFiling,
                strength,
            );
            assert_eq!(sev, Severity::High);

            let (sev, _) = s.score(
                ClaimCategory::MaterialEvents,
                DiscrepancyKind::MaterialEventMissing8k,
                strength,
            );
            assert_eq!(sev, Severity::High);
        }
    }

    #[test]
    fn test_forced_low_kinds() {
        let s = scorer();
        let (sev, _) = s.score(
            ClaimCategory::MaterialEvents,
            DiscrepancyKind::MaterialEventPressReleaseVerificationNeeded,
            1.0,
        );
        assert_eq!(sev, Severity::Low);

        let (sev, _) = s.score(
            ClaimCategory::Marketing,
            DiscrepancyKind::HistoricalClaimsChanged,
            1.0,
        );
        assert_eq!(sev, Severity::Low);
    }

    #[test]
    fn test_revenue_verification_demotes_med_only() {
        let s = scorer();
        let kind = DiscrepancyKind::RevenueClaimVerificationNeeded;

        // Below threshold the rubric says med; policy demotes to low
        let (sev, _) = s.score(ClaimCategory::FinancialPerformance, kind, 0.3);
        assert_eq!(sev, Severity::Low);

        // At threshold the rubric says high; high stands
        let (sev, _) = s.score(ClaimCategory::FinancialPerformance, kind, 0.5);
        assert_eq!(sev, Severity::High);
    }

    #[test]
    fn test_adjustments_shift_threshold_and_confidence() {
        let mut store = AdjustmentStore::default();
        store.adjustments.insert(
            "partner_unverified".to_string(),
            Adjustment {
                threshold_shift: 0.2,
                confidence_shift: -0.05,
                sample_size: 4,
            },
        );
        let s = SeverityScorer::new(AdjustmentTable::from_store(store));

        // 0.6 evidence no longer clears the shifted 0.8 threshold
        let (sev, conf) = s.score(
            ClaimCategory::PartnerBank,
            DiscrepancyKind::PartnerUnverified,
            0.6,
        );
        assert_eq!(sev, Severity::Med);
        assert!((conf - 0.5).abs() < 1e-9);

        // 0.8 does
        let (sev, conf) = s.score(
            ClaimCategory::PartnerBank,
            DiscrepancyKind::PartnerUnverified,
            0.8,
        );
        assert_eq!(sev, Severity::High);
        assert!((conf - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_clamped_to_unit_interval() {
        let mut store = AdjustmentStore::default();
        store.adjustments.insert(
            "underlicensed_vs_claim".to_string(),
            Adjustment {
                threshold_shift: 0.0,
                confidence_shift: 0.9,
                sample_size: 1,
            },
        );
        let s = SeverityScorer::new(AdjustmentTable::from_store(store));

        let (_, conf) = s.score(
            ClaimCategory::Licensing,
            DiscrepancyKind::UnderlicensedVsClaim,
            1.0,
        );
        assert_eq!(conf, 1.0);
    }
}
