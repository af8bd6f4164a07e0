//! Discrepancy and truth-card types.
//!
//! A discrepancy records one rule firing for one claim: what kind of gap
//! was found, how severe it is, and the evidence behind it. The truth card
//! is the terminal aggregate for a whole reconciliation run; it is
//! immutable once produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::findings::Finding;

/// Severity tier of a discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Med,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Med => write!(f, "med"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Recommended handling for a discrepancy, derived from its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Escalate,
    NeedsReview,
    Monitor,
}

impl From<Severity> for Verdict {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => Self::Escalate,
            Severity::Med => Self::NeedsReview,
            Severity::Low => Self::Monitor,
        }
    }
}

/// The closed taxonomy of discrepancy kinds.
///
/// Every reconciliation rule emits exactly one of these, so adding a rule
/// means adding a variant and the compiler finds every match that needs
/// updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    UnderlicensedVsClaim,
    PartnerUnverified,
    Soc2Unsubstantiated,
    IsoUnverified,
    PciRequiresVerification,
    MarketingMetricUnverified,
    VagueMarketingClaim,
    RegulatoryClaimUnverified,
    ComplianceProgramMentioned,
    PrivacyComplianceClaim,
    RevenueClaimVerificationNeeded,
    RevenueClaimUnverified,
    ProfitabilityClaimContradictsFiling,
    MarketPositionUnsubstantiated,
    MarketShareClaimVerificationNeeded,
    ForwardLookingMissingDisclaimer,
    GuidanceVerificationNeeded,
    ForwardLookingEarningsVerificationNeeded,
    LitigationDisclosureVerificationNeeded,
    LitigationClaimMissingFiling,
    BusinessMetricUnverified,
    #[serde(rename = "material_event_missing_8k")]
    MaterialEventMissing8k,
    MaterialEventPressReleaseVerificationNeeded,
    HistoricalClaimsChanged,
}

impl DiscrepancyKind {
    /// Stable wire name, also used as the key into the adjustment table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderlicensedVsClaim => "underlicensed_vs_claim",
            Self::PartnerUnverified => "partner_unverified",
            Self::Soc2Unsubstantiated => "soc2_unsubstantiated",
            Self::IsoUnverified => "iso_unverified",
            Self::PciRequiresVerification => "pci_requires_verification",
            Self::MarketingMetricUnverified => "marketing_metric_unverified",
            Self::VagueMarketingClaim => "vague_marketing_claim",
            Self::RegulatoryClaimUnverified => "regulatory_claim_unverified",
            Self::ComplianceProgramMentioned => "compliance_program_mentioned",
            Self::PrivacyComplianceClaim => "privacy_compliance_claim",
            Self::RevenueClaimVerificationNeeded => "revenue_claim_verification_needed",
            Self::RevenueClaimUnverified => "revenue_claim_unverified",
            Self::ProfitabilityClaimContradictsFiling => "profitability_claim_contradicts_filing",
            Self::MarketPositionUnsubstantiated => "market_position_unsubstantiated",
            Self::MarketShareClaimVerificationNeeded => "market_share_claim_verification_needed",
            Self::ForwardLookingMissingDisclaimer => "forward_looking_missing_disclaimer",
            Self::GuidanceVerificationNeeded => "guidance_verification_needed",
            Self::ForwardLookingEarningsVerificationNeeded => {
                "forward_looking_earnings_verification_needed"
            }
            Self::LitigationDisclosureVerificationNeeded => {
                "litigation_disclosure_verification_needed"
            }
            Self::LitigationClaimMissingFiling => "litigation_claim_missing_filing",
            Self::BusinessMetricUnverified => "business_metric_unverified",
            Self::MaterialEventMissing8k => "material_event_missing_8k",
            Self::MaterialEventPressReleaseVerificationNeeded => {
                "material_event_press_release_verification_needed"
            }
            Self::HistoricalClaimsChanged => "historical_claims_changed",
        }
    }

    /// Only marketing metric discrepancies collapse across claims
    pub fn is_mergeable(&self) -> bool {
        matches!(self, Self::MarketingMetricUnverified)
    }
}

/// Pointer from an explanation to one supporting finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidencePointer {
    pub adapter: String,
    pub finding_key: String,
    pub summary: String,
    #[serde(default)]
    pub citation_urls: Vec<String>,
}

impl EvidencePointer {
    /// Build pointers for a set of findings.
    ///
    /// The summary prefers the snippet, then the value, then the status.
    pub fn from_findings(findings: &[Finding]) -> Vec<Self> {
        findings
            .iter()
            .map(|f| {
                let summary = f
                    .snippet
                    .clone()
                    .unwrap_or_else(|| {
                        let rendered = f.value.render();
                        if rendered.is_empty() {
                            format!("{:?}", f.status).to_lowercase()
                        } else {
                            rendered
                        }
                    });
                Self {
                    adapter: f.adapter.clone(),
                    finding_key: f.key.clone(),
                    summary,
                    citation_urls: f
                        .citations
                        .iter()
                        .filter(|c| !c.url.is_empty())
                        .map(|c| c.url.clone())
                        .collect(),
                }
            })
            .collect()
    }
}

/// Human-consumable explanation attached to a discrepancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationBundle {
    pub verdict: Verdict,
    pub supporting_evidence: Vec<EvidencePointer>,
    pub confidence: f64,
    #[serde(default)]
    pub follow_up_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Where and when a supporting finding was observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingProvenance {
    pub adapter: String,
    pub finding_key: String,
    pub observed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

impl FindingProvenance {
    pub fn from_findings(findings: &[Finding]) -> Vec<Self> {
        findings
            .iter()
            .map(|f| Self {
                adapter: f.adapter.clone(),
                finding_key: f.key.clone(),
                observed_at: f.observed_at,
                snippet: f.snippet.clone(),
                source_urls: f
                    .citations
                    .iter()
                    .filter(|c| !c.url.is_empty())
                    .map(|c| c.url.clone())
                    .collect(),
            })
            .collect()
    }
}

/// One reconciliation rule firing for one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Claim that triggered the rule; always present in the input claim set
    pub claim_id: String,

    /// Which rule fired
    pub kind: DiscrepancyKind,

    /// Severity tier (always produced together with confidence by the scorer)
    pub severity: Severity,

    /// Scorer confidence in [0, 1]
    pub confidence: f64,

    /// Why this matters to a reviewer
    pub why_it_matters: String,

    /// What evidence would resolve the discrepancy
    pub expected_evidence: String,

    /// The findings consulted when the rule fired
    pub findings: Vec<Finding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_text: Option<String>,

    pub explanation: ExplanationBundle,

    #[serde(default)]
    pub provenance: Vec<FindingProvenance>,

    /// Claim ids merged into this record, first-seen order
    #[serde(default)]
    pub related_claims: Vec<String>,

    #[serde(default)]
    pub related_claim_texts: Vec<String>,
}

/// Card-level finding not tied to any extracted claim.
///
/// Used for observations about the analysis run itself, currently only
/// historical claim-set drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardNote {
    pub kind: DiscrepancyKind,
    pub severity: Severity,
    pub confidence: f64,
    pub summary: String,
    pub why_it_matters: String,
    pub expected_evidence: String,
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub follow_up_actions: Vec<String>,
}

/// The full report for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruthCard {
    pub url: String,
    pub company: String,

    /// Literal "H:<n> • M:<n> • L:<n>" counts over discrepancies
    pub severity_summary: String,

    pub discrepancies: Vec<Discrepancy>,

    /// Run-level observations (not tied to a claim)
    #[serde(default)]
    pub card_notes: Vec<CardNote>,

    /// Crude scaling heuristic: min(1.0, 0.5 + 0.1 * discrepancy_count).
    /// Not a statistical confidence; kept for report compatibility.
    pub overall_confidence: f64,

    pub generated_at: DateTime<Utc>,
}
