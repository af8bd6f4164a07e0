//! The claim reconciliation engine.
//!
//! Iterates the extracted claims, applies category-specific rules against
//! adapter findings, and assembles the truth card. Rules fire
//! independently: a single claim can trigger zero, one, or several
//! discrepancies. Missing or malformed evidence is the weakest evidence,
//! never an error.

use chrono::Utc;
use tracing::debug;

use crate::domain::{
    AdapterResults, CardNote, Claim, ClaimCategory, ClaimSet, Discrepancy, DiscrepancyKind,
    EvidencePointer, ExplanationBundle, Finding, FindingProvenance, FindingStatus, Severity,
    TruthCard,
};
use crate::scoring::{confidence_from_findings, SeverityScorer};

use super::merge::merge_or_push;

const VAGUE_MARKETING_WORDS: &[&str] = &["leading", "fastest", "best", "#1", "top", "premier"];

const VAGUE_POSITION_WORDS: &[&str] = &[
    "leading", "#1", "largest", "fastest", "best", "top", "premier", "dominant",
];

const FORWARD_LOOKING_KEYWORDS: &[&str] = &[
    "expect", "believe", "anticipate", "plan", "forecast", "project", "guidance", "target",
];

const DISCLAIMER_KEYWORDS: &[&str] = &["forward-looking", "cautionary", "safe harbor", "risks"];

const LITIGATION_KEYWORDS: &[&str] = &[
    "lawsuit", "litigation", "legal action", "sued", "complaint", "dispute", "settlement",
];

const MATERIAL_EVENT_KEYWORDS: &[&str] = &[
    "acquired", "merger", "partnership", "ceo", "executive", "leadership", "agreement",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// True if any confirmed finding mentions one of the keywords in its
/// key, value, or snippet.
fn has_confirmed_metric(findings: &[Finding], keywords: &[&str]) -> bool {
    findings
        .iter()
        .filter(|f| f.status == FindingStatus::Confirmed)
        .any(|f| {
            let haystack = f.haystack();
            keywords.iter().any(|kw| haystack.contains(kw))
        })
}

fn any_confirmed(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.status == FindingStatus::Confirmed)
}

/// First parseable numeric value among findings with the given key
fn numeric_finding(findings: &[Finding], key: &str) -> Option<f64> {
    findings
        .iter()
        .filter(|f| f.key == key)
        .find_map(|f| f.value.as_number())
}

fn owned(strings: &[&str]) -> Vec<String> {
    strings.iter().map(|s| s.to_string()).collect()
}

fn build_discrepancy(
    claim: &Claim,
    kind: DiscrepancyKind,
    severity: Severity,
    confidence: f64,
    why: &str,
    expected: String,
    findings: Vec<Finding>,
    follow_ups: &[&str],
) -> Discrepancy {
    Discrepancy {
        claim_id: claim.id.clone(),
        kind,
        severity,
        confidence,
        why_it_matters: why.to_string(),
        expected_evidence: expected,
        explanation: ExplanationBundle {
            verdict: severity.into(),
            supporting_evidence: EvidencePointer::from_findings(&findings),
            confidence,
            follow_up_actions: owned(follow_ups),
            notes: None,
        },
        provenance: FindingProvenance::from_findings(&findings),
        findings,
        claim_text: Some(claim.claim_text.clone()),
        related_claims: vec![claim.id.clone()],
        related_claim_texts: if claim.claim_text.is_empty() {
            Vec::new()
        } else {
            vec![claim.claim_text.clone()]
        },
    }
}

/// Reconcile extracted claims against adapter findings.
///
/// Pure computation: all adapter fetches must already be collected into
/// `results`. The same inputs produce the same card, modulo
/// `generated_at`.
pub fn reconcile(
    claims: &ClaimSet,
    results: &AdapterResults,
    scorer: &SeverityScorer,
) -> TruthCard {
    let mut discrepancies: Vec<Discrepancy> = Vec::new();

    debug!(company = %claims.company, claims = claims.claims.len(), "Reconciling claims");

    for claim in &claims.claims {
        match claim.category {
            ClaimCategory::Licensing => check_licensing(claim, results, scorer, &mut discrepancies),
            ClaimCategory::PartnerBank => {
                check_partner_bank(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::Security => check_security(claim, results, scorer, &mut discrepancies),
            ClaimCategory::Marketing => check_marketing(claim, results, scorer, &mut discrepancies),
            ClaimCategory::Regulatory => {
                check_regulatory(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::Compliance => {
                check_compliance(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::FinancialPerformance => {
                check_financial_performance(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::MarketPosition => {
                check_market_position(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::ForwardLooking => {
                check_forward_looking(claim, results, scorer, &mut discrepancies);
                check_earnings_alignment(claim, results, scorer, &mut discrepancies);
            }
            ClaimCategory::Litigation => {
                check_litigation(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::BusinessMetrics => {
                check_business_metrics(claim, results, scorer, &mut discrepancies)
            }
            ClaimCategory::MaterialEvents => {
                check_material_events(claim, results, scorer, &mut discrepancies);
                check_press_release_coverage(claim, results, scorer, &mut discrepancies);
            }
            // No reconciliation rules for these categories yet
            ClaimCategory::Governance | ClaimCategory::IntellectualProperty => {}
        }
    }

    // Run-level pass, once per card
    let card_notes = check_historical_changes(results, scorer);

    let mut high = 0usize;
    let mut med = 0usize;
    let mut low = 0usize;
    for d in &discrepancies {
        match d.severity {
            Severity::High => high += 1,
            Severity::Med => med += 1,
            Severity::Low => low += 1,
        }
    }

    TruthCard {
        url: claims.url.clone(),
        company: claims.company.clone(),
        severity_summary: format!("H:{} • M:{} • L:{}", high, med, low),
        // Placeholder heuristic kept for report compatibility
        overall_confidence: (0.5 + 0.1 * discrepancies.len() as f64).min(1.0),
        discrepancies,
        card_notes,
        generated_at: Utc::now(),
    }
}

/// Licensed-state-count claims vs the NMLS roster.
///
/// Only runs when the claim carries a numeric token of 30 or more; a
/// roster shorter than 20 states then contradicts it.
fn check_licensing(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let claims_many_states = claim
        .values
        .iter()
        .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|v| v.parse::<u64>().ok())
        .any(|n| n >= 30);
    if !claims_many_states {
        return;
    }

    let findings = &results.nmls;
    let roster_len = findings
        .iter()
        .filter(|f| f.key == "us_mtl_states")
        .filter_map(|f| f.value.as_states())
        .last()
        .map(|states| states.len());

    // An unparsable roster is no evidence, not an error
    let Some(roster_len) = roster_len else { return };
    if roster_len == 0 || roster_len >= 20 {
        return;
    }

    let strength = confidence_from_findings(findings);
    let (severity, confidence) =
        scorer.score(claim.category, DiscrepancyKind::UnderlicensedVsClaim, strength);
    out.push(build_discrepancy(
        claim,
        DiscrepancyKind::UnderlicensedVsClaim,
        severity,
        confidence,
        "Compliance and go-to-market risk; may impact money movement and onboarding.",
        "NMLS roster export or auditor letter with current state licenses.".to_string(),
        findings.clone(),
        &[
            "Request updated NMLS roster from the compliance owner.",
            "Align marketing copy with current state coverage.",
        ],
    ));
}

/// Sponsor-bank claims need at least one confirmed source
fn check_partner_bank(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let mut findings = results.bank_partners.clone();
    findings.extend(results.news.iter().cloned());

    if any_confirmed(&findings) {
        return;
    }

    let strength = confidence_from_findings(&findings);
    let (severity, confidence) =
        scorer.score(claim.category, DiscrepancyKind::PartnerUnverified, strength);
    out.push(build_discrepancy(
        claim,
        DiscrepancyKind::PartnerUnverified,
        severity,
        confidence,
        "Sponsor bank claims require verification; affects issuing and compliance.",
        "Bank partner page listing or joint press release.".to_string(),
        findings,
        &[
            "Secure sponsor bank confirmation or contract excerpt.",
            "Escalate to partnerships lead for attestation.",
        ],
    ));
}

/// SOC 2 / ISO / PCI certification claims vs the trust center
fn check_security(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let findings = &results.trust_center;

    if claim.claim_text.contains("SOC 2") {
        let security_txt_missing = findings
            .iter()
            .any(|f| f.key == "security_txt" && f.status == FindingStatus::NotFound);
        if security_txt_missing {
            let strength = confidence_from_findings(findings);
            let (severity, confidence) =
                scorer.score(claim.category, DiscrepancyKind::Soc2Unsubstantiated, strength);
            out.push(build_discrepancy(
                claim,
                DiscrepancyKind::Soc2Unsubstantiated,
                severity,
                confidence,
                "Unverified SOC 2 claim can be misleading; request auditor letter or trust center link.",
                "SOC 2 Type II auditor letter (date, scope) or trust center reference.".to_string(),
                findings.clone(),
                &[
                    "Request SOC 2 auditor letter or trust center link from security lead.",
                    "Pause external messaging until attestation is confirmed.",
                ],
            ));
        }
    }

    if claim.claim_text.contains("ISO") {
        let iso_confirmed = findings
            .iter()
            .any(|f| f.key == "iso_cert" && f.status == FindingStatus::Confirmed);
        if !iso_confirmed {
            let strength = confidence_from_findings(findings);
            let (severity, confidence) =
                scorer.score(claim.category, DiscrepancyKind::IsoUnverified, strength);
            out.push(build_discrepancy(
                claim,
                DiscrepancyKind::IsoUnverified,
                severity,
                confidence,
                "ISO certification claims should be verifiable through certificate registries.",
                "ISO certificate number or listing in certification body database.".to_string(),
                findings.clone(),
                &[
                    "Collect ISO certificate ID and certification body from security team.",
                    "Update claim copy with verified scope and coverage.",
                ],
            ));
        }
    }

    // PCI always needs an attestation; only the evidence strength varies
    if claim.claim_text.contains("PCI") {
        let strength = confidence_from_findings(findings);
        let (severity, confidence) =
            scorer.score(claim.category, DiscrepancyKind::PciRequiresVerification, strength);
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::PciRequiresVerification,
            severity,
            confidence,
            "PCI DSS compliance level should be verified with QSA attestation.",
            "PCI DSS Attestation of Compliance (AOC) or QSA letter with level and date.".to_string(),
            findings.clone(),
            &[
                "Request current AOC or QSA attestation letter.",
                "Confirm PCI scope with payments ops stakeholder.",
            ],
        ));
    }
}

/// Marketing metrics and superlatives vs filings, news, and press metrics
fn check_marketing(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let mut findings = results.edgar.clone();
    findings.extend(results.news.iter().cloned());
    findings.extend(results.press_metrics.iter().cloned());

    let kind_text = claim.kind_text();

    if contains_any(&kind_text, &["customer", "user"])
        && !has_confirmed_metric(&findings, &["customer", "user", "merchant"])
    {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) =
            scorer.score(claim.category, DiscrepancyKind::MarketingMetricUnverified, strength);
        merge_or_push(
            out,
            build_discrepancy(
                claim,
                DiscrepancyKind::MarketingMetricUnverified,
                severity,
                confidence,
                "Customer counts are often marketing puffery; verify against SEC filings or audited reports.",
                "SEC 10-K/10-Q user metrics or audited customer count statement.".to_string(),
                findings.clone(),
                &[
                    "Request audited customer count from finance or strategy.",
                    "Replace claim with certified figures before publication.",
                ],
            ),
        );
    }

    if contains_any(&kind_text, &["volume", "transaction", "processed", "payment"])
        && !has_confirmed_metric(&findings, &["volume", "payment", "processed", "gmv"])
    {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) =
            scorer.score(claim.category, DiscrepancyKind::MarketingMetricUnverified, strength);
        merge_or_push(
            out,
            build_discrepancy(
                claim,
                DiscrepancyKind::MarketingMetricUnverified,
                severity,
                confidence,
                "Transaction volumes should be verified against regulatory filings or audited statements.",
                "SEC filing with payment volume metrics or press release with audited figures."
                    .to_string(),
                findings.clone(),
                &[
                    "Gather audited payment volume from finance or data team.",
                    "Escalate marketing claim for revision until figures are confirmed.",
                ],
            ),
        );
    }

    if contains_any(&claim.claim_text.to_lowercase(), VAGUE_MARKETING_WORDS) {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) =
            scorer.score(claim.category, DiscrepancyKind::VagueMarketingClaim, strength);
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::VagueMarketingClaim,
            severity,
            confidence,
            "Superlative marketing claims ('leading', 'best') are subjective and often unsubstantiated.",
            "Independent market research, industry report, or specific metric defining 'leading' status."
                .to_string(),
            findings,
            &[
                "Swap subjective superlatives for measurable metrics.",
                "Attach third-party research or market share data if claim persists.",
            ],
        ));
    }
}

/// SEC registration claims vs EDGAR company lookups
fn check_regulatory(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    if !claim.claim_text.contains("SEC") {
        return;
    }

    let mut findings = results.cfpb.clone();
    findings.extend(results.edgar.iter().cloned());

    let registration_confirmed = findings.iter().any(|f| {
        (f.key == "edgar_cik" || f.key == "edgar_company_name")
            && f.status == FindingStatus::Confirmed
    });
    if registration_confirmed {
        return;
    }

    let strength = confidence_from_findings(&findings);
    let (severity, confidence) =
        scorer.score(claim.category, DiscrepancyKind::RegulatoryClaimUnverified, strength);
    out.push(build_discrepancy(
        claim,
        DiscrepancyKind::RegulatoryClaimUnverified,
        severity,
        confidence,
        "SEC registration can be verified through EDGAR; false claims are serious violations.",
        "CIK number and EDGAR filing history for RIA, BD, or other registration.".to_string(),
        findings,
        &[
            "Confirm SEC registration status and obtain CIK from legal.",
            "Update marketing and disclosures if registration is absent.",
        ],
    ));
}

/// AML/KYC and privacy-program mentions; both rules can fire independently
fn check_compliance(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let mut findings = results.trust_center.clone();
    findings.extend(results.edgar.iter().cloned());

    let upper = claim.claim_text.to_uppercase();

    if contains_any(&upper, &["AML", "KYC", "BSA"]) {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) =
            scorer.score(claim.category, DiscrepancyKind::ComplianceProgramMentioned, strength);
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::ComplianceProgramMentioned,
            severity,
            confidence,
            "AML/KYC programs should be documented and verifiable; vague mentions are red flags.",
            "AML policy document, compliance program description, or regulatory examination results."
                .to_string(),
            findings.clone(),
            &[
                "Request AML/KYC policy pack from compliance.",
                "Ensure public statements reflect actual program status.",
            ],
        ));
    }

    if contains_any(&upper, &["GDPR", "CCPA"]) {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) =
            scorer.score(claim.category, DiscrepancyKind::PrivacyComplianceClaim, strength);
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::PrivacyComplianceClaim,
            severity,
            confidence,
            "Privacy compliance should be documented in privacy policy with specific measures.",
            "Privacy policy with GDPR/CCPA-specific rights, DPO contact, or privacy certification."
                .to_string(),
            findings,
            &[
                "Obtain privacy compliance documentation from legal.",
                "Clarify public claim with exact scope of GDPR/CCPA coverage.",
            ],
        ));
    }
}

/// Revenue and profitability claims vs EDGAR filing data
fn check_financial_performance(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let findings = &results.edgar_filings;
    let text = claim.claim_text.to_lowercase();

    if contains_any(&text, &["revenue", "sales", "$"]) {
        // A dollar-like value token makes the claim checkable
        let claim_value = claim.values.iter().find(|v| {
            let lower = v.to_lowercase();
            v.contains('$') || lower.contains("billion") || lower.contains("million")
        });

        let edgar_revenue = findings
            .iter()
            .filter(|f| f.key == "edgar_revenue_annual" && f.status == FindingStatus::Confirmed)
            .find_map(|f| f.value.as_number());

        if claim_value.is_some() {
            let strength = confidence_from_findings(findings);
            if let Some(revenue) = edgar_revenue {
                // EDGAR data exists: a verification reminder, not a problem.
                // The scorer demotes a med outcome to low for this kind.
                let (severity, confidence) = scorer.score(
                    claim.category,
                    DiscrepancyKind::RevenueClaimVerificationNeeded,
                    strength,
                );
                out.push(build_discrepancy(
                    claim,
                    DiscrepancyKind::RevenueClaimVerificationNeeded,
                    severity,
                    confidence,
                    "Revenue claims should match SEC filings; verify that website claim aligns with latest filing data.",
                    format!(
                        "SEC 10-K/10-Q filing showing revenue figure matching website claim (EDGAR shows ${:.0}).",
                        revenue
                    ),
                    findings.clone(),
                    &[
                        "Verify revenue figure matches latest SEC filing.",
                        "Update website if claim is outdated or incorrect.",
                    ],
                ));
            } else {
                let (severity, confidence) = scorer.score(
                    claim.category,
                    DiscrepancyKind::RevenueClaimUnverified,
                    strength,
                );
                out.push(build_discrepancy(
                    claim,
                    DiscrepancyKind::RevenueClaimUnverified,
                    severity,
                    confidence,
                    "Public company revenue claims should be verifiable against SEC filings.",
                    "SEC 10-K/10-Q filing with revenue figures.".to_string(),
                    findings.clone(),
                    &[
                        "Verify company is public and SEC filings are accessible.",
                        "Ensure revenue claim matches latest SEC filing.",
                    ],
                ));
            }
        }
    }

    if contains_any(&text, &["profit", "income", "loss", "profitable", "earnings"]) {
        let net_income = numeric_finding(findings, "edgar_net_income_annual");
        let claims_profitable = contains_any(&text, &["profitable", "profit", "positive"]);

        if let Some(net_income) = net_income {
            if claims_profitable && net_income < 0.0 {
                let strength = confidence_from_findings(findings);
                let (severity, confidence) = scorer.score(
                    claim.category,
                    DiscrepancyKind::ProfitabilityClaimContradictsFiling,
                    strength,
                );
                out.push(build_discrepancy(
                    claim,
                    DiscrepancyKind::ProfitabilityClaimContradictsFiling,
                    severity,
                    confidence,
                    "Website claims profitability but SEC filing shows net loss. This is a serious discrepancy.",
                    format!(
                        "SEC filing showing net income matching website claim (filing shows ${:.0}).",
                        net_income
                    ),
                    findings.clone(),
                    &[
                        "Immediately update website to reflect accurate financial status.",
                        "Escalate to legal/compliance if claim was intentionally misleading.",
                    ],
                ));
            }
        }
    }
}

/// Market leadership and market-share claims
fn check_market_position(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let mut findings = results.edgar_filings.clone();
    findings.extend(results.news.iter().cloned());

    let text = claim.claim_text.to_lowercase();

    if contains_any(&text, VAGUE_POSITION_WORDS) {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) = scorer.score(
            claim.category,
            DiscrepancyKind::MarketPositionUnsubstantiated,
            strength,
        );
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::MarketPositionUnsubstantiated,
            severity,
            confidence,
            "Market position claims should be supported by independent research, market share data, or industry reports.",
            "Third-party market research, industry analyst report, or quantifiable market share metric."
                .to_string(),
            findings.clone(),
            &[
                "Request supporting data from marketing/product team.",
                "Replace subjective claims with specific, verifiable metrics.",
            ],
        ));
    }

    if claim.claim_text.contains('%') && contains_any(&text, &["market share", "share"]) {
        let strength = confidence_from_findings(&findings);
        let (severity, confidence) = scorer.score(
            claim.category,
            DiscrepancyKind::MarketShareClaimVerificationNeeded,
            strength,
        );
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::MarketShareClaimVerificationNeeded,
            severity,
            confidence,
            "Market share percentages should be verifiable through industry reports or financial filings.",
            "Market research report or industry analysis supporting the market share claim.".to_string(),
            findings,
            &[
                "Obtain source documentation for market share figure.",
                "Ensure claim includes attribution to research source.",
            ],
        ));
    }
}

/// Missing safe-harbor disclaimers and unverified guidance
fn check_forward_looking(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let findings = &results.edgar_filings;
    let text = claim.claim_text.to_lowercase();

    let has_forward_keywords = contains_any(&text, FORWARD_LOOKING_KEYWORDS);
    let has_disclaimer = contains_any(&text, DISCLAIMER_KEYWORDS);

    if has_forward_keywords && !has_disclaimer {
        let strength = confidence_from_findings(findings);
        let (severity, confidence) = scorer.score(
            claim.category,
            DiscrepancyKind::ForwardLookingMissingDisclaimer,
            strength,
        );
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::ForwardLookingMissingDisclaimer,
            severity,
            confidence,
            "Forward-looking statements should include safe harbor disclaimers to protect against liability.",
            "Forward-looking statement with appropriate safe harbor language and risk disclaimers."
                .to_string(),
            findings.clone(),
            &[
                "Add safe harbor disclaimer to forward-looking statements.",
                "Review with legal team to ensure compliance with SEC guidance.",
            ],
        ));
    }

    // Guidance figures cannot be parsed out of filings here; flag for
    // manual review when recent filings exist to compare against
    if text.contains("guidance") && contains_any(&text, &["$", "revenue", "earnings", "forecast"]) {
        let has_recent_filings = findings.iter().any(|f| {
            f.key.contains("edgar_8k")
                || f.key.contains("edgar_latest_10q")
                || f.key.contains("edgar_latest_10k")
        });
        if has_recent_filings {
            let strength = confidence_from_findings(findings);
            let (severity, confidence) = scorer.score(
                claim.category,
                DiscrepancyKind::GuidanceVerificationNeeded,
                strength,
            );
            out.push(build_discrepancy(
                claim,
                DiscrepancyKind::GuidanceVerificationNeeded,
                severity,
                confidence,
                "Financial guidance on website should match what's disclosed in SEC filings to avoid confusion.",
                "Verification that website guidance matches latest 8-K or 10-Q/10-K guidance disclosure."
                    .to_string(),
                findings.clone(),
                &[
                    "Verify guidance matches what's disclosed in SEC filings.",
                    "Ensure website guidance is synchronized with investor communications.",
                ],
            ));
        }
    }
}

/// Forward-looking statements vs earnings call transcripts
fn check_earnings_alignment(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let findings = &results.earnings_calls;

    let has_transcripts = findings.iter().any(|f| {
        f.key.contains("earnings_transcript") && f.status == FindingStatus::Confirmed
    });
    if !has_transcripts {
        return;
    }

    if contains_any(&claim.claim_text.to_lowercase(), FORWARD_LOOKING_KEYWORDS) {
        let strength = confidence_from_findings(findings);
        let (severity, confidence) = scorer.score(
            claim.category,
            DiscrepancyKind::ForwardLookingEarningsVerificationNeeded,
            strength,
        );
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::ForwardLookingEarningsVerificationNeeded,
            severity,
            confidence,
            "Forward-looking statements on website should align with what was disclosed in earnings call transcripts.",
            "Verification that website forward-looking statement matches guidance provided in earnings call."
                .to_string(),
            findings.clone(),
            &[
                "Review earnings call transcripts to verify forward-looking statement alignment.",
                "Ensure website claims match what executives stated in earnings calls.",
            ],
        ));
    }
}

/// Litigation mentions vs 10-K Item 3 disclosures
fn check_litigation(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let findings = &results.edgar_filings;
    let text = claim.claim_text.to_lowercase();

    if !contains_any(&text, LITIGATION_KEYWORDS) {
        return;
    }

    let has_item_3 = findings
        .iter()
        .any(|f| f.key == "edgar_10k_item_3_legal" && f.status == FindingStatus::Confirmed);

    let strength = confidence_from_findings(findings);
    if has_item_3 {
        let (severity, confidence) = scorer.score(
            claim.category,
            DiscrepancyKind::LitigationDisclosureVerificationNeeded,
            strength,
        );
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::LitigationDisclosureVerificationNeeded,
            severity,
            confidence,
            "Litigation mentioned on website should match disclosures in SEC filings (Item 3 of 10-K).",
            "10-K Item 3 (Legal Proceedings) section confirming or describing the litigation."
                .to_string(),
            findings.clone(),
            &[
                "Verify litigation claim matches 10-K Item 3 disclosure.",
                "Ensure website statements don't contradict SEC filings.",
            ],
        ));
    } else {
        let (severity, confidence) = scorer.score(
            claim.category,
            DiscrepancyKind::LitigationClaimMissingFiling,
            strength,
        );
        out.push(build_discrepancy(
            claim,
            DiscrepancyKind::LitigationClaimMissingFiling,
            severity,
            confidence,
            "Public companies must disclose material litigation in SEC filings. Website mention without filing disclosure may indicate incomplete disclosure.",
            "10-K Item 3 (Legal Proceedings) section or 8-K filing disclosing the litigation."
                .to_string(),
            findings.clone(),
            &[
                "Verify litigation is properly disclosed in SEC filings.",
                "Escalate to legal/compliance if material litigation is missing from filings.",
            ],
        ));
    }
}

/// User and customer counts vs filings and press metrics
fn check_business_metrics(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let mut findings = results.edgar_filings.clone();
    findings.extend(results.press_metrics.iter().cloned());

    let text = claim.claim_text.to_lowercase();
    let metric_keywords = ["user", "customer", "merchant", "account"];

    if !contains_any(&text, &metric_keywords) {
        return;
    }
    if has_confirmed_metric(&findings, &metric_keywords) {
        return;
    }

    let strength = confidence_from_findings(&findings);
    let (severity, confidence) =
        scorer.score(claim.category, DiscrepancyKind::BusinessMetricUnverified, strength);
    out.push(build_discrepancy(
        claim,
        DiscrepancyKind::BusinessMetricUnverified,
        severity,
        confidence,
        "Business metrics should be verifiable through SEC filings, press releases, or audited statements.",
        "SEC filing (10-K/10-Q) or verified press release with user/customer metrics.".to_string(),
        findings,
        &[
            "Request verified user/customer count from finance or product team.",
            "Ensure claim matches what's disclosed in SEC filings or official communications.",
        ],
    ));
}

/// Material events (M&A, executive changes) need an 8-K or press release
fn check_material_events(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let text = claim.claim_text.to_lowercase();
    if !contains_any(&text, MATERIAL_EVENT_KEYWORDS) {
        return;
    }

    // Material events must be filed within 4 business days per SEC rules,
    // so a recent 8-K should exist if the event is real and recent
    let has_recent_8k = results.edgar_filings.iter().any(|f| f.key.contains("edgar_8k"));
    let has_press_release = results.press_releases.iter().any(|f| {
        f.key.contains("press_release") && f.status == FindingStatus::Confirmed
    });

    if has_recent_8k || has_press_release {
        return;
    }

    let mut findings = results.edgar_filings.clone();
    findings.extend(results.press_releases.iter().cloned());

    let strength = confidence_from_findings(&findings);
    let (severity, confidence) =
        scorer.score(claim.category, DiscrepancyKind::MaterialEventMissing8k, strength);
    out.push(build_discrepancy(
        claim,
        DiscrepancyKind::MaterialEventMissing8k,
        severity,
        confidence,
        "Material events (M&A, executive changes, partnerships) typically require 8-K filings within 4 business days per SEC rules.",
        "8-K filing or press release disclosing the material event within required timeframe."
            .to_string(),
        findings,
        &[
            "Verify material event is properly disclosed in 8-K filing or press release.",
            "Check if event occurred recently enough that 8-K should already be filed.",
            "Escalate to legal/compliance if required 8-K filing is missing.",
        ],
    ));
}

/// Material events should also surface in the press release feed
fn check_press_release_coverage(
    claim: &Claim,
    results: &AdapterResults,
    scorer: &SeverityScorer,
    out: &mut Vec<Discrepancy>,
) {
    let findings = &results.press_releases;
    if findings.is_empty() {
        return;
    }

    let has_confirmed_pr = findings.iter().any(|f| {
        f.key.contains("press_release") && f.status == FindingStatus::Confirmed
    });
    if has_confirmed_pr {
        return;
    }

    let strength = confidence_from_findings(findings);
    let (severity, confidence) = scorer.score(
        claim.category,
        DiscrepancyKind::MaterialEventPressReleaseVerificationNeeded,
        strength,
    );
    out.push(build_discrepancy(
        claim,
        DiscrepancyKind::MaterialEventPressReleaseVerificationNeeded,
        severity,
        confidence,
        "Material events typically have corresponding press releases or official announcements.",
        "Press release or official announcement confirming the material event.".to_string(),
        findings.clone(),
        &[
            "Verify material event was announced via press release or official channel.",
            "Ensure website claims are consistent with official communications.",
        ],
    ));
}

/// Claim-set drift since the previous extraction, once per card.
///
/// Not tied to any extracted claim, so it is a card note rather than a
/// discrepancy.
fn check_historical_changes(results: &AdapterResults, scorer: &SeverityScorer) -> Vec<CardNote> {
    let findings = &results.historical_tracking;
    if findings.is_empty() {
        return Vec::new();
    }

    let has_changes = findings.iter().any(|f| {
        f.key.contains("historical_modified_claims") || f.key.contains("historical_removed_claims")
    });
    if !has_changes {
        return Vec::new();
    }

    let strength = confidence_from_findings(findings);
    let (severity, confidence) = scorer.score(
        ClaimCategory::Marketing,
        DiscrepancyKind::HistoricalClaimsChanged,
        strength,
    );

    vec![CardNote {
        kind: DiscrepancyKind::HistoricalClaimsChanged,
        severity,
        confidence,
        summary: format!(
            "Historical tracking detected {} change(s) in claims compared to previous extraction.",
            findings.len()
        ),
        why_it_matters:
            "Claims have changed compared to previous extraction. Verify if changes are intentional and accurate."
                .to_string(),
        expected_evidence: "Review of historical claim changes to ensure accuracy.".to_string(),
        findings: findings.clone(),
        follow_up_actions: owned(&[
            "Review claim changes in historical tracking.",
            "Verify that claim changes are intentional and accurate.",
        ]),
    }]
}
