//! Extracted claim types.
//!
//! A claim is a single normalized assertion pulled from a company's public
//! website by the extraction layer. Claims are immutable once extracted;
//! the reconciliation engine only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an extracted claim.
///
/// The category decides which reconciliation rules run for the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    Licensing,
    Regulatory,
    PartnerBank,
    Security,
    Compliance,
    Marketing,
    FinancialPerformance,
    MarketPosition,
    BusinessMetrics,
    ForwardLooking,
    Governance,
    Litigation,
    IntellectualProperty,
    MaterialEvents,
}

/// Jurisdiction a claim applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "CA")]
    Ca,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "OTHER")]
    Other,
}

/// Reference to the source document a claim was extracted from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub url: String,
    pub accessed_at: DateTime<Utc>,
}

/// A single extracted claim.
///
/// Produced once per (url, extraction run) by the LLM-backed extractor.
/// The caller deduplicates by (category, normalized claim_text, normalized
/// claim_kind) before reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier within the claim set
    pub id: String,

    /// Claim category (selects reconciliation rules)
    pub category: ClaimCategory,

    /// Verbatim claim text
    pub claim_text: String,

    /// Entity the claim is about, if not the company itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Jurisdiction the claim applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<Jurisdiction>,

    /// Finer-grained kind within the category (e.g. "customer_count")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_kind: Option<String>,

    /// Raw value tokens mentioned by the claim (e.g. ["30", "$1.2B"])
    #[serde(default)]
    pub values: Vec<String>,

    /// Date the claim is effective as of, if stated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,

    /// Surrounding page context captured by the extractor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_context: Option<String>,

    /// Extractor confidence in [0, 1]
    #[serde(default = "default_claim_confidence")]
    pub confidence: f64,

    /// Source references from the extraction run
    #[serde(default)]
    pub citations: Vec<SourceRef>,
}

fn default_claim_confidence() -> f64 {
    0.6
}

impl Claim {
    /// Create a minimal claim (tests and synthetic inputs)
    pub fn new(id: impl Into<String>, category: ClaimCategory, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            claim_text: text.into(),
            entity: None,
            jurisdiction: None,
            claim_kind: None,
            values: Vec::new(),
            effective_date: None,
            page_context: None,
            confidence: default_claim_confidence(),
            citations: Vec::new(),
        }
    }

    /// Set the value tokens
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    /// Set the claim kind
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.claim_kind = Some(kind.into());
        self
    }

    /// Lowercase haystack of claim_kind + claim_text, used by keyword rules
    pub fn kind_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(kind) = &self.claim_kind {
            parts.push(kind);
        }
        parts.push(&self.claim_text);
        parts.join(" ").to_lowercase()
    }
}

/// All claims extracted from one page in one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Page the claims were extracted from
    pub url: String,

    /// Company the page belongs to
    pub company: String,

    /// When the extraction ran
    pub extracted_at: DateTime<Utc>,

    /// The extracted claims
    pub claims: Vec<Claim>,
}

impl ClaimSet {
    pub fn new(url: impl Into<String>, company: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            url: url.into(),
            company: company.into(),
            extracted_at: Utc::now(),
            claims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ClaimCategory::PartnerBank).unwrap();
        assert_eq!(json, "\"partner_bank\"");

        let parsed: ClaimCategory = serde_json::from_str("\"financial_performance\"").unwrap();
        assert_eq!(parsed, ClaimCategory::FinancialPerformance);
    }

    #[test]
    fn test_claim_defaults_on_deserialize() {
        let json = r#"{"id":"c1","category":"security","claim_text":"SOC 2 Type II"}"#;
        let claim: Claim = serde_json::from_str(json).unwrap();

        assert_eq!(claim.confidence, 0.6);
        assert!(claim.values.is_empty());
        assert!(claim.claim_kind.is_none());
    }

    #[test]
    fn test_kind_text_combines_kind_and_text() {
        let claim = Claim::new("c1", ClaimCategory::Marketing, "Over 5M Users")
            .with_kind("customer_count");
        assert_eq!(claim.kind_text(), "customer_count over 5m users");
    }
}
