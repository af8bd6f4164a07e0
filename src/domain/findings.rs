//! Evidence findings returned by verification adapters.
//!
//! A finding is one normalized observation from an external source (NMLS,
//! EDGAR, a trust center, news search, ...). Adapters tag every finding
//! with their own name and an observation timestamp; the reconciliation
//! engine treats findings as read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verification status of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    /// The source confirms the checked fact
    Confirmed,
    /// The source was checked and the fact was absent
    NotFound,
    /// The source contradicts or partially contradicts the fact
    Inconsistent,
    /// The source could not be evaluated
    Unknown,
}

/// Provenance attached to a finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Source name (e.g. "NMLS Consumer Access")
    pub source: String,
    /// URL that was consulted
    pub url: String,
    /// Query used against the source
    pub query: String,
    /// When the source was accessed
    pub accessed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Typed payload of a finding.
///
/// Adapters produce structured values where the data has structure (state
/// rosters come back as a list of codes, not a stringified literal). Plain
/// observations stay textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FindingValue {
    /// A list of state codes (licensing rosters)
    States(Vec<String>),
    /// Free-form text, possibly numeric
    Text(String),
}

impl FindingValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// State codes, if this value carries a roster
    pub fn as_states(&self) -> Option<&[String]> {
        match self {
            Self::States(states) => Some(states),
            Self::Text(_) => None,
        }
    }

    /// Numeric interpretation of a textual value, if it parses
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::States(_) => None,
        }
    }

    /// Canonical string form, used for fingerprints and summaries
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::States(states) => states.join(","),
        }
    }
}

/// One normalized observation from a verification source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Stable key within the adapter (e.g. "us_mtl_states")
    pub key: String,

    /// Observed value
    pub value: FindingValue,

    /// Verification status
    pub status: FindingStatus,

    /// Name of the adapter that produced this finding
    pub adapter: String,

    /// When the observation was made
    pub observed_at: DateTime<Utc>,

    /// Short excerpt from the source, if available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Provenance for the observation
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl Finding {
    pub fn new(
        adapter: impl Into<String>,
        key: impl Into<String>,
        value: FindingValue,
        status: FindingStatus,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            status,
            adapter: adapter.into(),
            observed_at: Utc::now(),
            snippet: None,
            citations: Vec::new(),
        }
    }

    /// Attach a source snippet
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Attach a citation
    pub fn with_citation(mut self, citation: Citation) -> Self {
        self.citations.push(citation);
        self
    }

    /// Lowercase haystack of key + value + snippet, used by keyword matches
    pub fn haystack(&self) -> String {
        let mut parts = vec![self.key.clone(), self.value.render()];
        if let Some(snippet) = &self.snippet {
            parts.push(snippet.clone());
        }
        parts.join(" ").to_lowercase()
    }
}

/// Findings grouped by the adapter that produced them.
///
/// One field per known adapter; an adapter that did not run (or returned
/// nothing) is an empty list, which the engine treats as weakest evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterResults {
    #[serde(default)]
    pub nmls: Vec<Finding>,
    #[serde(default)]
    pub bank_partners: Vec<Finding>,
    #[serde(default)]
    pub news: Vec<Finding>,
    #[serde(default)]
    pub trust_center: Vec<Finding>,
    #[serde(default)]
    pub edgar: Vec<Finding>,
    #[serde(default)]
    pub cfpb: Vec<Finding>,
    #[serde(default)]
    pub edgar_filings: Vec<Finding>,
    #[serde(default)]
    pub press_metrics: Vec<Finding>,
    #[serde(default)]
    pub press_releases: Vec<Finding>,
    #[serde(default)]
    pub earnings_calls: Vec<Finding>,
    #[serde(default)]
    pub historical_tracking: Vec<Finding>,
}

impl AdapterResults {
    /// Route a batch of findings into the bucket matching the adapter name.
    ///
    /// Findings from an unrecognized adapter are dropped with a warning;
    /// the engine only consults known buckets.
    pub fn insert(&mut self, adapter_name: &str, findings: Vec<Finding>) {
        let bucket = match adapter_name {
            "nmls" => &mut self.nmls,
            "bank_partners" => &mut self.bank_partners,
            "news" => &mut self.news,
            "trust_center" => &mut self.trust_center,
            "edgar" => &mut self.edgar,
            "cfpb" => &mut self.cfpb,
            "edgar_filings" => &mut self.edgar_filings,
            "press_metrics" => &mut self.press_metrics,
            "press_releases" => &mut self.press_releases,
            "earnings_calls" => &mut self.earnings_calls,
            "historical_tracking" => &mut self.historical_tracking,
            other => {
                tracing::warn!(adapter = other, "Dropping findings from unknown adapter");
                return;
            }
        };
        bucket.extend(findings);
    }

    /// Fold another result set into this one, bucket by bucket.
    pub fn merge(&mut self, other: AdapterResults) {
        self.nmls.extend(other.nmls);
        self.bank_partners.extend(other.bank_partners);
        self.news.extend(other.news);
        self.trust_center.extend(other.trust_center);
        self.edgar.extend(other.edgar);
        self.cfpb.extend(other.cfpb);
        self.edgar_filings.extend(other.edgar_filings);
        self.press_metrics.extend(other.press_metrics);
        self.press_releases.extend(other.press_releases);
        self.earnings_calls.extend(other.earnings_calls);
        self.historical_tracking.extend(other.historical_tracking);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_value() {
        let value = FindingValue::States(vec!["CA".to_string(), "NY".to_string()]);
        assert_eq!(value.as_states().unwrap().len(), 2);
        assert!(value.as_number().is_none());
        assert_eq!(value.render(), "CA,NY");
    }

    #[test]
    fn test_text_value_parses_numbers() {
        assert_eq!(FindingValue::text("-1000000").as_number(), Some(-1_000_000.0));
        assert!(FindingValue::text("n/a").as_number().is_none());
        assert!(FindingValue::text("n/a").as_states().is_none());
    }

    #[test]
    fn test_untagged_value_deserialization() {
        let states: FindingValue = serde_json::from_str(r#"["CA","NY"]"#).unwrap();
        assert!(states.as_states().is_some());

        let text: FindingValue = serde_json::from_str(r#""true""#).unwrap();
        assert_eq!(text.render(), "true");
    }

    #[test]
    fn test_insert_routes_by_adapter_name() {
        let mut results = AdapterResults::default();
        let finding = Finding::new(
            "nmls",
            "us_mtl_states",
            FindingValue::States(vec!["CA".to_string()]),
            FindingStatus::Confirmed,
        );
        results.insert("nmls", vec![finding]);
        results.insert("bogus_adapter", vec![]);

        assert_eq!(results.nmls.len(), 1);
        assert!(results.bank_partners.is_empty());
    }

    #[test]
    fn test_haystack_includes_key_value_snippet() {
        let finding = Finding::new(
            "press_metrics",
            "customer_count",
            FindingValue::text("5M"),
            FindingStatus::Confirmed,
        )
        .with_snippet("5 million Customers served");

        let haystack = finding.haystack();
        assert!(haystack.contains("customer_count"));
        assert!(haystack.contains("5 million customers"));
    }
}
