//! NMLS Consumer Access adapter.
//!
//! Returns the state roster for money transmitter licenses. Production
//! use needs NMLS search with consent and TOS compliance; until then this
//! returns representative sample data so the pipeline can be exercised
//! end to end.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Citation, Finding, FindingStatus, FindingValue};

use super::Adapter;

pub struct NmlsAdapter;

impl NmlsAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NmlsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for NmlsAdapter {
    fn name(&self) -> &str {
        "nmls"
    }

    async fn check(&self, company: &str, _ticker: Option<&str>) -> Result<Vec<Finding>> {
        let states = [
            "CA", "NY", "TX", "WA", "IL", "FL", "MA", "CO", "VA", "PA", "OH", "NJ", "GA", "AZ",
        ];

        Ok(vec![Finding::new(
            self.name(),
            "us_mtl_states",
            FindingValue::States(states.iter().map(|s| s.to_string()).collect()),
            FindingStatus::Confirmed,
        )
        .with_citation(Citation {
            source: "NMLS Consumer Access (sample)".to_string(),
            url: "https://nmlsconsumeraccess.org/".to_string(),
            query: format!("company:{}", company),
            accessed_at: Utc::now(),
            note: Some("sample roster".to_string()),
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roster_is_typed_states() {
        let adapter = NmlsAdapter::new();
        let findings = adapter.check("Acme Payments", None).await.unwrap();

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.adapter, "nmls");
        assert_eq!(finding.key, "us_mtl_states");
        assert_eq!(finding.value.as_states().unwrap().len(), 14);
        assert_eq!(finding.citations[0].query, "company:Acme Payments");
    }
}
