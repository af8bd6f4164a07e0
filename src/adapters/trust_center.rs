//! Trust center adapter.
//!
//! Checks a company's security posture signals, currently the RFC 9116
//! `/.well-known/security.txt` document. A missing security.txt does not
//! disprove a certification claim on its own; it feeds the evidence
//! strength for the security rules.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Citation, Finding, FindingStatus, FindingValue};

use super::Adapter;

pub struct TrustCenterAdapter {
    /// Base URL of the company website (scheme + host)
    base_url: String,
    client: reqwest::Client,
}

impl TrustCenterAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn security_txt_url(&self) -> String {
        format!(
            "{}/.well-known/security.txt",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Fetch security.txt; present means a 200 with a Contact: field
    async fn check_security_txt(&self) -> Result<(bool, String)> {
        let url = self.security_txt_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch security.txt")?;

        if !response.status().is_success() {
            return Ok((false, url));
        }

        let body = response
            .text()
            .await
            .context("Failed to read security.txt body")?;
        Ok((body.contains("Contact:"), url))
    }
}

#[async_trait]
impl Adapter for TrustCenterAdapter {
    fn name(&self) -> &str {
        "trust_center"
    }

    async fn check(&self, _company: &str, _ticker: Option<&str>) -> Result<Vec<Finding>> {
        let (present, url) = self.check_security_txt().await?;

        let status = if present {
            FindingStatus::Confirmed
        } else {
            FindingStatus::NotFound
        };

        Ok(vec![Finding::new(
            self.name(),
            "security_txt",
            FindingValue::text(present.to_string()),
            status,
        )
        .with_citation(Citation {
            source: "security.txt".to_string(),
            url,
            query: String::new(),
            accessed_at: Utc::now(),
            note: None,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_txt_url() {
        let adapter = TrustCenterAdapter::new("https://example.com/");
        assert_eq!(
            adapter.security_txt_url(),
            "https://example.com/.well-known/security.txt"
        );
    }
}
