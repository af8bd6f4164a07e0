//! Verification source adapters.
//!
//! Adapters provide a unified interface over external evidence sources
//! (registries, trust centers, filings). Every adapter tags its findings
//! with its own name and an observation timestamp, and converts internal
//! errors into a single error-status finding so reconciliation never sees
//! an adapter exception.

pub mod nmls;
pub mod trust_center;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::warn;

use crate::domain::{AdapterResults, Finding, FindingStatus, FindingValue};

// Re-export the concrete adapters
pub use nmls::NmlsAdapter;
pub use trust_center::TrustCenterAdapter;

/// Trait for verification source adapters
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Bucket name this adapter's findings are routed to
    fn name(&self) -> &str;

    /// Check a company against the source
    async fn check(&self, company: &str, ticker: Option<&str>) -> Result<Vec<Finding>>;
}

/// A finding describing an adapter failure, in place of an error
pub fn error_finding(adapter: &str, error: &anyhow::Error) -> Finding {
    Finding::new(
        adapter,
        "adapter_error",
        FindingValue::text(error.to_string()),
        FindingStatus::Unknown,
    )
}

/// Run all adapter checks concurrently and collect their findings.
///
/// One wall-clock timeout covers the whole fetch; an adapter that fails
/// or times out contributes an empty bucket. Reconciliation treats empty
/// buckets as weakest evidence, so partial fetches still produce a card.
pub async fn collect_findings(
    adapters: Vec<Box<dyn Adapter>>,
    company: &str,
    ticker: Option<&str>,
    timeout: Duration,
) -> AdapterResults {
    let mut set: JoinSet<(String, Result<Vec<Finding>>)> = JoinSet::new();

    for adapter in adapters {
        let company = company.to_string();
        let ticker = ticker.map(|t| t.to_string());
        set.spawn(async move {
            let name = adapter.name().to_string();
            let result = adapter.check(&company, ticker.as_deref()).await;
            (name, result)
        });
    }

    let mut results = AdapterResults::default();

    let gather = async {
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(findings))) => results.insert(&name, findings),
                Ok((name, Err(e))) => {
                    warn!(adapter = %name, error = %e, "Adapter check failed");
                    results.insert(&name, vec![error_finding(&name, &e)]);
                }
                Err(e) => warn!(error = %e, "Adapter task panicked"),
            }
        }
    };

    if tokio::time::timeout(timeout, gather).await.is_err() {
        warn!(timeout_secs = timeout.as_secs(), "Adapter collection timed out");
    }

    results
}
