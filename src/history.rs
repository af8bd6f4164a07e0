//! Historical claim-set tracking.
//!
//! Each analysis run appends the extracted claim set to a per-company
//! JSONL history file. Comparing the two most recent snapshots yields
//! drift indicator findings for the `historical_tracking` bucket, which
//! the engine turns into a card-level note.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::{Citation, Claim, ClaimSet, Finding, FindingStatus, FindingValue};

const ADAPTER_NAME: &str = "historical_tracking";

/// Changes between two claim-set snapshots
#[derive(Debug, Default)]
pub struct ClaimComparison {
    pub new_claims: Vec<Claim>,
    pub removed_claims: Vec<Claim>,
    /// (current, previous) pairs with the same text but changed details
    pub modified_claims: Vec<(Claim, Claim)>,
    pub unchanged: usize,
}

impl ClaimComparison {
    pub fn total_changes(&self) -> usize {
        self.new_claims.len() + self.removed_claims.len() + self.modified_claims.len()
    }
}

/// Compare current claims against a previous snapshot.
///
/// Claims are matched by exact claim text; a matched claim whose
/// category, values, or confidence changed counts as modified.
pub fn compare_claims(current: &ClaimSet, previous: &ClaimSet) -> ClaimComparison {
    let mut comparison = ClaimComparison::default();

    for claim in &current.claims {
        match previous
            .claims
            .iter()
            .find(|p| p.claim_text == claim.claim_text)
        {
            None => comparison.new_claims.push(claim.clone()),
            Some(prev) => {
                let modified = claim.values != prev.values
                    || claim.category != prev.category
                    || claim.confidence != prev.confidence;
                if modified {
                    comparison.modified_claims.push((claim.clone(), prev.clone()));
                } else {
                    comparison.unchanged += 1;
                }
            }
        }
    }

    for prev in &previous.claims {
        if !current.claims.iter().any(|c| c.claim_text == prev.claim_text) {
            comparison.removed_claims.push(prev.clone());
        }
    }

    comparison
}

/// Per-company JSONL history of claim-set snapshots
pub struct HistoryStore {
    dir: PathBuf,
    /// Snapshots consulted when summarizing drift
    depth: usize,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            depth: 5,
        }
    }

    /// Override how many snapshots summarize keeps
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.max(2);
        self
    }

    /// History file for a company, with the name made filesystem-safe
    pub fn company_file(&self, company: &str) -> PathBuf {
        let safe_name: String = company
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
            .collect::<String>()
            .trim()
            .replace(' ', "_");
        self.dir.join(format!("{}_claims.jsonl", safe_name))
    }

    /// Append a claim-set snapshot to the company's history
    pub async fn save(&self, claim_set: &ClaimSet) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create history directory: {}", self.dir.display()))?;

        let path = self.company_file(&claim_set.company);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open history file: {}", path.display()))?;

        let json = serde_json::to_string(claim_set).context("Failed to serialize claim set")?;
        file.write_all(format!("{}\n", json).as_bytes())
            .await
            .context("Failed to write claim set")?;
        file.flush().await.context("Failed to flush history file")?;

        Ok(())
    }

    /// Most recent snapshots, newest first.
    ///
    /// Malformed lines are skipped; history is advisory data, not a
    /// system of record.
    pub async fn load(&self, company: &str, limit: usize) -> Result<Vec<ClaimSet>> {
        let path = self.company_file(company);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;

        let mut sets: Vec<ClaimSet> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| match serde_json::from_str::<ClaimSet>(l) {
                Ok(set) => Some(set),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping malformed history line");
                    None
                }
            })
            .collect();

        sets.sort_by(|a, b| b.extracted_at.cmp(&a.extracted_at));
        sets.truncate(limit);
        Ok(sets)
    }

    /// Drift findings for the `historical_tracking` bucket.
    ///
    /// With fewer than two snapshots there is nothing to compare and a
    /// single not_found indicator is returned.
    pub async fn summarize(&self, company: &str) -> Result<Vec<Finding>> {
        let history = self.load(company, self.depth).await?;
        let history_url = self.company_file(company).display().to_string();

        let citation = |query: String| Citation {
            source: "Historical Claim Tracking".to_string(),
            url: history_url.clone(),
            query,
            accessed_at: Utc::now(),
            note: None,
        };

        if history.len() < 2 {
            return Ok(vec![Finding::new(
                ADAPTER_NAME,
                "historical_claims_insufficient",
                FindingValue::text("insufficient"),
                FindingStatus::NotFound,
            )
            .with_snippet(format!(
                "Insufficient historical data for {} (need at least 2 claim sets).",
                company
            ))
            .with_citation(citation(format!("company:{}", company)))]);
        }

        let current = &history[0];
        let previous = &history[1];
        let comparison = compare_claims(current, previous);
        let previous_date = previous.extracted_at.date_naive();

        let mut findings = Vec::new();

        for (key, count, label) in [
            ("historical_new_claims", comparison.new_claims.len(), "new"),
            (
                "historical_removed_claims",
                comparison.removed_claims.len(),
                "removed",
            ),
            (
                "historical_modified_claims",
                comparison.modified_claims.len(),
                "modified",
            ),
        ] {
            if count == 0 {
                continue;
            }
            findings.push(
                Finding::new(
                    ADAPTER_NAME,
                    key,
                    FindingValue::text(count.to_string()),
                    FindingStatus::Confirmed,
                )
                .with_snippet(format!(
                    "Found {} {} claim(s) compared to previous extraction ({}).",
                    count, label, previous_date
                ))
                .with_citation(citation(format!("company:{}, comparison:{}_claims", company, label))),
            );
        }

        let total = comparison.total_changes();
        findings.push(
            Finding::new(
                ADAPTER_NAME,
                "historical_claims_status",
                FindingValue::text(if total > 0 { "has_history" } else { "no_changes" }),
                FindingStatus::Confirmed,
            )
            .with_snippet(format!(
                "Historical tracking: {} total change(s) detected across {} claim set(s).",
                total,
                history.len()
            ))
            .with_citation(citation(format!("company:{}", company))),
        );

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClaimCategory;
    use tempfile::TempDir;

    fn claim_set(company: &str, claims: Vec<Claim>) -> ClaimSet {
        ClaimSet::new("https://example.com", company, claims)
    }

    #[test]
    fn test_company_file_sanitizes_name() {
        let store = HistoryStore::new("/tmp/history");
        let path = store.company_file("Acme Payments, Inc.");
        assert_eq!(
            path,
            PathBuf::from("/tmp/history/Acme_Payments_Inc_claims.jsonl")
        );
    }

    #[test]
    fn test_compare_detects_added_removed_modified() {
        let previous = claim_set(
            "Acme",
            vec![
                Claim::new("p1", ClaimCategory::Marketing, "Over 5M customers")
                    .with_values(vec!["5M".to_string()]),
                Claim::new("p2", ClaimCategory::Security, "SOC 2 certified"),
            ],
        );
        let current = claim_set(
            "Acme",
            vec![
                Claim::new("c1", ClaimCategory::Marketing, "Over 5M customers")
                    .with_values(vec!["6M".to_string()]),
                Claim::new("c2", ClaimCategory::Licensing, "Licensed in 30 states"),
            ],
        );

        let comparison = compare_claims(&current, &previous);
        assert_eq!(comparison.new_claims.len(), 1);
        assert_eq!(comparison.new_claims[0].claim_text, "Licensed in 30 states");
        assert_eq!(comparison.removed_claims.len(), 1);
        assert_eq!(comparison.removed_claims[0].claim_text, "SOC 2 certified");
        assert_eq!(comparison.modified_claims.len(), 1);
        assert_eq!(comparison.total_changes(), 3);
    }

    #[tokio::test]
    async fn test_insufficient_history_yields_not_found() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path());

        store
            .save(&claim_set("Acme", vec![Claim::new("c1", ClaimCategory::Marketing, "x")]))
            .await
            .unwrap();

        let findings = store.summarize("Acme").await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].key, "historical_claims_insufficient");
        assert_eq!(findings[0].status, FindingStatus::NotFound);
    }

    #[tokio::test]
    async fn test_summarize_emits_change_indicators() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path());

        let mut old = claim_set(
            "Acme",
            vec![Claim::new("p1", ClaimCategory::Security, "SOC 2 certified")],
        );
        old.extracted_at = Utc::now() - chrono::Duration::days(7);
        store.save(&old).await.unwrap();

        store
            .save(&claim_set(
                "Acme",
                vec![Claim::new("c1", ClaimCategory::Marketing, "Over 5M customers")],
            ))
            .await
            .unwrap();

        let findings = store.summarize("Acme").await.unwrap();
        let keys: Vec<&str> = findings.iter().map(|f| f.key.as_str()).collect();
        assert!(keys.contains(&"historical_new_claims"));
        assert!(keys.contains(&"historical_removed_claims"));
        assert!(keys.contains(&"historical_claims_status"));
    }
}
