//! Analyst feedback on truth cards.
//!
//! Analysts confirm, dismiss, override, or escalate discrepancies from
//! past cards. Feedback is appended to a JSONL event log; an offline sync
//! aggregates the log into per-kind scoring adjustments that the severity
//! scorer loads at the next process start.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::DiscrepancyKind;
use crate::scoring::adjustments::{Adjustment, AdjustmentStore};

/// What the analyst did with a discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalystAction {
    /// The discrepancy was a real problem
    Confirm,
    /// False positive
    Dismiss,
    /// The verdict was changed by hand
    Override,
    /// Forwarded to legal/compliance
    Escalate,
}

/// One feedback event in the JSONL log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Unique event id
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// URL of the card the discrepancy came from
    pub card_url: String,
    pub company: String,
    pub discrepancy_kind: DiscrepancyKind,
    pub analyst_action: AnalystAction,
    #[serde(default = "default_actor")]
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_verdict: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_verdict: Option<String>,
    pub timestamp: DateTime<Utc>,
}

fn default_actor() -> String {
    "analyst".to_string()
}

impl FeedbackEntry {
    pub fn new(
        card_url: impl Into<String>,
        company: impl Into<String>,
        kind: DiscrepancyKind,
        action: AnalystAction,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_url: card_url.into(),
            company: company.into(),
            discrepancy_kind: kind,
            analyst_action: action,
            actor: default_actor(),
            notes: None,
            previous_verdict: None,
            updated_verdict: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("malformed feedback line {line}: {source}")]
    MalformedLine {
        line: usize,
        source: serde_json::Error,
    },
}

/// Append-only JSONL feedback log
pub struct FeedbackLog {
    events_path: PathBuf,
}

impl FeedbackLog {
    pub fn new(events_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
        }
    }

    pub fn events_path(&self) -> &Path {
        &self.events_path
    }

    /// Append one feedback entry
    pub async fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create feedback directory: {}", parent.display())
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open feedback log: {}",
                    self.events_path.display()
                )
            })?;

        let json = serde_json::to_string(entry).context("Failed to serialize feedback entry")?;
        file.write_all(format!("{}\n", json).as_bytes())
            .await
            .context("Failed to write feedback entry")?;
        file.flush().await.context("Failed to flush feedback log")?;

        Ok(())
    }

    /// Load all feedback entries in order.
    ///
    /// A malformed line fails the load; the log is append-only and a bad
    /// line means something else wrote to it.
    pub async fn load(&self) -> Result<Vec<FeedbackEntry>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.events_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to read feedback log: {}",
                    self.events_path.display()
                )
            })?;

        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|source| {
                FeedbackError::MalformedLine {
                    line: idx + 1,
                    source,
                }
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

/// Aggregate feedback entries into per-kind scoring adjustments.
///
/// Kinds analysts keep confirming get a positive threshold shift (rules
/// fire hotter); frequent overrides pull confidence down slightly.
pub fn compute_rule_adjustments(entries: &[FeedbackEntry]) -> AdjustmentStore {
    let mut tally: HashMap<DiscrepancyKind, HashMap<AnalystAction, u64>> = HashMap::new();
    for entry in entries {
        *tally
            .entry(entry.discrepancy_kind)
            .or_default()
            .entry(entry.analyst_action)
            .or_default() += 1;
    }

    let mut adjustments = HashMap::new();
    for (kind, counts) in tally {
        let total: u64 = counts.values().sum();
        if total == 0 {
            continue;
        }

        let count = |action: AnalystAction| *counts.get(&action).unwrap_or(&0) as f64;
        let confirm_bias = (count(AnalystAction::Confirm) - count(AnalystAction::Dismiss))
            / total as f64;
        let override_share = count(AnalystAction::Override) / total as f64;

        adjustments.insert(
            kind.as_str().to_string(),
            Adjustment {
                threshold_shift: confirm_bias * 0.1,
                confidence_shift: override_share * -0.05,
                sample_size: total,
            },
        );
    }

    AdjustmentStore {
        updated_at: Some(Utc::now()),
        adjustments,
    }
}

/// Write the adjustment store where the severity scorer reads it
pub async fn write_rule_adjustments(store: &AdjustmentStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json =
        serde_json::to_string_pretty(store).context("Failed to serialize adjustment store")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write adjustment store: {}", path.display()))?;

    Ok(())
}

/// Load the log, aggregate it, and persist the adjustment store
pub async fn sync_feedback(log: &FeedbackLog, adjustments_path: &Path) -> Result<AdjustmentStore> {
    let entries = log.load().await?;
    let store = compute_rule_adjustments(&entries);
    write_rule_adjustments(&store, adjustments_path).await?;
    Ok(store)
}
