//! Feedback-derived scoring adjustments.
//!
//! Analyst feedback on past truth cards is aggregated offline into a small
//! JSON store of per-kind shifts (see the `feedback` module). The scorer
//! loads this table once at startup and treats it as read-only for its
//! lifetime; new adjustments are picked up on the next process start.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::DiscrepancyKind;

/// Shifts applied to the rubric for one discrepancy kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Adjustment {
    /// Added to the rubric's evidence threshold, result clamped to [0, 1]
    #[serde(default)]
    pub threshold_shift: f64,

    /// Added to the rubric's base confidence, result clamped to [0, 1]
    #[serde(default)]
    pub confidence_shift: f64,

    /// Number of feedback events behind this adjustment
    #[serde(default)]
    pub sample_size: u64,
}

/// On-disk shape of the adjustment store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjustmentStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub adjustments: HashMap<String, Adjustment>,
}

/// Read-only adjustment table held by the severity scorer
#[derive(Debug, Clone, Default)]
pub struct AdjustmentTable {
    adjustments: HashMap<String, Adjustment>,
}

impl AdjustmentTable {
    /// A table that applies no adjustments
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the store from disk.
    ///
    /// A missing file or malformed JSON degrades to an empty table; the
    /// scorer must never fail because feedback data is bad.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No adjustment store; using defaults");
                return Self::empty();
            }
        };

        match serde_json::from_str::<AdjustmentStore>(&content) {
            Ok(store) => {
                debug!(
                    path = %path.display(),
                    kinds = store.adjustments.len(),
                    "Loaded scoring adjustments"
                );
                Self {
                    adjustments: store.adjustments,
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed adjustment store; ignoring");
                Self::empty()
            }
        }
    }

    pub fn from_store(store: AdjustmentStore) -> Self {
        Self {
            adjustments: store.adjustments,
        }
    }

    /// Adjustment for a kind; zero shifts when no feedback exists
    pub fn get(&self, kind: DiscrepancyKind) -> Adjustment {
        self.adjustments
            .get(kind.as_str())
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.adjustments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_table() {
        let table = AdjustmentTable::load(Path::new("/nonexistent/adjustments.json"));
        assert!(table.is_empty());
        assert_eq!(table.get(DiscrepancyKind::PartnerUnverified).threshold_shift, 0.0);
    }

    #[test]
    fn test_malformed_json_is_empty_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adjustments.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{{ not json").unwrap();

        let table = AdjustmentTable::load(&path);
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_and_lookup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("adjustments.json");
        std::fs::write(
            &path,
            r#"{
                "updated_at": "2026-08-01T00:00:00Z",
                "adjustments": {
                    "partner_unverified": {
                        "threshold_shift": 0.05,
                        "confidence_shift": -0.025,
                        "sample_size": 12
                    }
                }
            }"#,
        )
        .unwrap();

        let table = AdjustmentTable::load(&path);
        let adj = table.get(DiscrepancyKind::PartnerUnverified);
        assert_eq!(adj.threshold_shift, 0.05);
        assert_eq!(adj.confidence_shift, -0.025);
        assert_eq!(adj.sample_size, 12);

        // Kinds without feedback fall back to zero shifts
        let none = table.get(DiscrepancyKind::IsoUnverified);
        assert_eq!(none.threshold_shift, 0.0);
    }
}
