//! Evidence and severity scoring.
//!
//! This module contains:
//! - evidence: aggregate evidence strength from a set of findings
//! - adjustments: feedback-derived per-kind threshold/confidence shifts
//! - severity: the category rubric and forced-severity policy

pub mod adjustments;
pub mod evidence;
pub mod severity;

// Re-export commonly used types
pub use adjustments::{Adjustment, AdjustmentTable};
pub use evidence::confidence_from_findings;
pub use severity::SeverityScorer;
