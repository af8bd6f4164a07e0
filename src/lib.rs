//! claimlens - Company claim verification engine
//!
//! Reconciles marketing and compliance claims extracted from a company
//! website against findings from independent verification sources, and
//! scores the gaps into a reviewable truth card.
//!
//! # Architecture
//!
//! The engine is a pure function over two inputs:
//! - A claim set: categorized claims extracted from one page
//! - Adapter results: findings from verification sources, one bucket
//!   per adapter
//!
//! Reconciliation rules fire per claim category, each producing at most
//! a few discrepancies. A severity scorer turns evidence strength into a
//! (severity, confidence) pair, optionally shifted by adjustments learned
//! from analyst feedback.
//!
//! # Modules
//!
//! - `domain`: Claims, findings, discrepancies, and the truth card
//! - `reconcile`: The rule engine and discrepancy merging
//! - `scoring`: Evidence aggregation, the severity rubric, adjustments
//! - `adapters`: Verification source integrations
//! - `feedback`: Analyst feedback log and adjustment derivation
//! - `history`: Claim snapshots and cross-run drift detection
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Reconcile claims against pre-collected findings
//! claimlens reconcile --claims claims.json --findings findings.json
//!
//! # Log analyst feedback and refresh scoring adjustments
//! claimlens feedback log --card-url https://example.com --company Acme \
//!     --kind marketing_metric_unverified --action dismiss
//! claimlens feedback sync
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod feedback;
pub mod history;
pub mod reconcile;
pub mod scoring;

// Re-export main types at crate root for convenience
pub use domain::{
    AdapterResults, Claim, ClaimCategory, ClaimSet, Discrepancy, DiscrepancyKind, Finding,
    FindingStatus, FindingValue, Severity, TruthCard, Verdict,
};
pub use reconcile::reconcile;
pub use scoring::{AdjustmentTable, SeverityScorer};
