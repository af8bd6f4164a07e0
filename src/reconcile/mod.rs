//! Claim reconciliation.
//!
//! This module contains:
//! - engine: category rules mapping claims + findings to discrepancies
//! - merge: fingerprint-based merging of duplicate metric discrepancies
//!
//! The engine is pure computation: no I/O, no shared mutable state. It is
//! called once per analysis run, after all adapter fetches have completed.

pub mod engine;
pub mod merge;

pub use engine::reconcile;
pub use merge::{fingerprint_findings, merge_or_push};
