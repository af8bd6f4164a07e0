//! Domain types for claim verification.
//!
//! This module contains the core data structures:
//! - Claims: Normalized assertions extracted from a source page
//! - Findings: Evidence returned by verification adapters
//! - Card: Discrepancies and the final truth card

pub mod card;
pub mod claims;
pub mod findings;

// Re-export commonly used types
pub use card::{
    CardNote, Discrepancy, DiscrepancyKind, EvidencePointer, ExplanationBundle,
    FindingProvenance, Severity, TruthCard, Verdict,
};
pub use claims::{Claim, ClaimCategory, ClaimSet, Jurisdiction, SourceRef};
pub use findings::{AdapterResults, Citation, Finding, FindingStatus, FindingValue};
