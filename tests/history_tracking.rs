//! Historical Tracking Integration Tests
//!
//! Claim snapshots on disk, cross-run comparison, and the resulting
//! card note on the truth card.

use claimlens::domain::{
    AdapterResults, Claim, ClaimCategory, ClaimSet, DiscrepancyKind, FindingStatus,
};
use claimlens::history::HistoryStore;
use claimlens::reconcile::reconcile;
use claimlens::scoring::SeverityScorer;
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn snapshot(claims: Vec<Claim>) -> ClaimSet {
    ClaimSet::new("https://acme.example.com", "Acme Payments", claims)
}

/// Snapshot with an explicit age, so ordering never depends on how fast
/// two saves happen
fn snapshot_aged(claims: Vec<Claim>, minutes_ago: i64) -> ClaimSet {
    let mut set = snapshot(claims);
    set.extracted_at = Utc::now() - Duration::minutes(minutes_ago);
    set
}

#[tokio::test]
async fn test_single_snapshot_is_insufficient() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());

    store
        .save(&snapshot(vec![Claim::new(
            "c1",
            ClaimCategory::Marketing,
            "Over 1 million users",
        )]))
        .await
        .unwrap();

    let findings = store.summarize("Acme Payments").await.unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].key, "historical_claims_insufficient");
    assert_eq!(findings[0].status, FindingStatus::NotFound);

    // An insufficient-data indicator never produces a card note
    let mut results = AdapterResults::default();
    results.insert("historical_tracking", findings);
    let card = reconcile(&snapshot(vec![]), &results, &SeverityScorer::unadjusted());
    assert!(card.card_notes.is_empty());
}

#[tokio::test]
async fn test_modified_claim_surfaces_as_card_note() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());

    store
        .save(&snapshot_aged(
            vec![
                Claim::new("c1", ClaimCategory::Marketing, "Over 1 million users"),
                Claim::new("c2", ClaimCategory::Security, "SOC 2 Type II certified"),
            ],
            60,
        ))
        .await
        .unwrap();

    // Same texts, but the marketing claim's value tokens changed
    store
        .save(&snapshot_aged(
            vec![
                Claim::new("c1", ClaimCategory::Marketing, "Over 1 million users")
                    .with_values(vec!["2000000".to_string()]),
                Claim::new("c2", ClaimCategory::Security, "SOC 2 Type II certified"),
            ],
            0,
        ))
        .await
        .unwrap();

    let findings = store.summarize("Acme Payments").await.unwrap();
    assert!(findings
        .iter()
        .any(|f| f.key == "historical_modified_claims"));

    let mut results = AdapterResults::default();
    results.insert("historical_tracking", findings);
    let card = reconcile(&snapshot(vec![]), &results, &SeverityScorer::unadjusted());

    assert_eq!(card.card_notes.len(), 1);
    assert_eq!(
        card.card_notes[0].kind,
        DiscrepancyKind::HistoricalClaimsChanged
    );
}

#[tokio::test]
async fn test_removed_claim_is_detected() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());

    store
        .save(&snapshot_aged(
            vec![
                Claim::new("c1", ClaimCategory::Marketing, "Over 1 million users"),
                Claim::new("c2", ClaimCategory::Licensing, "Licensed in 40 states"),
            ],
            60,
        ))
        .await
        .unwrap();

    store
        .save(&snapshot_aged(
            vec![Claim::new(
                "c1",
                ClaimCategory::Marketing,
                "Over 1 million users",
            )],
            0,
        ))
        .await
        .unwrap();

    let findings = store.summarize("Acme Payments").await.unwrap();
    let removed = findings
        .iter()
        .find(|f| f.key == "historical_removed_claims")
        .expect("removed-claims finding");
    assert_eq!(removed.status, FindingStatus::Confirmed);
    assert!(removed
        .snippet
        .as_deref()
        .unwrap_or("")
        .contains("1 removed claim(s)"));
}

#[tokio::test]
async fn test_unchanged_snapshots_report_no_changes() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());

    let set = snapshot(vec![Claim::new(
        "c1",
        ClaimCategory::Marketing,
        "Over 1 million users",
    )]);
    store.save(&set).await.unwrap();
    store.save(&set).await.unwrap();

    let findings = store.summarize("Acme Payments").await.unwrap();
    // Only the status indicator, and it says nothing changed
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].key, "historical_claims_status");
    assert_eq!(findings[0].value.render(), "no_changes");

    let mut results = AdapterResults::default();
    results.insert("historical_tracking", findings);
    let card = reconcile(&snapshot(vec![]), &results, &SeverityScorer::unadjusted());
    assert!(card.card_notes.is_empty());
}

#[tokio::test]
async fn test_company_files_are_isolated() {
    let temp = TempDir::new().unwrap();
    let store = HistoryStore::new(temp.path());

    store
        .save(&ClaimSet::new(
            "https://a.example.com",
            "Acme Payments",
            vec![],
        ))
        .await
        .unwrap();
    store
        .save(&ClaimSet::new("https://b.example.com", "Other Co", vec![]))
        .await
        .unwrap();

    let acme = store.load("Acme Payments", 5).await.unwrap();
    let other = store.load("Other Co", 5).await.unwrap();
    assert_eq!(acme.len(), 1);
    assert_eq!(other.len(), 1);
    assert_eq!(acme[0].url, "https://a.example.com");
}
