//! Command-line interface for claimlens.
//!
//! Provides commands for reconciling extracted claims against adapter
//! findings, collecting findings from live sources, logging analyst
//! feedback, and inspecting configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{collect_findings, Adapter, NmlsAdapter, TrustCenterAdapter};
use crate::config;
use crate::domain::{AdapterResults, ClaimSet, DiscrepancyKind, TruthCard};
use crate::feedback::{sync_feedback, AnalystAction, FeedbackEntry, FeedbackLog};
use crate::history::HistoryStore;
use crate::reconcile::reconcile;
use crate::scoring::{AdjustmentTable, SeverityScorer};

/// claimlens - Company claim verification engine
#[derive(Parser, Debug)]
#[command(name = "claimlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile extracted claims against adapter findings
    Reconcile {
        /// Claim set JSON file (as produced by the extractor)
        #[arg(short, long)]
        claims: PathBuf,

        /// Adapter findings JSON file (bucket name -> findings)
        #[arg(short, long)]
        findings: Option<PathBuf>,

        /// Also run the built-in live adapters and merge their findings
        #[arg(long)]
        live: bool,

        /// Stock ticker, passed through to live adapters
        #[arg(short, long)]
        ticker: Option<String>,

        /// Record this claim set and include findings from past snapshots
        #[arg(long)]
        track_history: bool,

        /// Write the truth card here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run the built-in adapters and write their findings as JSON
    Collect {
        /// Company name to check
        company: String,

        /// Stock ticker (enables SEC-keyed lookups where supported)
        #[arg(short, long)]
        ticker: Option<String>,

        /// Base URL for the company's trust-center / security.txt probe
        #[arg(long)]
        base_url: Option<String>,

        /// Write findings here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Manage analyst feedback on past truth cards
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommands {
    /// Log an analyst decision about a discrepancy
    Log {
        /// URL of the card the discrepancy came from
        #[arg(long)]
        card_url: String,

        /// Company the card was generated for
        #[arg(long)]
        company: String,

        /// Discrepancy kind (snake_case, e.g. marketing_metric_unverified)
        #[arg(long, value_parser = parse_kind)]
        kind: DiscrepancyKind,

        /// What the analyst did
        #[arg(long, value_enum)]
        action: AnalystAction,

        /// Free-form note
        #[arg(long)]
        notes: Option<String>,

        /// Who logged it
        #[arg(long)]
        actor: Option<String>,
    },

    /// Recompute scoring adjustments from the feedback log
    Sync,
}

/// Parse a snake_case discrepancy kind as it appears in card JSON
fn parse_kind(s: &str) -> Result<DiscrepancyKind, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unknown discrepancy kind: {}", s))
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Reconcile {
                claims,
                findings,
                live,
                ticker,
                track_history,
                out,
            } => {
                run_reconcile(&claims, findings.as_deref(), live, ticker.as_deref(), track_history, out.as_deref()).await
            }
            Commands::Collect {
                company,
                ticker,
                base_url,
                out,
            } => {
                run_collect(&company, ticker.as_deref(), base_url.as_deref(), out.as_deref()).await
            }
            Commands::Feedback { command } => execute_feedback(command).await,
            Commands::Config => show_config(),
        }
    }
}

/// Read and parse a claim set file
fn load_claim_set(path: &Path) -> Result<ClaimSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read claims file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse claims file: {}", path.display()))
}

/// Read and parse a findings file
fn load_findings(path: &Path) -> Result<AdapterResults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read findings file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse findings file: {}", path.display()))
}

/// The adapters the CLI knows how to run directly
fn built_in_adapters(base_url: Option<&str>) -> Vec<Box<dyn Adapter>> {
    let mut adapters: Vec<Box<dyn Adapter>> = vec![Box::new(NmlsAdapter::new())];
    if let Some(url) = base_url {
        adapters.push(Box::new(TrustCenterAdapter::new(url)));
    }
    adapters
}

/// Write a serializable value to a file or pretty-print it to stdout
fn emit<T: serde::Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run_reconcile(
    claims_path: &Path,
    findings_path: Option<&Path>,
    live: bool,
    ticker: Option<&str>,
    track_history: bool,
    out: Option<&Path>,
) -> Result<()> {
    let cfg = config::config()?;
    let claim_set = load_claim_set(claims_path)?;

    let mut results = match findings_path {
        Some(path) => load_findings(path)?,
        None => AdapterResults::default(),
    };

    if live {
        let timeout = Duration::from_secs(cfg.limits.adapter_timeout_seconds);
        let collected = collect_findings(
            built_in_adapters(Some(&claim_set.url)),
            &claim_set.company,
            ticker,
            timeout,
        )
        .await;
        results.merge(collected);
    }

    if track_history {
        let store = HistoryStore::new(cfg.history_dir()).with_depth(cfg.limits.history_depth);
        store.save(&claim_set).await?;
        let historical = store.summarize(&claim_set.company).await?;
        results.insert("historical_tracking", historical);
    }

    let scorer = SeverityScorer::new(AdjustmentTable::load(&cfg.adjustments_path()));
    let card = reconcile(&claim_set, &results, &scorer);

    print_card_summary(&card);
    emit(&card, out)
}

async fn run_collect(
    company: &str,
    ticker: Option<&str>,
    base_url: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let cfg = config::config()?;
    let timeout = Duration::from_secs(cfg.limits.adapter_timeout_seconds);

    let results = collect_findings(built_in_adapters(base_url), company, ticker, timeout).await;
    emit(&results, out)
}

async fn execute_feedback(command: FeedbackCommands) -> Result<()> {
    let cfg = config::config()?;
    let log = FeedbackLog::new(cfg.feedback_events_path());

    match command {
        FeedbackCommands::Log {
            card_url,
            company,
            kind,
            action,
            notes,
            actor,
        } => {
            let mut entry = FeedbackEntry::new(card_url, company, kind, action);
            entry.notes = notes;
            if let Some(actor) = actor {
                entry.actor = actor;
            }
            log.append(&entry).await?;
            println!("Logged {} on {}", format_action(action), kind.as_str());
            Ok(())
        }
        FeedbackCommands::Sync => {
            let store = sync_feedback(&log, &cfg.adjustments_path()).await?;
            println!(
                "Synced adjustments for {} rule(s) -> {}",
                store.adjustments.len(),
                cfg.adjustments_path().display()
            );
            Ok(())
        }
    }
}

fn format_action(action: AnalystAction) -> &'static str {
    match action {
        AnalystAction::Confirm => "confirm",
        AnalystAction::Dismiss => "dismiss",
        AnalystAction::Override => "override",
        AnalystAction::Escalate => "escalate",
    }
}

/// Print a readable card summary before the JSON output
fn print_card_summary(card: &TruthCard) {
    println!("Truth card for {} ({})", card.company, card.url);
    println!("  Severity: {}", card.severity_summary);
    println!("  Confidence: {:.2}", card.overall_confidence);
    println!("  Discrepancies: {}", card.discrepancies.len());
    for d in &card.discrepancies {
        println!(
            "    [{}] {} - {}",
            d.severity,
            d.kind.as_str(),
            d.claim_text.as_deref().unwrap_or(&d.claim_id)
        );
    }
    if !card.card_notes.is_empty() {
        println!("  Notes: {}", card.card_notes.len());
        for note in &card.card_notes {
            println!("    {}", note.summary);
        }
    }
    println!();
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("claimlens configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:             {}", cfg.home.display());
    println!("  Data:             {}", cfg.data.display());
    println!("  Feedback events:  {}", cfg.feedback_events_path().display());
    println!("  Rule adjustments: {}", cfg.adjustments_path().display());
    println!("  History:          {}", cfg.history_dir().display());
    println!();
    println!("Limits:");
    println!(
        "  Adapter timeout:  {}s",
        cfg.limits.adapter_timeout_seconds
    );
    println!("  History depth:    {}", cfg.limits.history_depth);

    Ok(())
}
