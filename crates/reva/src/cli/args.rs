//! Clap argument definitions for the `reva` CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use reva_consolidate::SimilarityKind;
use reva_trend::ScoringKind;

/// Parse a similarity oracle name from a string.
fn parse_similarity(s: &str) -> Result<SimilarityKind, String> {
    s.parse()
}

/// Parse a scoring policy name from a string.
fn parse_scoring(s: &str) -> Result<ScoringKind, String> {
    s.parse()
}

/// Parse a `YYYY-MM-DD` date from a string.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "reva")]
#[command(about = "Review trend analysis - ranked recurring issues from app reviews")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `reva analyze`.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeCommand {
    /// JSON file of extraction records to analyze
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Target date T; the analysis covers T-lookback through T (YYYY-MM-DD)
    #[arg(short = 'd', long, value_parser = parse_date)]
    pub target_date: NaiveDate,

    /// Days of history before the target date [default: 30]
    #[arg(long)]
    pub lookback: Option<u32>,

    /// Similarity threshold in (0, 1] [default: 0.6]
    #[arg(short = 't', long)]
    pub threshold: Option<f64>,

    /// Similarity oracle: token-overlap (stop-word-filtered Jaccard),
    /// exact (case-insensitive equality) [default: token-overlap]
    #[arg(short = 's', long, value_parser = parse_similarity)]
    pub similarity: Option<SimilarityKind>,

    /// Ranking policy: recent-delta (acceleration), total-volume
    /// [default: recent-delta]
    #[arg(long, value_parser = parse_scoring)]
    pub scoring: Option<ScoringKind>,

    /// JSON seed taxonomy file (overrides configured seeds)
    #[arg(long)]
    pub seeds: Option<PathBuf>,

    /// Number of top categories to display [default: 10]
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Write the category-by-day count matrix to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the raw-phrase to canonical-name mapping to a JSON file
    #[arg(long)]
    pub mapping: Option<PathBuf>,
}

/// Arguments for `reva inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectCommand {
    /// Extraction records file to inspect
    pub file: PathBuf,
}

/// Arguments for `reva init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.reva.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `reva` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Consolidate topics and rank trends for a batch of extraction records
    #[command(after_help = "\
INPUT FORMAT:
  A JSON array of per-review extraction records:

  [{\"review_id\": \"r1\",
    \"review_timestamp\": \"2026-08-01T10:00:00Z\",
    \"review_rating\": 1,
    \"topics\": [\"app crashes on login\", \"refund not received\"]}]

EXAMPLES:
  reva analyze -i reviews.json -d 2026-08-06
  reva analyze -i reviews.json -d 2026-08-06 --lookback 7 --top 5
  reva analyze -i reviews.json -d 2026-08-06 --seeds seeds.json --json
  reva analyze -i reviews.json -d 2026-08-06 --csv trend.csv --mapping map.json")]
    Analyze(AnalyzeCommand),

    /// Show how an extraction records file parses
    Inspect(InspectCommand),

    /// Initialize reva configuration in current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,
}
