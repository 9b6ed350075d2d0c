//! The `reva inspect` command: show how an extraction records file parses.

use std::collections::{BTreeMap, HashSet};
use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use reva_consolidate::{ReviewRecord, load_records, mentions_from_records};

use crate::cli::args::InspectCommand;

/// Parses the file and prints record, mention, and per-day statistics.
pub fn run(cmd: &InspectCommand) -> ExitCode {
    let records = match load_records(&cmd.file) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mentions = mentions_from_records(&records);
    let unique_phrases: HashSet<&str> =
        mentions.iter().map(|m| m.raw_phrase.as_str()).collect();

    println!("File: {}", cmd.file.display());
    println!("Reviews: {}", records.len());
    println!("Mentions: {}", mentions.len());
    println!("Unique phrases: {}", unique_phrases.len());

    if records.is_empty() {
        return ExitCode::SUCCESS;
    }

    let (earliest, latest) = date_span(&records);
    println!("Date span: {earliest} to {latest}");

    println!();
    println!("Per-day mentions:");
    println!("{}", per_day_table(&records));

    ExitCode::SUCCESS
}

/// Returns the earliest and latest review dates in the batch.
fn date_span(records: &[ReviewRecord]) -> (String, String) {
    let mut timestamps: Vec<_> = records.iter().map(|r| r.review_timestamp).collect();
    timestamps.sort_unstable();
    let format = |t: &chrono::DateTime<chrono::Utc>| t.format("%Y-%m-%d").to_string();
    (format(&timestamps[0]), format(&timestamps[timestamps.len() - 1]))
}

/// Builds a table of review and mention counts per calendar day.
fn per_day_table(records: &[ReviewRecord]) -> Table {
    let mut days: BTreeMap<String, (HashSet<&str>, usize)> = BTreeMap::new();

    for record in records {
        let day = record.review_timestamp.format("%Y-%m-%d").to_string();
        let entry = days.entry(day).or_default();
        entry.0.insert(record.review_id.as_str());
        entry.1 += record.topics.len();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Date", "Reviews", "Mentions"]);

    for (day, (reviews, mentions)) in &days {
        table.add_row(vec![
            Cell::new(day),
            Cell::new(reviews.len().to_string()),
            Cell::new(mentions.to_string()),
        ]);
    }

    table
}
