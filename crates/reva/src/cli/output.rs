//! Rendering and JSON/CSV serialization for CLI output.

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use reva_trend::{EmergingTopic, Growth, TimeWindow, TrendReport};
use serde::Serialize;

/// JSON output for `reva analyze --json`.
#[derive(Serialize)]
pub struct AnalysisJson<'a> {
    /// Target date of the analysis.
    pub target_date: String,
    /// Lookback period in days.
    pub lookback_days: u32,
    /// Number of review records in the input.
    pub reviews: usize,
    /// Number of topic mentions after flattening.
    pub mentions: usize,
    /// Number of consolidated categories.
    pub categories: usize,
    /// Ranked trend reports.
    pub reports: &'a [TrendReport],
    /// Emerging topics.
    pub emerging: &'a [EmergingTopic],
}

/// Builds the ranked top-categories table.
pub fn report_table(reports: &[TrendReport], limit: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Category", "Source", "Total", "Trend"]);

    for (rank, report) in reports.iter().take(limit).enumerate() {
        let source = if report.seed_derived { "seed" } else { "novel" };
        table.add_row(vec![
            Cell::new((rank + 1).to_string()),
            Cell::new(&report.category_name),
            Cell::new(source),
            Cell::new(report.total_count.to_string()),
            Cell::new(format!("{:+.3}", report.trend_score)),
        ]);
    }

    table
}

/// Builds the emerging-topics table.
pub fn emerging_table(topics: &[EmergingTopic]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Category", "Recent", "Older", "Growth"]);

    for topic in topics {
        table.add_row(vec![
            Cell::new(&topic.category_name),
            Cell::new(topic.recent_count.to_string()),
            Cell::new(topic.older_count.to_string()),
            Cell::new(format_growth(&topic.growth)),
        ]);
    }

    table
}

/// Formats a growth value for display: a percentage, or "NEW" for
/// categories with no older history.
pub fn format_growth(growth: &Growth) -> String {
    match growth.as_rate() {
        Some(rate) => format!("{:+.1}%", rate * 100.0),
        None => String::from("NEW"),
    }
}

/// Renders the category-by-window count matrix as CSV.
///
/// One row per report (in ranked order), one column per window plus a
/// trailing total. Window columns follow the supplied window order.
pub fn trend_csv(reports: &[TrendReport], windows: &[TimeWindow]) -> String {
    let mut out = String::from("category");
    for window in windows {
        out.push(',');
        out.push_str(&csv_field(&window.label));
    }
    out.push_str(",total\n");

    for report in reports {
        out.push_str(&csv_field(&report.category_name));
        for window in windows {
            let count = report.window_counts.get(&window.label).copied().unwrap_or(0);
            out.push(',');
            out.push_str(&count.to_string());
        }
        out.push(',');
        out.push_str(&report.total_count.to_string());
        out.push('\n');
    }

    out
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
