//! Trend report computation and ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use reva_consolidate::CategoryAssignment;
use serde::Serialize;

use crate::error::TrendError;
use crate::scoring::TrendScoringPolicy;
use crate::window::{TimeWindow, validate_windows};

/// Per-category frequency and trend statistics for one analysis call.
///
/// Derived data: recomputed from the current category set on every call,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    /// Canonical name of the category.
    pub category_name: String,
    /// Total member mentions, including those outside every window.
    pub total_count: u64,
    /// Mention count per window label, zero-filled for windows with no
    /// members.
    pub window_counts: BTreeMap<String, u64>,
    /// Composite ranking score from the scoring policy.
    pub trend_score: f64,
    /// True when the category comes from the seed taxonomy.
    pub seed_derived: bool,
}

/// Computes ranked trend reports for a settled category set.
///
/// Totals are inclusive: every member counts toward `total_count`. Window
/// breakdowns are exclusive to covered time: a mention whose timestamp
/// falls outside every window appears in no `window_counts` entry. Every
/// category yields a report (even with zero windowed members), and every
/// report carries an entry for every supplied window.
///
/// Reports come back ordered by `trend_score` descending, ties broken by
/// `total_count` descending, then `category_name` ascending, so identical
/// inputs always produce identical output.
///
/// # Errors
///
/// The window set is validated once, up front; an invalid set (empty or
/// inverted window, duplicate label, unordered or overlapping windows)
/// fails the whole call before any counting happens.
pub fn analyze<P>(
    categories: &[CategoryAssignment],
    windows: &[TimeWindow],
    policy: &P,
) -> Result<Vec<TrendReport>, TrendError>
where
    P: TrendScoringPolicy + ?Sized,
{
    validate_windows(windows)?;

    let mut reports: Vec<TrendReport> = categories
        .iter()
        .map(|category| report_for(category, windows, policy))
        .collect();

    reports.sort_by(|a, b| {
        b.trend_score
            .partial_cmp(&a.trend_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_count.cmp(&a.total_count))
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    Ok(reports)
}

/// Builds the report for a single category.
fn report_for<P>(
    category: &CategoryAssignment,
    windows: &[TimeWindow],
    policy: &P,
) -> TrendReport
where
    P: TrendScoringPolicy + ?Sized,
{
    let ordered_counts: Vec<u64> = windows
        .iter()
        .map(|window| {
            category
                .members
                .iter()
                .filter(|m| window.contains(m.timestamp))
                .count() as u64
        })
        .collect();

    let total_count = category.members.len() as u64;
    let trend_score = policy.score(&ordered_counts, total_count);

    let window_counts = windows
        .iter()
        .map(|w| w.label.clone())
        .zip(ordered_counts)
        .collect();

    TrendReport {
        category_name: category.name.clone(),
        total_count,
        window_counts,
        trend_score,
        seed_derived: category.seed_derived,
    }
}
