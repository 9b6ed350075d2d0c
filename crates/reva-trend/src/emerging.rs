//! Emerging-topic detection.
//!
//! An emerging topic is a category whose recent mention volume outpaces its
//! volume in the period before. The comparison splits the lookback range
//! into an "older" span and a "recent" span ending at the target date; a
//! category qualifies by growth rate, or by raw recent volume when it has
//! no older history at all.

use std::cmp::Ordering;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use reva_consolidate::CategoryAssignment;
use serde::Serialize;

/// Thresholds controlling what counts as emerging.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergingPolicy {
    /// Days in the recent span, ending at the target date.
    pub recent_days: u32,
    /// Days in the older comparison span, immediately before the recent one.
    pub older_days: u32,
    /// Minimum growth rate over the older span, e.g. 0.5 for +50%.
    pub growth_threshold: f64,
    /// Minimum recent volume for categories with no older history.
    pub min_new_volume: u64,
}

impl Default for EmergingPolicy {
    fn default() -> Self {
        Self {
            recent_days: 7,
            older_days: 23,
            growth_threshold: 0.5,
            min_new_volume: 3,
        }
    }
}

/// How a category's recent volume compares to its older volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    /// No older history; the category first appeared in the recent span.
    New,
    /// Relative growth over the older span: `(recent - older) / older`.
    Rate(f64),
}

impl Growth {
    /// Returns the growth rate, or `None` for first-seen categories.
    pub fn as_rate(&self) -> Option<f64> {
        match self {
            Self::New => None,
            Self::Rate(rate) => Some(*rate),
        }
    }
}

/// One category flagged as emerging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergingTopic {
    /// Canonical name of the category.
    pub category_name: String,
    /// Mentions in the recent span.
    pub recent_count: u64,
    /// Mentions in the older span.
    pub older_count: u64,
    /// Growth classification.
    pub growth: Growth,
}

/// Flags categories whose recent volume outpaces their older volume.
///
/// A category is emerging when its older span has mentions and the growth
/// rate exceeds `policy.growth_threshold`, or when the older span is empty
/// and the recent span holds at least `policy.min_new_volume` mentions
/// (reported as [`Growth::New`]).
///
/// Results are sorted with `New` entries first, then by rate descending,
/// ties broken by name ascending.
pub fn emerging_topics(
    categories: &[CategoryAssignment],
    target: NaiveDate,
    policy: &EmergingPolicy,
) -> Vec<EmergingTopic> {
    let Some(spans) = Spans::compute(target, policy) else {
        return Vec::new();
    };

    let mut emerging: Vec<EmergingTopic> = categories
        .iter()
        .filter_map(|category| {
            let recent = count_between(category, spans.recent_start, spans.recent_end);
            let older = count_between(category, spans.older_start, spans.recent_start);

            let growth = if older > 0 {
                let rate = (recent as f64 - older as f64) / older as f64;
                (rate > policy.growth_threshold).then_some(Growth::Rate(rate))
            } else {
                (recent >= policy.min_new_volume).then_some(Growth::New)
            }?;

            Some(EmergingTopic {
                category_name: category.name.clone(),
                recent_count: recent,
                older_count: older,
                growth,
            })
        })
        .collect();

    emerging.sort_by(|a, b| {
        growth_order(&a.growth, &b.growth)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    emerging
}

/// The UTC boundaries of the older and recent spans.
struct Spans {
    /// Inclusive start of the older span.
    older_start: DateTime<Utc>,
    /// Inclusive start of the recent span (exclusive end of the older one).
    recent_start: DateTime<Utc>,
    /// Exclusive end of the recent span (the day after the target date).
    recent_end: DateTime<Utc>,
}

impl Spans {
    /// Computes span boundaries, or `None` if the dates are unrepresentable
    /// or the recent span is empty.
    fn compute(target: NaiveDate, policy: &EmergingPolicy) -> Option<Self> {
        if policy.recent_days == 0 {
            return None;
        }
        let recent_end = target.checked_add_days(Days::new(1))?;
        let recent_start =
            target.checked_sub_days(Days::new(u64::from(policy.recent_days) - 1))?;
        let older_start =
            recent_start.checked_sub_days(Days::new(u64::from(policy.older_days)))?;

        Some(Self {
            older_start: midnight(older_start),
            recent_start: midnight(recent_start),
            recent_end: midnight(recent_end),
        })
    }
}

/// Midnight UTC at the start of a date.
fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Counts a category's members with `start <= timestamp < end`.
fn count_between(
    category: &CategoryAssignment,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> u64 {
    category
        .members
        .iter()
        .filter(|m| start <= m.timestamp && m.timestamp < end)
        .count() as u64
}

/// Orders growth values: `New` first, then rate descending.
fn growth_order(a: &Growth, b: &Growth) -> Ordering {
    match (a, b) {
        (Growth::New, Growth::New) => Ordering::Equal,
        (Growth::New, Growth::Rate(_)) => Ordering::Less,
        (Growth::Rate(_), Growth::New) => Ordering::Greater,
        (Growth::Rate(left), Growth::Rate(right)) => {
            right.partial_cmp(left).unwrap_or(Ordering::Equal)
        }
    }
}
