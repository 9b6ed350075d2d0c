//! Time window types and construction.
//!
//! A window set partitions the analysis range into labeled, half-open
//! `[start, end)` buckets. The standard layout is one window per calendar
//! day over a lookback period ending at the target date, matching how
//! review batches arrive; arbitrary window sets are accepted as long as
//! they validate.

use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::error::TrendError;

/// A labeled, half-open time bucket `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    /// Identifier used as the key in report window counts (e.g. a
    /// `YYYY-MM-DD` day stamp).
    pub label: String,
    /// Inclusive start of the window.
    pub start: DateTime<Utc>,
    /// Exclusive end of the window.
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window.
    pub fn new(label: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Returns true if the timestamp falls inside `[start, end)`.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// Builds one window per calendar day covering `target - lookback_days`
/// through `target` inclusive, labeled `YYYY-MM-DD` in UTC.
///
/// With `lookback_days = 0` the result is the single day of `target`.
/// Returns an empty vector if the range is not representable (a lookback
/// reaching past the calendar's minimum date).
pub fn daily_windows(target: NaiveDate, lookback_days: u32) -> Vec<TimeWindow> {
    let Some(start) = target.checked_sub_days(Days::new(u64::from(lookback_days))) else {
        return Vec::new();
    };

    let mut windows = Vec::with_capacity(lookback_days as usize + 1);
    let mut day = start;
    while day <= target {
        let Some(next) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        windows.push(TimeWindow::new(
            day.format("%Y-%m-%d").to_string(),
            day.and_time(NaiveTime::MIN).and_utc(),
            next.and_time(NaiveTime::MIN).and_utc(),
        ));
        day = next;
    }

    windows
}

/// Validates a window set: every window non-empty, labels unique, windows
/// chronologically ordered and non-overlapping.
///
/// Contiguity is not required; gaps between windows are legal and simply
/// leave the gap's mentions out of every window count.
pub fn validate_windows(windows: &[TimeWindow]) -> Result<(), TrendError> {
    let mut labels: HashSet<&str> = HashSet::new();

    for window in windows {
        if window.start >= window.end {
            return Err(TrendError::EmptyWindow {
                label: window.label.clone(),
            });
        }
        if !labels.insert(window.label.as_str()) {
            return Err(TrendError::DuplicateWindowLabel {
                label: window.label.clone(),
            });
        }
    }

    for pair in windows.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        if next.start < previous.start {
            return Err(TrendError::UnorderedWindows {
                first: previous.label.clone(),
                second: next.label.clone(),
            });
        }
        if next.start < previous.end {
            return Err(TrendError::OverlappingWindows {
                first: previous.label.clone(),
                second: next.label.clone(),
            });
        }
    }

    Ok(())
}
