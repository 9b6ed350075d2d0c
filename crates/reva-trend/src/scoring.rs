//! Trend scoring policies.
//!
//! The trend score decides the report ranking. It is a policy seam rather
//! than a fixed formula: the shipped default rewards categories that are
//! both frequent and accelerating, but callers can rank by raw volume or
//! plug in their own weighting.

use std::{fmt, str};

/// Computes a category's trend score from its ordered window counts.
///
/// `window_counts` holds one entry per analysis window, in window order;
/// `total_count` is the category's full membership, including mentions that
/// fell outside every window.
pub trait TrendScoringPolicy {
    /// Returns the composite trend score used for ranking.
    fn score(&self, window_counts: &[u64], total_count: u64) -> f64;
}

/// Default policy: recent acceleration normalized by overall volume.
///
/// `(last - previous) / max(1, total)` over the final two windows. The
/// `max(1, ..)` guard keeps first-seen categories finite; with a single
/// window the missing previous count is treated as zero, and with no
/// windows the score is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecentDelta;

impl TrendScoringPolicy for RecentDelta {
    fn score(&self, window_counts: &[u64], total_count: u64) -> f64 {
        let last = window_counts.last().copied().unwrap_or(0);
        let previous = match window_counts.len() {
            0 | 1 => 0,
            n => window_counts[n - 2],
        };
        (last as f64 - previous as f64) / total_count.max(1) as f64
    }
}

/// Ranks purely by overall frequency, ignoring windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalVolume;

impl TrendScoringPolicy for TotalVolume {
    fn score(&self, _window_counts: &[u64], total_count: u64) -> f64 {
        total_count as f64
    }
}

/// Built-in scoring policies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringKind {
    /// Recent-window acceleration relative to total volume.
    #[default]
    RecentDelta,
    /// Overall mention count.
    TotalVolume,
}

impl ScoringKind {
    /// Returns a brief description of the policy.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RecentDelta => "Recent-window acceleration relative to total volume",
            Self::TotalVolume => "Overall mention count",
        }
    }

    /// Builds the policy this kind names.
    pub fn build(&self) -> Box<dyn TrendScoringPolicy> {
        match self {
            Self::RecentDelta => Box::new(RecentDelta),
            Self::TotalVolume => Box::new(TotalVolume),
        }
    }
}

impl fmt::Display for ScoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecentDelta => write!(f, "recent-delta"),
            Self::TotalVolume => write!(f, "total-volume"),
        }
    }
}

impl str::FromStr for ScoringKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recent-delta" | "recent_delta" => Ok(Self::RecentDelta),
            "total-volume" | "total_volume" | "total" => Ok(Self::TotalVolume),
            _ => Err(format!(
                "unknown scoring policy '{}', expected one of: recent-delta, total-volume",
                s
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recent_delta_uses_last_two_windows() {
        // (5 - 2) / 10
        let score = RecentDelta.score(&[1, 2, 2, 5], 10);
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn recent_delta_can_be_negative() {
        let score = RecentDelta.score(&[5, 1], 6);
        assert!((score + 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn recent_delta_single_window() {
        // Missing previous window counts as zero.
        let score = RecentDelta.score(&[4], 4);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recent_delta_no_windows() {
        assert_eq!(RecentDelta.score(&[], 7), 0.0);
    }

    #[test]
    fn recent_delta_guards_zero_total() {
        // A category whose members all fall outside the windows still has
        // total 0 in theory; the guard keeps the score finite.
        assert_eq!(RecentDelta.score(&[0, 0], 0), 0.0);
    }

    #[test]
    fn total_volume_ignores_windows() {
        assert_eq!(TotalVolume.score(&[9, 9, 9], 4), 4.0);
        assert_eq!(TotalVolume.score(&[], 4), 4.0);
    }

    #[test]
    fn kind_parsing_round_trip() {
        for kind in [ScoringKind::RecentDelta, ScoringKind::TotalVolume] {
            let parsed: ScoringKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("pagerank".parse::<ScoringKind>().is_err());
    }
}
