//! Trend aggregation over consolidated review topics.
//!
//! Once mentions are consolidated into categories, this crate turns the
//! settled category set into ranked, time-windowed statistics:
//!
//! - [`analyze`] counts members per [`TimeWindow`], scores each category with
//!   a pluggable [`TrendScoringPolicy`], and returns [`TrendReport`]s in a
//!   fully deterministic order.
//! - [`emerging_topics`] flags categories accelerating in the recent window
//!   compared to the period before it.
//!
//! Reports are derived data: recomputed per call, never mutated in place.

#![warn(missing_docs)]

mod analyze;
mod emerging;
mod error;
mod scoring;
mod window;

pub use analyze::{TrendReport, analyze};
pub use emerging::{EmergingPolicy, EmergingTopic, Growth, emerging_topics};
pub use error::TrendError;
pub use scoring::{RecentDelta, ScoringKind, TotalVolume, TrendScoringPolicy};
pub use window::{TimeWindow, daily_windows, validate_windows};
