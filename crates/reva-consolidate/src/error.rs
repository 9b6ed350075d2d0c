//! Error types for topic consolidation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::similarity::OracleError;

/// Errors that can occur while consolidating mentions into categories.
///
/// Configuration problems (threshold, seed taxonomy) are detected eagerly,
/// before any mention is processed. Oracle failures abort the whole call with
/// no partial result, since trend conclusions drawn from a half-clustered
/// batch would mislead downstream consumers.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    /// The similarity threshold is outside the half-open range (0, 1].
    #[error("similarity threshold must be in (0, 1], got {value}")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f64,
    },

    /// A seed category has an empty canonical name.
    #[error("seed taxonomy contains a category with an empty canonical name")]
    EmptySeedName,

    /// Two seed categories share the same canonical name.
    #[error("duplicate seed category name: {name}")]
    DuplicateSeedName {
        /// The duplicated canonical name.
        name: String,
    },

    /// The similarity oracle returned an error for a phrase pair.
    #[error("similarity oracle failed scoring '{left}' against '{right}': {source}")]
    Oracle {
        /// First phrase of the failed comparison.
        left: String,
        /// Second phrase of the failed comparison.
        right: String,
        /// The oracle's own error.
        source: OracleError,
    },

    /// The similarity oracle returned a score outside [0, 1].
    #[error("similarity oracle returned out-of-range score {score} for '{left}' vs '{right}'")]
    ScoreOutOfRange {
        /// The invalid score (may be NaN).
        score: f64,
        /// First phrase of the comparison.
        left: String,
        /// Second phrase of the comparison.
        right: String,
    },
}

/// Errors that can occur when loading a seed taxonomy file.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// Failed to read the seed taxonomy file.
    #[error("failed to read seed taxonomy {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse the seed taxonomy JSON.
    #[error("failed to parse seed taxonomy {path}: {source}")]
    ParseFile {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        source: serde_json::Error,
    },
}
