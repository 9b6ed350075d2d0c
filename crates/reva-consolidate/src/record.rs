//! Extraction record input.
//!
//! The upstream extraction step emits one record per review: the review's
//! metadata plus the topic phrases found in its text (possibly none). This
//! module is the only contract reva has with that collaborator; it is
//! agnostic to how the phrases were produced.

use std::io;
use std::path::{Path, PathBuf};
use std::{fs, slice};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::mention::TopicMention;

/// One review's extraction output.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRecord {
    /// Store-assigned identifier of the review.
    pub review_id: String,
    /// When the review was posted.
    pub review_timestamp: DateTime<Utc>,
    /// Star rating of the review (1-5).
    pub review_rating: u8,
    /// Topic phrases extracted from the review text. A review with no
    /// actionable content yields an empty list.
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Errors that can occur when loading extraction records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Failed to read the records file.
    #[error("failed to read extraction records {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse the records JSON.
    #[error("failed to parse extraction records {path}: {source}")]
    ParseFile {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        source: serde_json::Error,
    },

    /// A record carries a rating outside 1-5.
    #[error("review '{review_id}' has rating {rating}, expected 1-5")]
    InvalidRating {
        /// Identifier of the offending review.
        review_id: String,
        /// The out-of-range rating.
        rating: u8,
    },
}

/// Loads extraction records from a JSON file.
///
/// The file holds a JSON array of records in extraction order; order is
/// preserved. Ratings are validated here, at the input boundary, so the
/// consolidation core can treat mentions as trusted collaborator output.
pub fn load_records(path: &Path) -> Result<Vec<ReviewRecord>, RecordError> {
    let contents = fs::read_to_string(path).map_err(|source| RecordError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<ReviewRecord> =
        serde_json::from_str(&contents).map_err(|source| RecordError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;

    for record in &records {
        if !(1..=5).contains(&record.review_rating) {
            return Err(RecordError::InvalidRating {
                review_id: record.review_id.clone(),
                rating: record.review_rating,
            });
        }
    }

    Ok(records)
}

/// Flattens records into mentions, preserving record order and per-record
/// topic order.
pub fn mentions_from_records(records: &[ReviewRecord]) -> Vec<TopicMention> {
    records
        .iter()
        .flat_map(|record| {
            record.topics.iter().map(|topic| {
                TopicMention::new(
                    topic.clone(),
                    record.review_id.clone(),
                    record.review_timestamp,
                    record.review_rating,
                )
            })
        })
        .collect()
}

/// Convenience for flattening a single record.
pub fn mentions_from_record(record: &ReviewRecord) -> Vec<TopicMention> {
    mentions_from_records(slice::from_ref(record))
}
