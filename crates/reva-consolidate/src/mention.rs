//! Topic mention types.
//!
//! A mention is one extracted topic phrase tagged with the review it came
//! from. Mentions are produced upstream (one review can yield zero or more)
//! and are immutable once created; consolidation only moves them between
//! category buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted topic phrase with its source review metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMention {
    /// The topic phrase as extracted from the review text.
    pub raw_phrase: String,
    /// Store-assigned identifier of the source review.
    pub review_id: String,
    /// When the source review was posted.
    pub timestamp: DateTime<Utc>,
    /// Star rating of the source review (1-5).
    pub rating: u8,
}

impl TopicMention {
    /// Creates a new mention.
    pub fn new(
        raw_phrase: impl Into<String>,
        review_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        rating: u8,
    ) -> Self {
        Self {
            raw_phrase: raw_phrase.into(),
            review_id: review_id.into(),
            timestamp,
            rating,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ts(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    #[test]
    fn mention_creation() {
        let mention = TopicMention::new("app crashes", "r1", ts("2026-08-01T10:00:00Z"), 1);
        assert_eq!(mention.raw_phrase, "app crashes");
        assert_eq!(mention.review_id, "r1");
        assert_eq!(mention.rating, 1);
    }

    #[test]
    fn mention_round_trips_through_json() {
        let mention = TopicMention::new("food cold", "r9", ts("2026-08-02T08:30:00Z"), 2);
        let json = serde_json::to_string(&mention).unwrap();
        let back: TopicMention = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mention);
    }
}
