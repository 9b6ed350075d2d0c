//! Topic consolidation for review trend analysis.
//!
//! Review text is mined upstream into short topic phrases ("app crashes on
//! login", "delivery partner rude"). Independent extraction produces many
//! near-duplicate phrasings of the same underlying issue, so this crate
//! collapses them into a stable set of canonical categories:
//!
//! 1. **Seed anchoring**: phrases close enough to a known category's name or
//!    aliases join that category.
//! 2. **Novel clustering**: everything else is clustered greedily against the
//!    representative phrase of clusters discovered earlier in the batch.
//!
//! Closeness is judged by an injected [`SimilarityOracle`], so the clustering
//! algorithm itself stays independent of any particular string metric or
//! embedding service. Two deterministic oracles ship with the crate; callers
//! with an embedding backend implement the trait themselves.
//!
//! The output is a partition: every mention lands in exactly one
//! [`CategoryAssignment`], and category order is the order of first discovery,
//! so identical inputs with a deterministic oracle always produce identical
//! results.

#![warn(missing_docs)]

mod consolidate;
mod error;
mod mention;
mod record;
mod similarity;
mod taxonomy;

pub use consolidate::{CategoryAssignment, consolidate, topic_mapping};
pub use error::{ConsolidateError, TaxonomyError};
pub use mention::TopicMention;
pub use record::{
    RecordError, ReviewRecord, load_records, mentions_from_record, mentions_from_records,
};
pub use similarity::{
    ExactMatch, OracleError, SimilarityKind, SimilarityOracle, TokenOverlap,
};
pub use taxonomy::{SeedCategory, SeedTaxonomy};
