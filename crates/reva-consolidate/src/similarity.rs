//! Similarity scoring for topic phrases.
//!
//! Consolidation never measures phrase similarity itself; it asks an injected
//! [`SimilarityOracle`]. This keeps the clustering algorithm testable with
//! deterministic stand-ins and lets callers back the oracle with anything
//! from plain string comparison to a remote embedding service.
//!
//! Two deterministic oracles are built in:
//!
//! - [`ExactMatch`]: case- and whitespace-insensitive equality.
//! - [`TokenOverlap`] (default): Jaccard overlap of lowercased alphanumeric
//!   tokens after English stop-word removal.
//!
//! Retry and timeout policy for remote-backed oracles belongs to the caller
//! wrapping the oracle, not to this crate; an oracle error aborts the
//! consolidation call that triggered it.

use std::collections::{BTreeSet, HashSet};
use std::{fmt, str};

use thiserror::Error;

/// An error reported by a similarity oracle.
///
/// Built-in oracles never fail; this exists for caller-supplied oracles
/// backed by fallible services.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct OracleError {
    /// Human-readable description of the failure.
    message: String,
}

impl OracleError {
    /// Creates an oracle error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Scores the similarity of two topic phrases.
///
/// Implementations must return a score in [0, 1] (1 meaning "same topic")
/// and must be deterministic for identical inputs within one consolidation
/// call: the algorithm may score the same pair repeatedly and needs
/// consistent answers for its results to be reproducible.
pub trait SimilarityOracle {
    /// Returns the similarity of `a` and `b` in [0, 1].
    fn similarity(&self, a: &str, b: &str) -> Result<f64, OracleError>;
}

/// Case- and whitespace-insensitive exact matching.
///
/// Scores 1.0 when the phrases are equal after trimming and ASCII
/// lowercasing, 0.0 otherwise. Mostly useful for tests and for corpora where
/// the extraction step already normalizes phrasing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl SimilarityOracle for ExactMatch {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, OracleError> {
        let equal = a.trim().eq_ignore_ascii_case(b.trim());
        Ok(if equal { 1.0 } else { 0.0 })
    }
}

/// Jaccard token-overlap similarity.
///
/// Phrases are split on non-alphanumeric boundaries, lowercased, and
/// filtered against English stop words; the score is the Jaccard index of
/// the resulting token sets. Two phrases that are both all stop words score
/// 1.0 (they carry the same absence of signal); a stop-word-only phrase
/// against a contentful one scores 0.0.
#[derive(Clone)]
pub struct TokenOverlap {
    /// Lowercased stop words excluded from token sets.
    stopwords: HashSet<String>,
}

impl Default for TokenOverlap {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenOverlap {
    /// Creates an oracle with the standard English stop-word list.
    pub fn new() -> Self {
        let mut stopwords: HashSet<String> = HashSet::new();
        for word in stop_words::get(stop_words::LANGUAGE::English) {
            stopwords.insert(word.to_lowercase());
        }
        Self { stopwords }
    }

    /// Splits a phrase into its significant lowercase tokens.
    fn tokens(&self, phrase: &str) -> BTreeSet<String> {
        phrase
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }
}

impl SimilarityOracle for TokenOverlap {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, OracleError> {
        let left = self.tokens(a);
        let right = self.tokens(b);

        if left.is_empty() && right.is_empty() {
            return Ok(1.0);
        }

        let intersection = left.intersection(&right).count() as f64;
        let union = left.union(&right).count() as f64;
        Ok(intersection / union)
    }
}

/// Built-in similarity oracles, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityKind {
    /// Case-insensitive exact phrase equality.
    Exact,
    /// Jaccard overlap of stop-word-filtered tokens.
    #[default]
    TokenOverlap,
}

impl SimilarityKind {
    /// Returns a brief description of the oracle.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Exact => "Case-insensitive exact phrase equality",
            Self::TokenOverlap => "Jaccard overlap of stop-word-filtered tokens",
        }
    }

    /// Builds the oracle this kind names.
    pub fn build(&self) -> Box<dyn SimilarityOracle> {
        match self {
            Self::Exact => Box::new(ExactMatch),
            Self::TokenOverlap => Box::new(TokenOverlap::new()),
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::TokenOverlap => write!(f, "token-overlap"),
        }
    }
}

impl str::FromStr for SimilarityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "token-overlap" | "token_overlap" | "jaccard" => Ok(Self::TokenOverlap),
            _ => Err(format!(
                "unknown similarity oracle '{}', expected one of: exact, token-overlap",
                s
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_match_ignores_case_and_whitespace() {
        let oracle = ExactMatch;
        assert_eq!(oracle.similarity("App Crashes", " app crashes ").unwrap(), 1.0);
        assert_eq!(oracle.similarity("app crashes", "app freezes").unwrap(), 0.0);
    }

    #[test]
    fn token_overlap_identical_phrases() {
        let oracle = TokenOverlap::new();
        assert_eq!(oracle.similarity("app crashes", "app crashes").unwrap(), 1.0);
    }

    #[test]
    fn token_overlap_partial() {
        let oracle = TokenOverlap::new();
        // {app, crashes} vs {app, freezes}: 1 shared of 3 distinct tokens.
        let score = oracle.similarity("app crashes", "app freezes").unwrap();
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn token_overlap_ignores_stop_words() {
        let oracle = TokenOverlap::new();
        // "the" and "on" are stop words, so both sides reduce to the same set.
        let score = oracle
            .similarity("the app crashes on login", "app crashes login")
            .unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn token_overlap_disjoint_phrases() {
        let oracle = TokenOverlap::new();
        assert_eq!(
            oracle.similarity("add dark mode", "payment failed").unwrap(),
            0.0
        );
    }

    #[test]
    fn token_overlap_stop_word_only_phrases() {
        let oracle = TokenOverlap::new();
        assert_eq!(oracle.similarity("the", "a").unwrap(), 1.0);
        assert_eq!(oracle.similarity("the", "payment failed").unwrap(), 0.0);
    }

    #[test]
    fn token_overlap_is_case_insensitive() {
        let oracle = TokenOverlap::new();
        assert_eq!(
            oracle.similarity("Dark Mode", "dark mode").unwrap(),
            1.0
        );
    }

    #[test]
    fn scores_stay_in_range() {
        let oracle = TokenOverlap::new();
        for (a, b) in [
            ("app crashes", "login causes crash"),
            ("refund", "refund not received"),
            ("", "anything"),
        ] {
            let score = oracle.similarity(a, b).unwrap();
            assert!((0.0..=1.0).contains(&score), "score {score} for {a:?} vs {b:?}");
        }
    }

    #[test]
    fn kind_parsing_round_trip() {
        for kind in [SimilarityKind::Exact, SimilarityKind::TokenOverlap] {
            let parsed: SimilarityKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn kind_parsing_accepts_variants() {
        assert_eq!(
            "jaccard".parse::<SimilarityKind>().unwrap(),
            SimilarityKind::TokenOverlap
        );
        assert_eq!(
            "EXACT".parse::<SimilarityKind>().unwrap(),
            SimilarityKind::Exact
        );
        assert!("embedding".parse::<SimilarityKind>().is_err());
    }

    #[test]
    fn default_kind_is_token_overlap() {
        assert_eq!(SimilarityKind::default(), SimilarityKind::TokenOverlap);
    }
}
