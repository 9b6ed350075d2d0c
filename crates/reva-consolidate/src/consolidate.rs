//! Greedy online consolidation of topic mentions into categories.
//!
//! The algorithm processes mentions in input order and, for each one, tries
//! three steps in sequence:
//!
//! 1. **Seed anchoring**: score the phrase against every seed category's
//!    canonical name and aliases. If the best score clears the threshold,
//!    the mention joins that seed's bucket (created lazily on first hit).
//!    Ties at the best score break to the lexicographically smallest
//!    canonical name so results are reproducible.
//! 2. **Novel first-fit**: score against the representative phrase (first
//!    member) of every non-seed bucket in creation order and join the first
//!    one clearing the threshold. First-fit rather than best-fit is a
//!    deliberate policy: it keeps the pass O(n·k) and order-stable instead
//!    of O(n²) with results that shift as clusters grow.
//! 3. Otherwise the mention opens a new bucket and becomes its
//!    representative.
//!
//! The result is a partition: every mention lands in exactly one bucket, and
//! buckets come back in the order they were first created (seed and novel
//! interleaved by discovery).

use std::collections::BTreeMap;

use crate::error::ConsolidateError;
use crate::mention::TopicMention;
use crate::similarity::SimilarityOracle;
use crate::taxonomy::SeedTaxonomy;

/// A consolidated category and the mentions assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAssignment {
    /// Canonical category name: a seed's canonical name, or the first
    /// phrase of a novel cluster.
    pub name: String,
    /// Member mentions in assignment order. Never empty.
    pub members: Vec<TopicMention>,
    /// True when the category comes from the seed taxonomy.
    pub seed_derived: bool,
}

impl CategoryAssignment {
    /// Returns the phrase novel mentions are compared against: the raw
    /// phrase of the first member ever assigned.
    pub fn representative(&self) -> &str {
        &self.members[0].raw_phrase
    }

    /// Returns the number of member mentions.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the category has no members.
    ///
    /// Categories produced by [`consolidate`] always have at least one
    /// member; this exists for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partitions mentions into seed-anchored and novel categories.
///
/// `threshold` is the inclusive similarity cutoff in (0, 1]: a score exactly
/// equal to the threshold counts as a match. An empty `mentions` input
/// yields an empty result.
///
/// # Errors
///
/// Configuration problems (`threshold` out of range, invalid seed taxonomy)
/// are reported before any mention is processed. Any oracle error, NaN, or
/// out-of-range score aborts the call with no partial result.
///
/// # Determinism
///
/// Given a deterministic oracle and a fixed input order, two calls with
/// identical arguments produce identical results: same categories, same
/// order, same membership. A non-deterministic oracle makes the outcome
/// best-effort; this function does not detect that.
pub fn consolidate<O>(
    mentions: Vec<TopicMention>,
    seeds: &SeedTaxonomy,
    oracle: &O,
    threshold: f64,
) -> Result<Vec<CategoryAssignment>, ConsolidateError>
where
    O: SimilarityOracle + ?Sized,
{
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConsolidateError::InvalidThreshold { value: threshold });
    }
    seeds.validate()?;

    let mut assignments: Vec<CategoryAssignment> = Vec::new();

    for mention in mentions {
        if let Some(seed_name) = best_seed_anchor(&mention.raw_phrase, seeds, oracle, threshold)? {
            push_member(&mut assignments, &seed_name, true, mention);
            continue;
        }

        match first_fit_novel(&assignments, &mention.raw_phrase, oracle, threshold)? {
            Some(index) => assignments[index].members.push(mention),
            None => assignments.push(CategoryAssignment {
                name: mention.raw_phrase.clone(),
                members: vec![mention],
                seed_derived: false,
            }),
        }
    }

    Ok(assignments)
}

/// Maps every raw phrase to the canonical category name it was assigned to.
///
/// Useful for exporting the run's effective phrase-to-category mapping.
/// Phrases repeated across categories cannot occur with a deterministic
/// oracle, so the map is well defined.
pub fn topic_mapping(assignments: &[CategoryAssignment]) -> BTreeMap<String, String> {
    let mut mapping = BTreeMap::new();
    for assignment in assignments {
        for member in &assignment.members {
            mapping.insert(member.raw_phrase.clone(), assignment.name.clone());
        }
    }
    mapping
}

/// Finds the seed category with the best similarity to `phrase`, if any
/// clears `threshold`. Ties break to the lexicographically smallest
/// canonical name.
fn best_seed_anchor<O>(
    phrase: &str,
    seeds: &SeedTaxonomy,
    oracle: &O,
    threshold: f64,
) -> Result<Option<String>, ConsolidateError>
where
    O: SimilarityOracle + ?Sized,
{
    let mut best: Option<(f64, &str)> = None;

    for category in &seeds.categories {
        for label in category.labels() {
            let score = checked_similarity(oracle, phrase, label)?;
            let better = match best {
                None => true,
                Some((best_score, best_name)) => {
                    score > best_score
                        || (score == best_score && category.name.as_str() < best_name)
                }
            };
            if better {
                best = Some((score, category.name.as_str()));
            }
        }
    }

    match best {
        Some((score, name)) if score >= threshold => Ok(Some(name.to_string())),
        _ => Ok(None),
    }
}

/// Finds the first non-seed bucket whose representative phrase clears
/// `threshold`, in creation order.
fn first_fit_novel<O>(
    assignments: &[CategoryAssignment],
    phrase: &str,
    oracle: &O,
    threshold: f64,
) -> Result<Option<usize>, ConsolidateError>
where
    O: SimilarityOracle + ?Sized,
{
    for (index, assignment) in assignments.iter().enumerate() {
        if assignment.seed_derived {
            continue;
        }
        let score = checked_similarity(oracle, phrase, assignment.representative())?;
        if score >= threshold {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Adds a mention to the named seed bucket, creating it at the end of the
/// list on first hit so category order reflects discovery order.
fn push_member(
    assignments: &mut Vec<CategoryAssignment>,
    name: &str,
    seed_derived: bool,
    mention: TopicMention,
) {
    if let Some(existing) = assignments
        .iter_mut()
        .find(|a| a.seed_derived == seed_derived && a.name == name)
    {
        existing.members.push(mention);
    } else {
        assignments.push(CategoryAssignment {
            name: name.to_string(),
            members: vec![mention],
            seed_derived,
        });
    }
}

/// Scores a pair through the oracle, converting errors and out-of-range
/// results into fatal consolidation errors.
fn checked_similarity<O>(oracle: &O, left: &str, right: &str) -> Result<f64, ConsolidateError>
where
    O: SimilarityOracle + ?Sized,
{
    let score = oracle
        .similarity(left, right)
        .map_err(|source| ConsolidateError::Oracle {
            left: left.to_string(),
            right: right.to_string(),
            source,
        })?;

    if !(0.0..=1.0).contains(&score) {
        return Err(ConsolidateError::ScoreOutOfRange {
            score,
            left: left.to_string(),
            right: right.to_string(),
        });
    }

    Ok(score)
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::similarity::OracleError;
    use crate::taxonomy::SeedCategory;

    fn ts(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    fn mention(phrase: &str, review_id: &str) -> TopicMention {
        TopicMention::new(phrase, review_id, ts("2026-08-01T10:00:00Z"), 3)
    }

    /// Oracle scoring a fixed value for every pair.
    struct ConstOracle(f64);

    impl SimilarityOracle for ConstOracle {
        fn similarity(&self, _a: &str, _b: &str) -> Result<f64, OracleError> {
            Ok(self.0)
        }
    }

    /// Oracle with per-pair scores and a default for everything else.
    ///
    /// Pairs are looked up in both orders, so tests don't depend on which
    /// side the algorithm passes first.
    struct PairOracle {
        scores: HashMap<(String, String), f64>,
        default: f64,
    }

    impl PairOracle {
        fn new(default: f64) -> Self {
            Self {
                scores: HashMap::new(),
                default,
            }
        }

        fn with_pair(mut self, a: &str, b: &str, score: f64) -> Self {
            self.scores.insert((a.to_string(), b.to_string()), score);
            self
        }
    }

    impl SimilarityOracle for PairOracle {
        fn similarity(&self, a: &str, b: &str) -> Result<f64, OracleError> {
            let forward = self.scores.get(&(a.to_string(), b.to_string()));
            let backward = self.scores.get(&(b.to_string(), a.to_string()));
            Ok(*forward.or(backward).unwrap_or(&self.default))
        }
    }

    /// Oracle that always fails. Used to prove eager validation never
    /// reaches scoring.
    struct FailingOracle;

    impl SimilarityOracle for FailingOracle {
        fn similarity(&self, _a: &str, _b: &str) -> Result<f64, OracleError> {
            Err(OracleError::new("embedding service unavailable"))
        }
    }

    /// The worked scenario: phrases containing "crash" score 0.9 against
    /// the crash seed's labels, everything else scores 0.1.
    struct CrashOracle;

    impl SimilarityOracle for CrashOracle {
        fn similarity(&self, a: &str, b: &str) -> Result<f64, OracleError> {
            let crashy = |s: &str| s.to_lowercase().contains("crash");
            Ok(if crashy(a) && crashy(b) { 0.9 } else { 0.1 })
        }
    }

    fn crash_seeds() -> SeedTaxonomy {
        SeedTaxonomy::new(vec![SeedCategory::with_aliases(
            "Crashes",
            ["crash", "crashes on login"],
        )])
    }

    #[test]
    fn worked_scenario_anchors_and_clusters() {
        let mentions = vec![
            mention("app crashes", "r1"),
            mention("login causes crash", "r2"),
            mention("add dark mode", "r3"),
        ];

        let result = consolidate(mentions, &crash_seeds(), &CrashOracle, 0.6).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Crashes");
        assert!(result[0].seed_derived);
        assert_eq!(result[0].len(), 2);
        assert_eq!(result[1].name, "add dark mode");
        assert!(!result[1].seed_derived);
        assert_eq!(result[1].len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = consolidate(Vec::new(), &crash_seeds(), &CrashOracle, 0.6).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn partition_no_loss_no_duplication() {
        let mentions = vec![
            mention("app crashes", "r1"),
            mention("slow loading", "r2"),
            mention("app crashes again", "r3"),
            mention("slow loading times", "r4"),
            mention("refund not received", "r5"),
        ];
        let input_ids: Vec<&str> = mentions.iter().map(|m| m.review_id.as_str()).collect();

        let result = consolidate(mentions.clone(), &crash_seeds(), &CrashOracle, 0.6).unwrap();

        let mut output_ids: Vec<&str> = result
            .iter()
            .flat_map(|a| a.members.iter().map(|m| m.review_id.as_str()))
            .collect();
        assert_eq!(output_ids.len(), input_ids.len());
        output_ids.sort_unstable();
        let mut expected = input_ids.clone();
        expected.sort_unstable();
        assert_eq!(output_ids, expected);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let mentions = vec![
            mention("app crashes", "r1"),
            mention("add dark mode", "r2"),
            mention("dark mode please", "r3"),
            mention("login crash", "r4"),
        ];
        let oracle = PairOracle::new(0.0).with_pair("dark mode please", "add dark mode", 0.8);

        let first = consolidate(mentions.clone(), &crash_seeds(), &CrashOracle, 0.6).unwrap();
        let second = consolidate(mentions.clone(), &crash_seeds(), &CrashOracle, 0.6).unwrap();
        assert_eq!(first, second);

        let third = consolidate(mentions.clone(), &SeedTaxonomy::default(), &oracle, 0.6).unwrap();
        let fourth = consolidate(mentions, &SeedTaxonomy::default(), &oracle, 0.6).unwrap();
        assert_eq!(third, fourth);
    }

    #[test]
    fn seed_anchoring_beats_novel_clustering() {
        // "app crashes" opens no novel cluster because it anchors; a later
        // crashy phrase must also anchor rather than join any novel bucket,
        // even though a novel bucket with a similar representative exists.
        let oracle = PairOracle::new(0.0)
            .with_pair("crash on startup", "crash", 0.9)
            .with_pair("crash on startup", "weird crash thing", 0.95);
        let mentions = vec![
            mention("weird crash thing", "r1"),
            mention("crash on startup", "r2"),
        ];
        // "weird crash thing" scores 0.0 against all seed labels here, so it
        // opens a novel cluster first.
        let result = consolidate(mentions, &crash_seeds(), &oracle, 0.6).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "weird crash thing");
        assert_eq!(result[1].name, "Crashes");
        assert_eq!(result[1].len(), 1);
        assert_eq!(result[1].members[0].review_id, "r2");
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let seeds = SeedTaxonomy::new(vec![SeedCategory::new("Payment failed")]);

        let at = consolidate(
            vec![mention("payment broken", "r1")],
            &seeds,
            &ConstOracle(0.6),
            0.6,
        )
        .unwrap();
        assert!(at[0].seed_derived, "score == threshold must match");

        let below = consolidate(
            vec![mention("payment broken", "r1")],
            &seeds,
            &ConstOracle(0.5999),
            0.6,
        )
        .unwrap();
        assert!(!below[0].seed_derived, "score below threshold must not match");
    }

    #[test]
    fn seed_tie_breaks_lexicographically() {
        let seeds = SeedTaxonomy::new(vec![
            SeedCategory::new("Zeta issue"),
            SeedCategory::new("Alpha issue"),
        ]);

        // Same score against both seeds; the lexicographically smaller
        // canonical name must win regardless of declaration order.
        let result = consolidate(
            vec![mention("some issue", "r1")],
            &seeds,
            &ConstOracle(0.8),
            0.6,
        )
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Alpha issue");
    }

    #[test]
    fn novel_matching_is_first_fit_not_best_fit() {
        let oracle = PairOracle::new(0.0)
            .with_pair("screen glitches", "flickering screen", 0.7)
            .with_pair("screen glitches", "glitchy screen", 0.95);
        let mentions = vec![
            mention("flickering screen", "r1"),
            mention("glitchy screen", "r2"),
            mention("screen glitches", "r3"),
        ];

        let result =
            consolidate(mentions, &SeedTaxonomy::default(), &oracle, 0.6).unwrap();

        // r3 scores higher against the second cluster, but the first
        // sufficiently-similar cluster in creation order wins.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].representative(), "flickering screen");
        assert_eq!(result[0].len(), 2);
        assert_eq!(result[1].len(), 1);
    }

    #[test]
    fn categories_come_back_in_discovery_order() {
        let mentions = vec![
            mention("add dark mode", "r1"),
            mention("app crashes", "r2"),
            mention("slow loading", "r3"),
        ];

        let result = consolidate(mentions, &crash_seeds(), &CrashOracle, 0.6).unwrap();

        let names: Vec<&str> = result.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["add dark mode", "Crashes", "slow loading"]);
    }

    #[test]
    fn invalid_threshold_fails_before_scoring() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let result = consolidate(
                vec![mention("app crashes", "r1")],
                &crash_seeds(),
                &FailingOracle,
                bad,
            );
            // FailingOracle would turn any scoring attempt into an Oracle
            // error, so getting InvalidThreshold proves nothing was scored.
            assert!(matches!(
                result,
                Err(ConsolidateError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn invalid_seeds_fail_before_scoring() {
        let seeds = SeedTaxonomy::new(vec![
            SeedCategory::new("App crashes"),
            SeedCategory::new("App crashes"),
        ]);
        let result = consolidate(
            vec![mention("app crashes", "r1")],
            &seeds,
            &FailingOracle,
            0.6,
        );
        assert!(matches!(
            result,
            Err(ConsolidateError::DuplicateSeedName { .. })
        ));
    }

    #[test]
    fn oracle_error_aborts_with_no_partial_result() {
        let result = consolidate(
            vec![mention("app crashes", "r1")],
            &crash_seeds(),
            &FailingOracle,
            0.6,
        );
        assert!(matches!(result, Err(ConsolidateError::Oracle { .. })));
    }

    #[test]
    fn out_of_range_score_is_fatal() {
        let result = consolidate(
            vec![mention("app crashes", "r1")],
            &crash_seeds(),
            &ConstOracle(1.5),
            0.6,
        );
        assert!(matches!(
            result,
            Err(ConsolidateError::ScoreOutOfRange { score, .. }) if score == 1.5
        ));

        let nan = consolidate(
            vec![mention("app crashes", "r1")],
            &crash_seeds(),
            &ConstOracle(f64::NAN),
            0.6,
        );
        assert!(matches!(nan, Err(ConsolidateError::ScoreOutOfRange { .. })));
    }

    #[test]
    fn topic_mapping_covers_every_phrase() {
        let mentions = vec![
            mention("app crashes", "r1"),
            mention("login causes crash", "r2"),
            mention("add dark mode", "r3"),
        ];
        let result = consolidate(mentions, &crash_seeds(), &CrashOracle, 0.6).unwrap();

        let mapping = topic_mapping(&result);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping["app crashes"], "Crashes");
        assert_eq!(mapping["login causes crash"], "Crashes");
        assert_eq!(mapping["add dark mode"], "add dark mode");
    }
}
