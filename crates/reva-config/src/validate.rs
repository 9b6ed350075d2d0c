//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential
//! issues. Warnings are non-fatal: analysis can still run, but the warned
//! settings will either be rejected later (a bad threshold fails
//! consolidation) or silently do nothing (a missing seed file).

use std::collections::HashSet;
use std::fmt;

use crate::Config;

/// Similarity oracle names understood by the CLI.
const KNOWN_SIMILARITY: &[&str] = &["exact", "token-overlap", "token_overlap", "jaccard"];

/// Scoring policy names understood by the CLI.
const KNOWN_SCORING: &[&str] = &[
    "recent-delta",
    "recent_delta",
    "total-volume",
    "total_volume",
    "total",
];

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// The similarity threshold is outside (0, 1].
    ThresholdOutOfRange {
        /// The configured threshold.
        value: f64,
    },
    /// The similarity oracle name is not a built-in.
    UnknownSimilarity {
        /// The configured name.
        value: String,
    },
    /// The scoring policy name is not a built-in.
    UnknownScoring {
        /// The configured name.
        value: String,
    },
    /// The configured seed file does not exist.
    SeedFileMissing {
        /// The configured path.
        path: String,
    },
    /// An inline seed has an empty name.
    EmptySeedName,
    /// Two inline seeds share a name.
    DuplicateSeedName {
        /// The duplicated name.
        name: String,
    },
    /// Lookback of zero restricts analysis to the target day only.
    ZeroLookback,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdOutOfRange { value } => {
                write!(f, "threshold {value} is outside (0, 1]")
            }
            Self::UnknownSimilarity { value } => {
                write!(f, "unknown similarity oracle '{value}'")
            }
            Self::UnknownScoring { value } => {
                write!(f, "unknown scoring policy '{value}'")
            }
            Self::SeedFileMissing { path } => {
                write!(f, "seed file does not exist: {path}")
            }
            Self::EmptySeedName => {
                write!(f, "a seed category has an empty name")
            }
            Self::DuplicateSeedName { name } => {
                write!(f, "duplicate seed category name: {name}")
            }
            Self::ZeroLookback => {
                write!(f, "lookback_days is 0; only the target day will be analyzed")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let threshold = config.settings.threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        warnings.push(ConfigWarning::ThresholdOutOfRange { value: threshold });
    }

    if !KNOWN_SIMILARITY.contains(&config.settings.similarity.to_lowercase().as_str()) {
        warnings.push(ConfigWarning::UnknownSimilarity {
            value: config.settings.similarity.clone(),
        });
    }

    if !KNOWN_SCORING.contains(&config.trend.scoring.to_lowercase().as_str()) {
        warnings.push(ConfigWarning::UnknownScoring {
            value: config.trend.scoring.clone(),
        });
    }

    if config.settings.lookback_days == 0 {
        warnings.push(ConfigWarning::ZeroLookback);
    }

    if let Some(ref path) = config.taxonomy.path
        && !path.exists()
    {
        warnings.push(ConfigWarning::SeedFileMissing {
            path: path.display().to_string(),
        });
    }

    warnings.extend(validate_seeds(config));

    warnings
}

/// Checks inline seed definitions for empty and duplicate names.
fn validate_seeds(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for seed in &config.taxonomy.seeds {
        if seed.name.trim().is_empty() {
            warnings.push(ConfigWarning::EmptySeedName);
            continue;
        }
        if !seen.insert(seed.name.as_str()) {
            warnings.push(ConfigWarning::DuplicateSeedName {
                name: seed.name.clone(),
            });
        }
    }

    warnings
}
