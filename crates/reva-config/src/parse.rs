//! Configuration file parsing.
//!
//! Parses individual `.reva.toml` files into intermediate `RawConfig`
//! structures that preserve the optional nature of all fields before
//! merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Trend analysis settings section.
    pub trend: Option<RawTrendSettings>,
    /// Seed taxonomy section.
    pub taxonomy: Option<RawTaxonomy>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Similarity threshold for consolidation, in (0, 1].
    pub threshold: Option<f64>,
    /// Similarity oracle name ("exact", "token-overlap").
    pub similarity: Option<String>,
    /// Days of history to analyze before the target date.
    pub lookback_days: Option<u32>,
    /// Number of top categories to display.
    pub top: Option<usize>,
}

/// Raw trend settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTrendSettings {
    /// Scoring policy name ("recent-delta", "total-volume").
    pub scoring: Option<String>,
    /// Days in the recent span for emerging-topic detection.
    pub recent_days: Option<u32>,
    /// Days in the older comparison span.
    pub older_days: Option<u32>,
    /// Minimum growth rate over the older span.
    pub growth_threshold: Option<f64>,
    /// Minimum recent volume for categories with no older history.
    pub min_new_volume: Option<u64>,
}

/// Raw seed taxonomy section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTaxonomy {
    /// Path to a JSON seed file.
    pub path: Option<String>,
    /// Inline seed definitions.
    pub seed: Option<Vec<RawSeed>>,
}

/// One inline seed category from TOML.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct RawSeed {
    /// Canonical category name.
    pub name: String,
    /// Alias phrase(s). Accepts either a single string or an array.
    #[serde(default)]
    #[serde_as(as = "OneOrMany<_>")]
    pub aliases: Vec<String>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks whether a config file sets `root = true`.
///
/// Unreadable or unparseable files are treated as non-root; the parse error
/// surfaces later when the file is actually loaded.
pub(crate) fn is_root_config(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| toml::from_str::<RawConfig>(&contents).ok())
        .and_then(|config| config.root)
        .unwrap_or(false)
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.settings.is_none());
        assert!(config.trend.is_none());
        assert!(config.taxonomy.is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
            [settings]
            threshold = 0.7
            similarity = "exact"
            lookback_days = 14
            top = 5

            [trend]
            scoring = "total-volume"
            recent_days = 3
            older_days = 11
            growth_threshold = 0.25
            min_new_volume = 2

            [taxonomy]
            path = "seeds.json"

            [[taxonomy.seed]]
            name = "App crashes"
            aliases = ["crash", "crashes on login"]
            "#,
        )
        .unwrap();

        let settings = config.settings.unwrap();
        assert_eq!(settings.threshold, Some(0.7));
        assert_eq!(settings.similarity.as_deref(), Some("exact"));
        assert_eq!(settings.lookback_days, Some(14));
        assert_eq!(settings.top, Some(5));

        let trend = config.trend.unwrap();
        assert_eq!(trend.scoring.as_deref(), Some("total-volume"));
        assert_eq!(trend.min_new_volume, Some(2));

        let taxonomy = config.taxonomy.unwrap();
        assert_eq!(taxonomy.path.as_deref(), Some("seeds.json"));
        let seeds = taxonomy.seed.unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].name, "App crashes");
        assert_eq!(seeds[0].aliases, vec!["crash", "crashes on login"]);
    }

    #[test]
    fn seed_alias_accepts_single_string() {
        let config = parse_config(
            r#"
            [[taxonomy.seed]]
            name = "Payment failed"
            aliases = "payment error"
            "#,
        )
        .unwrap();

        let seeds = config.taxonomy.unwrap().seed.unwrap();
        assert_eq!(seeds[0].aliases, vec!["payment error"]);
    }

    #[test]
    fn seed_aliases_default_to_empty() {
        let config = parse_config(
            r#"
            [[taxonomy.seed]]
            name = "Late delivery"
            "#,
        )
        .unwrap();

        let seeds = config.taxonomy.unwrap().seed.unwrap();
        assert!(seeds[0].aliases.is_empty());
    }

    #[test]
    fn parse_rejects_malformed_toml() {
        assert!(parse_config("[settings\nthreshold = ").is_err());
    }

    #[test]
    fn parse_config_file_reports_missing_file() {
        let result = parse_config_file(Path::new("/nonexistent/.reva.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
