//! Configuration system for reva.
//!
//! reva uses TOML configuration files named `.reva.toml`. Configuration is
//! resolved by walking up the directory tree from the current working
//! directory, collecting any `.reva.toml` files found, then loading
//! `~/.reva.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawSeed, RawSettings, RawTaxonomy, RawTrendSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default similarity threshold for consolidation.
pub const DEFAULT_THRESHOLD: f64 = 0.6;
/// Default similarity oracle name.
pub const DEFAULT_SIMILARITY: &str = "token-overlap";
/// Default lookback period in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
/// Default number of top categories to display.
pub const DEFAULT_TOP: usize = 10;
/// Default scoring policy name.
pub const DEFAULT_SCORING: &str = "recent-delta";
/// Default recent span for emerging-topic detection, in days.
pub const DEFAULT_RECENT_DAYS: u32 = 7;
/// Default older comparison span for emerging-topic detection, in days.
pub const DEFAULT_OLDER_DAYS: u32 = 23;
/// Default minimum growth rate for emerging topics.
pub const DEFAULT_GROWTH_THRESHOLD: f64 = 0.5;
/// Default minimum recent volume for brand-new emerging topics.
pub const DEFAULT_MIN_NEW_VOLUME: u64 = 3;

/// Top-level merged configuration for reva.
///
/// This represents the fully resolved configuration after merging all
/// discovered `.reva.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Trend analysis settings.
    pub trend: TrendSettings,
    /// Seed taxonomy settings.
    pub taxonomy: TaxonomySettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant
    /// `.reva.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.reva.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.reva.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence
    /// first. This is primarily useful for testing.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - Threshold outside (0, 1]
    /// - Unknown similarity oracle or scoring policy names
    /// - A seed file path that doesn't exist
    /// - Empty or duplicate inline seed names
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// This outputs the merged configuration settings in the same format as
    /// a `.reva.toml` file, making it easy to see the effective
    /// configuration. The taxonomy is not included since it may come from an
    /// external file.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            settings: self.settings.clone(),
            trend: self.trend.clone(),
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// General settings for reva.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Similarity threshold for consolidation, in (0, 1].
    pub threshold: f64,
    /// Similarity oracle name.
    pub similarity: String,
    /// Days of history to analyze before the target date.
    pub lookback_days: u32,
    /// Number of top categories to display.
    pub top: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            similarity: String::from(DEFAULT_SIMILARITY),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            top: DEFAULT_TOP,
        }
    }
}

/// Trend analysis settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Scoring policy name.
    pub scoring: String,
    /// Days in the recent span for emerging-topic detection.
    pub recent_days: u32,
    /// Days in the older comparison span.
    pub older_days: u32,
    /// Minimum growth rate over the older span.
    pub growth_threshold: f64,
    /// Minimum recent volume for categories with no older history.
    pub min_new_volume: u64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            scoring: String::from(DEFAULT_SCORING),
            recent_days: DEFAULT_RECENT_DAYS,
            older_days: DEFAULT_OLDER_DAYS,
            growth_threshold: DEFAULT_GROWTH_THRESHOLD,
            min_new_volume: DEFAULT_MIN_NEW_VOLUME,
        }
    }
}

/// Seed taxonomy settings.
#[derive(Debug, Clone, Default)]
pub struct TaxonomySettings {
    /// Path to a JSON seed file, if configured.
    pub path: Option<PathBuf>,
    /// Inline seed definitions.
    pub seeds: Vec<SeedSetting>,
}

/// One inline seed category definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSetting {
    /// Canonical category name.
    pub name: String,
    /// Alias phrases.
    pub aliases: Vec<String>,
}

/// Settings subset serialized by `settings_to_toml`.
#[derive(Serialize)]
struct SerializableSettings {
    /// General settings section.
    settings: Settings,
    /// Trend settings section.
    trend: TrendSettings,
}
