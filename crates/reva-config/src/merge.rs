//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules.

use std::path::{Path, PathBuf};

use crate::{
    Config, SeedSetting, Settings, TaxonomySettings, TrendSettings,
    parse::{RawConfig, RawSettings, RawTrendSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first
/// (closest to CWD), lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Taxonomy: the first config that defines a `[taxonomy]` section wins as
///   a whole; seed lists from different files are never combined, so a
///   project config fully replaces the global seed set rather than mixing
///   with it
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let settings = merge_settings(configs);
    let trend = merge_trend_settings(configs);
    let taxonomy = merge_taxonomy(configs);
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);

    Config {
        settings,
        trend,
        taxonomy,
        config_root,
    }
}

/// Merges general settings, taking first defined value for each field.
fn merge_settings(configs: &[ParsedConfig]) -> Settings {
    let mut result = Settings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence
    // overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref settings) = parsed.config.settings {
            apply_raw_settings(&mut result, settings);
        }
    }

    result
}

/// Applies raw settings to result, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(v) = raw.threshold {
        result.threshold = v;
    }
    if let Some(ref v) = raw.similarity {
        result.similarity = v.clone();
    }
    if let Some(v) = raw.lookback_days {
        result.lookback_days = v;
    }
    if let Some(v) = raw.top {
        result.top = v;
    }
}

/// Merges trend settings.
fn merge_trend_settings(configs: &[ParsedConfig]) -> TrendSettings {
    let mut result = TrendSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref trend) = parsed.config.trend {
            apply_raw_trend(&mut result, trend);
        }
    }

    result
}

/// Applies raw trend settings to result.
fn apply_raw_trend(result: &mut TrendSettings, raw: &RawTrendSettings) {
    if let Some(ref v) = raw.scoring {
        result.scoring = v.clone();
    }
    if let Some(v) = raw.recent_days {
        result.recent_days = v;
    }
    if let Some(v) = raw.older_days {
        result.older_days = v;
    }
    if let Some(v) = raw.growth_threshold {
        result.growth_threshold = v;
    }
    if let Some(v) = raw.min_new_volume {
        result.min_new_volume = v;
    }
}

/// Takes the highest-precedence taxonomy section as a whole.
fn merge_taxonomy(configs: &[ParsedConfig]) -> TaxonomySettings {
    for parsed in configs {
        let Some(ref taxonomy) = parsed.config.taxonomy else {
            continue;
        };

        let path = taxonomy.path.as_ref().map(|p| {
            let path = PathBuf::from(p);
            if path.is_relative() {
                // Relative seed paths resolve next to the config that
                // declared them.
                parsed
                    .path
                    .parent()
                    .map_or_else(|| path.clone(), |dir| dir.join(&path))
            } else {
                path
            }
        });

        let seeds = taxonomy
            .seed
            .as_ref()
            .map(|seeds| {
                seeds
                    .iter()
                    .map(|s| SeedSetting {
                        name: s.name.clone(),
                        aliases: s.aliases.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        return TaxonomySettings { path, seeds };
    }

    TaxonomySettings::default()
}
