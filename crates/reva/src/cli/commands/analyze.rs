//! The `reva analyze` command: consolidate a batch of extraction records
//! and rank category trends.

use std::{env, fs, process::ExitCode};

use reva_config::Config;
use reva_consolidate::{
    SeedCategory, SeedTaxonomy, SimilarityKind, consolidate, load_records,
    mentions_from_records, topic_mapping,
};
use reva_trend::{EmergingPolicy, ScoringKind, analyze, daily_windows, emerging_topics};

use crate::cli::{args::AnalyzeCommand, output};

/// Built-in seed categories used when no taxonomy is configured anywhere.
///
/// Tuned for food-delivery apps, the original deployment target; supply a
/// seed file or inline seeds to analyze anything else.
const DEFAULT_SEED_TOPICS: &[&str] = &[
    "Delivery issue",
    "Food stale",
    "Food cold",
    "Delivery partner rude",
    "Wrong order delivered",
    "Maps not working properly",
    "App crashes",
    "Payment failed",
    "Refund not received",
    "Customer support unresponsive",
    "Late delivery",
    "Missing items",
    "Food quality poor",
    "Packaging damaged",
];

/// Runs the full pipeline: load records, consolidate, analyze, report.
pub fn run(cmd: &AnalyzeCommand) -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(code) => return code,
    };

    // CLI flags override configuration, configuration overrides defaults.
    let threshold = cmd.threshold.unwrap_or(config.settings.threshold);
    let lookback = cmd.lookback.unwrap_or(config.settings.lookback_days);
    let top = cmd.top.unwrap_or(config.settings.top);

    let similarity = match resolve_similarity(cmd, &config) {
        Ok(kind) => kind,
        Err(code) => return code,
    };
    let scoring = match resolve_scoring(cmd, &config) {
        Ok(kind) => kind,
        Err(code) => return code,
    };
    let seeds = match resolve_taxonomy(cmd, &config) {
        Ok(seeds) => seeds,
        Err(code) => return code,
    };

    let records = match load_records(&cmd.input) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mentions = mentions_from_records(&records);
    let mention_count = mentions.len();

    let oracle = similarity.build();
    let assignments = match consolidate(mentions, &seeds, oracle.as_ref(), threshold) {
        Ok(assignments) => assignments,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let windows = daily_windows(cmd.target_date, lookback);
    let policy = scoring.build();
    let reports = match analyze(&assignments, &windows, policy.as_ref()) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let emerging_policy = EmergingPolicy {
        recent_days: config.trend.recent_days,
        older_days: config.trend.older_days,
        growth_threshold: config.trend.growth_threshold,
        min_new_volume: config.trend.min_new_volume,
    };
    let emerging = emerging_topics(&assignments, cmd.target_date, &emerging_policy);

    // Optional file outputs apply in both output modes.
    if let Some(ref path) = cmd.csv {
        let csv = output::trend_csv(&reports, &windows);
        if let Err(e) = fs::write(path, csv) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }
    if let Some(ref path) = cmd.mapping {
        let mapping = topic_mapping(&assignments);
        let json = match serde_json::to_string_pretty(&mapping) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("error: failed to serialize mapping: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(path, json) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    if cmd.json {
        let doc = output::AnalysisJson {
            target_date: cmd.target_date.format("%Y-%m-%d").to_string(),
            lookback_days: lookback,
            reviews: records.len(),
            mentions: mention_count,
            categories: assignments.len(),
            reports: &reports,
            emerging: &emerging,
        };
        match serde_json::to_string_pretty(&doc) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    print_summary(cmd, records.len(), mention_count, &assignments, lookback);
    println!();
    println!("Top categories:");
    println!("{}", output::report_table(&reports, top));

    println!();
    if emerging.is_empty() {
        println!("Emerging topics: (none)");
    } else {
        println!("Emerging topics:");
        println!("{}", output::emerging_table(&emerging));
    }

    if let Some(ref path) = cmd.csv {
        println!();
        println!("Trend matrix written to {}", path.display());
    }
    if let Some(ref path) = cmd.mapping {
        println!("Topic mapping written to {}", path.display());
    }

    ExitCode::SUCCESS
}

/// Prints the run header: what was analyzed over which period.
fn print_summary(
    cmd: &AnalyzeCommand,
    reviews: usize,
    mentions: usize,
    assignments: &[reva_consolidate::CategoryAssignment],
    lookback: u32,
) {
    let seed_count = assignments.iter().filter(|a| a.seed_derived).count();
    let novel_count = assignments.len() - seed_count;

    println!(
        "Analyzed {reviews} reviews / {mentions} mentions (target {}, lookback {lookback} days)",
        cmd.target_date.format("%Y-%m-%d")
    );
    println!(
        "{} categories ({seed_count} seed-anchored, {novel_count} novel)",
        assignments.len()
    );
}

/// Loads configuration from the current directory.
fn load_config() -> Result<Config, ExitCode> {
    let cwd = env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })?;
    Config::load(&cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

/// Picks the similarity oracle: CLI flag first, then configuration.
fn resolve_similarity(cmd: &AnalyzeCommand, config: &Config) -> Result<SimilarityKind, ExitCode> {
    if let Some(kind) = cmd.similarity {
        return Ok(kind);
    }
    config.settings.similarity.parse().map_err(|e| {
        eprintln!("error: invalid similarity in configuration: {e}");
        ExitCode::FAILURE
    })
}

/// Picks the scoring policy: CLI flag first, then configuration.
fn resolve_scoring(cmd: &AnalyzeCommand, config: &Config) -> Result<ScoringKind, ExitCode> {
    if let Some(kind) = cmd.scoring {
        return Ok(kind);
    }
    config.trend.scoring.parse().map_err(|e| {
        eprintln!("error: invalid scoring in configuration: {e}");
        ExitCode::FAILURE
    })
}

/// Builds the seed taxonomy for this run.
///
/// Precedence: an explicit `--seeds` file wins outright; otherwise the
/// configured seed file and inline seeds are combined; with no seeds
/// configured anywhere, the built-in defaults apply.
fn resolve_taxonomy(cmd: &AnalyzeCommand, config: &Config) -> Result<SeedTaxonomy, ExitCode> {
    if let Some(ref path) = cmd.seeds {
        return SeedTaxonomy::load(path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        });
    }

    let mut categories = Vec::new();

    if let Some(ref path) = config.taxonomy.path {
        let loaded = SeedTaxonomy::load(path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        categories.extend(loaded.categories);
    }

    for seed in &config.taxonomy.seeds {
        categories.push(SeedCategory::with_aliases(
            seed.name.clone(),
            seed.aliases.clone(),
        ));
    }

    if categories.is_empty() {
        categories = DEFAULT_SEED_TOPICS
            .iter()
            .map(|name| SeedCategory::new(*name))
            .collect();
    }

    Ok(SeedTaxonomy::new(categories))
}
