//! The `reva check` command: validate configuration and diagnose issues.

use std::{env, process::ExitCode};

use reva_config::{Config, ConfigWarning, discover_config_files};

/// Exit codes for `reva check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Discovers, loads, and validates configuration, reporting what it finds.
pub fn run() -> ExitCode {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("error: could not determine current directory: {e}");
            return exit_codes::ERROR;
        }
    };

    let config_files = discover_config_files(&cwd);

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found; defaults apply.");
        println!();
        println!("Run 'reva init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("Config files (highest precedence first):");
    for path in &config_files {
        println!("  {}", path.display());
    }
    println!();

    let config = match Config::load(&cwd) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };

    println!("Effective settings:");
    for line in config.settings_to_toml().lines() {
        println!("  {line}");
    }
    println!();

    print_taxonomy_summary(&config);
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("Warnings ({}):", warnings.len());
    for warning in &warnings {
        println!("  - {warning}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Summarizes where seed categories come from.
fn print_taxonomy_summary(config: &Config) {
    println!("Seed taxonomy:");
    match config.taxonomy.path {
        Some(ref path) => {
            let status = if path.exists() { "ok" } else { "missing" };
            println!("  file [{status}] -> {}", path.display());
        }
        None => println!("  file: (none configured)"),
    }
    if config.taxonomy.seeds.is_empty() {
        println!("  inline seeds: (none; built-in defaults apply when no file is set)");
    } else {
        println!("  inline seeds: {}", config.taxonomy.seeds.len());
    }
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints = Vec::new();

    for warning in warnings {
        match warning {
            ConfigWarning::ThresholdOutOfRange { .. } => {
                hints.push("Set threshold to a value greater than 0 and at most 1.");
            }
            ConfigWarning::UnknownSimilarity { .. } => {
                hints.push("Use one of the built-in oracles: token-overlap, exact.");
            }
            ConfigWarning::UnknownScoring { .. } => {
                hints.push("Use one of the built-in policies: recent-delta, total-volume.");
            }
            ConfigWarning::SeedFileMissing { .. } => {
                hints.push("Create the seed file or update the taxonomy path.");
            }
            ConfigWarning::EmptySeedName | ConfigWarning::DuplicateSeedName { .. } => {
                hints.push("Give every inline seed a unique, non-empty name.");
            }
            ConfigWarning::ZeroLookback => {
                hints.push("Increase lookback_days to analyze more than the target day.");
            }
        }
    }

    // Deduplicate hints
    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
