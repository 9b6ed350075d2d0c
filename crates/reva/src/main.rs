//! Command-line interface for the `reva` review trend analysis tool.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{
    args::{Cli, Commands},
    commands,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(cmd) => commands::analyze::run(&cmd),
        Commands::Inspect(cmd) => commands::inspect::run(&cmd),
        Commands::Init(cmd) => commands::init::run(&cmd),
        Commands::Check => commands::check::run(),
    }
}
