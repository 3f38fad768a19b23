//! claudekit - Claude Code component manager
//!
//! Discovers hooks, commands and agents in a component source tree,
//! resolves their dependencies, and installs them into a project and/or
//! the per-user profile with transactional execution and settings merging.

use clap::Parser;

mod cli;
mod commands;
mod error;
mod hash;
mod installer;
mod paths;
mod planner;
mod progress;
mod project;
mod registry;
mod resolver;
mod settings;
mod transaction;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup(args) => commands::setup::run(cli.project, cli.source, cli.verbose, args),
        Commands::List(args) => commands::list::run(cli.project, cli.source, cli.verbose, args),
        Commands::Show(args) => commands::show::run(cli.project, cli.source, cli.verbose, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
