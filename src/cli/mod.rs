//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument
//! types:
//! - setup: Setup command arguments
//! - list: List command arguments
//! - show: Show command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod list;
pub mod setup;
pub mod show;

pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use setup::SetupArgs;
pub use show::ShowArgs;

/// claudekit - Claude Code component manager
///
/// Install hooks, commands and agents into a project or user profile with
/// dependency resolution and transactional execution.
#[derive(Parser, Debug)]
#[command(
    name = "claudekit",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Component manager for Claude Code",
    long_about = "claudekit discovers hooks, commands and agents in a component source tree, \
                  resolves their dependencies, and installs them into a project-local .claude/ \
                  directory and/or the per-user ~/.claude profile, keeping settings.json in sync.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  claudekit setup                          \x1b[90m# Install recommended components\x1b[0m\n   \
                  claudekit setup typecheck-changed        \x1b[90m# Install one component (plus deps)\x1b[0m\n   \
                  claudekit setup --all --target both      \x1b[90m# Everything, project and user\x1b[0m\n   \
                  claudekit setup --dry-run                \x1b[90m# Show the plan without changes\x1b[0m\n   \
                  claudekit list --category validation     \x1b[90m# Browse the catalog\x1b[0m\n   \
                  claudekit show typecheck-changed         \x1b[90m# Component details and deps\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "CLAUDEKIT_PROJECT")]
    pub project: Option<PathBuf>,

    /// Component source tree (defaults to ./components)
    #[arg(long, short = 's', global = true, env = "CLAUDEKIT_SOURCE")]
    pub source: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install components into a project and/or the user profile
    Setup(SetupArgs),

    /// List discovered components
    List(ListArgs),

    /// Show component information and its dependency tree
    Show(ShowArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
