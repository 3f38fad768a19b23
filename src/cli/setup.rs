use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::planner::InstallTarget;

/// Install destination on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TargetArg {
    #[default]
    Project,
    User,
    Both,
}

impl From<TargetArg> for InstallTarget {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Project => InstallTarget::Project,
            TargetArg::User => InstallTarget::User,
            TargetArg::Both => InstallTarget::Both,
        }
    }
}

/// Arguments for the setup command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install the recommended set for this project:\n    claudekit setup\n\n\
                   Install specific components with their dependencies:\n    claudekit setup typecheck-changed lint-changed\n\n\
                   Install everything for both targets:\n    claudekit setup --all --target both\n\n\
                   Preview without changing anything:\n    claudekit setup --all --dry-run")]
pub struct SetupArgs {
    /// Component ids to install. Empty selects the recommended set
    pub components: Vec<String>,

    /// Install destination
    #[arg(long, short = 't', value_enum, default_value = "project")]
    pub target: TargetArg,

    /// Select every enabled component
    #[arg(long)]
    pub all: bool,

    /// Do not auto-include missing dependencies
    #[arg(long = "no-deps")]
    pub no_deps: bool,

    /// Show what would be installed without actually installing
    #[arg(long)]
    pub dry_run: bool,

    /// Continue past validation errors and overwrite differing settings
    #[arg(long)]
    pub force: bool,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Fail instead of prompting when existing settings differ
    #[arg(long)]
    pub non_interactive: bool,

    /// Skip the settings.json merge after installing
    #[arg(long)]
    pub skip_settings: bool,

    /// Override the per-user profile directory (default ~/.claude)
    #[arg(long, value_name = "DIR")]
    pub user_dir: Option<PathBuf>,
}
