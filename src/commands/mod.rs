//! Command implementations for the claudekit CLI

pub mod completions;
pub mod list;
pub mod setup;
pub mod show;
pub mod version;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::registry::{self, Registry};

/// Default component source tree relative to the working directory
const DEFAULT_SOURCE: &str = "components";

/// Resolve the project directory argument
pub fn project_dir(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

/// Resolve the component source tree argument
pub fn source_dir(source: Option<PathBuf>) -> PathBuf {
    source.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE))
}

/// Discover the source tree, reporting skipped files when verbose
pub fn discover_registry(source: &Path, verbose: bool) -> Result<Registry> {
    let registry = registry::discover(source)?;

    if verbose {
        for skipped in &registry.skipped {
            eprintln!(
                "warning: skipped {}: {}",
                skipped.path.display(),
                skipped.reason
            );
        }
    }

    Ok(registry)
}
