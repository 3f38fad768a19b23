//! Install root locations and home-directory expansion
//!
//! Components land under a project-local `.claude/` directory, a per-user
//! `~/.claude/` profile, or both. The `~` shorthand is expanded during
//! planning, never later.

use std::path::{Path, PathBuf};

use crate::error::{ClaudekitError, Result};

/// Directory name of the host tool's configuration tree
pub const CLAUDE_DIR: &str = ".claude";

/// Settings document file name inside a configuration tree
pub const SETTINGS_FILE: &str = "settings.json";

/// Project-local configuration directory for a project root
pub fn project_claude_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(CLAUDE_DIR)
}

/// Per-user configuration directory (`~/.claude`)
pub fn user_claude_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CLAUDE_DIR))
        .ok_or(ClaudekitError::HomeDirNotFound)
}

/// Expand a leading `~` or `~/` to the user home directory
///
/// Paths without the shorthand are returned unchanged.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let Some(s) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    if s == "~" {
        return dirs::home_dir().ok_or(ClaudekitError::HomeDirNotFound);
    }

    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ClaudekitError::HomeDirNotFound)?;
        return Ok(home.join(rest));
    }

    Ok(path.to_path_buf())
}
