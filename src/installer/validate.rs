//! Plan validation
//!
//! Collects every problem in one pass instead of failing fast, so the
//! user sees all of them at once. An empty error list means the plan is
//! safe to execute.

use std::path::{Path, PathBuf};

use crate::planner::{InstallPlan, InstallStep};

/// Validate a plan against the current file system
///
/// Checks write permission on the nearest existing ancestor of every step
/// target (one error per unwritable target) and source existence for every
/// copy step. Performs no mutation.
pub fn validate_install_plan(plan: &InstallPlan) -> Vec<String> {
    let mut errors = Vec::new();

    for step in plan.copy_steps() {
        if let InstallStep::CopyFile { source, .. } = step {
            if !source.is_file() {
                errors.push(format!(
                    "source file missing for '{}': {}",
                    step.component_id(),
                    source.display()
                ));
            }
        }
    }

    for step in &plan.steps {
        let probe = match step {
            InstallStep::CreateDir { target, .. } => target.clone(),
            InstallStep::CopyFile { target, .. }
            | InstallStep::SetPermissions { target, .. } => target
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| target.clone()),
        };

        if let Some(ancestor) = nearest_existing_ancestor(&probe) {
            if !is_writable(&ancestor) {
                errors.push(format!(
                    "target not writable: {} (blocked at {})",
                    step.target().display(),
                    ancestor.display()
                ));
            }
        }
    }

    errors
}

/// Walk up from `path` to the first component that exists on disk
fn nearest_existing_ancestor(path: &Path) -> Option<PathBuf> {
    let mut current = Some(path);
    while let Some(candidate) = current {
        if candidate.exists() {
            return Some(candidate.to_path_buf());
        }
        current = candidate.parent();
    }
    None
}

fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}
