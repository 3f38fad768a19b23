//! Installer and executor
//!
//! Orchestrates plan → validate → execute with progress reporting.
//! Execution is transactional: a failed step rolls every prior step back,
//! so a partial install is never a supported end state. Re-running the
//! same installation is idempotent; unchanged files are reported no-ops.

use std::path::PathBuf;

use crate::error::Result;
use crate::planner::{self, InstallPlan, InstallTarget, Installation};
use crate::progress::{Phase, ProgressSink, ProgressUpdate};
use crate::project::ProjectInfo;
use crate::registry::Registry;

mod execute;
mod validate;

pub use execute::execute_plan;
pub use validate::validate_install_plan;

/// Options controlling one install run
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Replay steps through the progress channel without touching the
    /// file system
    pub dry_run: bool,
    /// Downgrade validation errors to warnings and execute anyway
    pub force: bool,
}

/// Record of a file backed up before being overwritten
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
    /// Unix seconds at backup time (also encoded in the backup file name)
    #[allow(dead_code)]
    pub timestamp: u64,
    /// BLAKE3 hash of the backed-up content
    pub content_hash: String,
}

/// Outcome of an install run
///
/// `success == false` always carries at least one entry in `errors`.
#[derive(Debug, Clone, Default)]
pub struct InstallResult {
    pub success: bool,
    /// Component ids whose files were written
    pub installed: Vec<String>,
    /// Component ids whose copies were no-ops (target already identical)
    pub skipped: Vec<String>,
    pub backups: Vec<BackupInfo>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Plan, validate and execute an installation
///
/// Validation errors fail the run before any mutation unless `force` is
/// set, in which case they are downgraded to warnings. With `dry_run` the
/// steps are replayed through the same progress phases without mutation.
pub fn install(
    installation: &Installation,
    registry: &Registry,
    project: &ProjectInfo,
    options: &InstallOptions,
    sink: &mut dyn ProgressSink,
) -> Result<InstallResult> {
    sink.update(&ProgressUpdate::phase_only(Phase::Planning, 0));
    let mut plan = planner::create_install_plan(installation, registry, project)?;

    sink.update(&ProgressUpdate::phase_only(Phase::Validating, plan.steps.len()));
    let validation_errors = validate_install_plan(&plan);
    if !validation_errors.is_empty() {
        if options.force {
            plan.warnings.extend(validation_errors);
        } else {
            sink.update(&ProgressUpdate::phase_only(Phase::Failed, plan.steps.len()));
            return Ok(InstallResult {
                success: false,
                warnings: plan.warnings,
                errors: validation_errors,
                ..InstallResult::default()
            });
        }
    }

    if options.dry_run {
        return Ok(replay_steps(&plan, sink));
    }

    Ok(execute_plan(&plan, sink))
}

/// Dry-run a plan through the full progress sequence
///
/// Emits the same `planning`/`validating`/`installing`/`complete` phases a
/// real run would, so tooling built on progress events behaves identically
/// in both modes. No file-system mutation. The CLI reaches this through
/// `install` with `dry_run`; callers holding a plan can invoke it directly.
#[allow(dead_code)]
pub fn simulate_installation(plan: &InstallPlan, sink: &mut dyn ProgressSink) -> InstallResult {
    sink.update(&ProgressUpdate::phase_only(Phase::Planning, plan.steps.len()));
    sink.update(&ProgressUpdate::phase_only(Phase::Validating, plan.steps.len()));
    replay_steps(plan, sink)
}

fn replay_steps(plan: &InstallPlan, sink: &mut dyn ProgressSink) -> InstallResult {
    let total = plan.steps.len();

    sink.update(&ProgressUpdate::phase_only(Phase::Installing, total));
    for (index, step) in plan.steps.iter().enumerate() {
        sink.update(&ProgressUpdate {
            phase: Phase::Installing,
            current: index + 1,
            total,
            component_id: Some(step.component_id().to_string()),
        });
    }
    sink.update(&ProgressUpdate {
        phase: Phase::Complete,
        current: total,
        total,
        component_id: None,
    });

    InstallResult {
        success: true,
        installed: plan.components.iter().map(|c| c.id.clone()).collect(),
        warnings: plan.warnings.clone(),
        ..InstallResult::default()
    }
}

/// Build the default installation for a project
///
/// Unions universally recommended components with components recommended
/// for the detected capabilities, then hands the result to the same
/// planning/validation/execution pipeline as any explicit selection.
pub fn create_default_installation(
    registry: &Registry,
    project: &ProjectInfo,
    target: InstallTarget,
) -> Installation {
    let ids = planner::recommend::recommended_for_project(project, registry);
    Installation::new(ids, target, project.root.clone())
}
