//! Step execution with rollback
//!
//! Steps apply strictly in plan order; every mutation is recorded in a
//! function-local [`Transaction`] before the next step runs. Any failure
//! unwinds the log and reports the run as failed — the file system ends
//! fully installed or exactly as it was found.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ClaudekitError, Result};
use crate::hash;
use crate::installer::{BackupInfo, InstallResult};
use crate::planner::{InstallPlan, InstallStep};
use crate::progress::{Phase, ProgressSink, ProgressUpdate};
use crate::transaction::{Applied, Transaction};

/// Execute all steps of a plan against the file system
pub fn execute_plan(plan: &InstallPlan, sink: &mut dyn ProgressSink) -> InstallResult {
    let total = plan.steps.len();
    let mut result = InstallResult {
        warnings: plan.warnings.clone(),
        ..InstallResult::default()
    };
    let mut tx = Transaction::new();

    sink.update(&ProgressUpdate::phase_only(Phase::Installing, total));

    for (index, step) in plan.steps.iter().enumerate() {
        match apply_step(step, &mut tx, &mut result) {
            Ok(()) => sink.update(&ProgressUpdate {
                phase: Phase::Installing,
                current: index + 1,
                total,
                component_id: Some(step.component_id().to_string()),
            }),
            Err(e) => {
                sink.update(&ProgressUpdate::phase_only(Phase::RollingBack, total));
                tx.rollback();
                sink.update(&ProgressUpdate::phase_only(Phase::Failed, total));

                result.success = false;
                result.installed.clear();
                result.skipped.clear();
                result.backups.clear();
                result.errors.push(e.to_string());
                return result;
            }
        }
    }

    tx.commit();
    sink.update(&ProgressUpdate {
        phase: Phase::Complete,
        current: total,
        total,
        component_id: None,
    });

    result.success = true;
    result
}

fn apply_step(
    step: &InstallStep,
    tx: &mut Transaction,
    result: &mut InstallResult,
) -> Result<()> {
    match step {
        InstallStep::CreateDir { target, .. } => create_dir_tracked(target, tx),
        InstallStep::CopyFile {
            source,
            target,
            component_id,
        } => copy_file_tracked(source, target, component_id, tx, result),
        InstallStep::SetPermissions {
            target,
            mode,
            component_id,
        } => set_permissions_tracked(target, *mode, component_id, tx),
    }
}

/// Create a directory, tracking every path component that did not exist
fn create_dir_tracked(target: &Path, tx: &mut Transaction) -> Result<()> {
    if target.is_dir() {
        return Ok(());
    }

    let mut missing: Vec<PathBuf> = Vec::new();
    let mut current = Some(target);
    while let Some(candidate) = current {
        if candidate.exists() {
            break;
        }
        missing.push(candidate.to_path_buf());
        current = candidate.parent();
    }

    fs::create_dir_all(target).map_err(|e| ClaudekitError::FileWriteFailed {
        path: target.display().to_string(),
        reason: e.to_string(),
    })?;

    // Shallowest first, so rollback (reverse) removes deepest first
    for dir in missing.into_iter().rev() {
        tx.track_dir_created(dir);
    }

    Ok(())
}

fn copy_file_tracked(
    source: &Path,
    target: &Path,
    component_id: &str,
    tx: &mut Transaction,
    result: &mut InstallResult,
) -> Result<()> {
    let step_failed = |reason: String| ClaudekitError::StepFailed {
        component_id: component_id.to_string(),
        reason,
    };

    if target.exists() {
        // Identical content: reported as a completed step, nothing to undo
        if hash::files_identical(source, target) {
            push_unique(&mut result.skipped, component_id);
            return Ok(());
        }

        let original = fs::read(target).map_err(|e| step_failed(e.to_string()))?;
        let backup = write_backup(target, &original).map_err(|e| step_failed(e.to_string()))?;

        fs::copy(source, target).map_err(|e| step_failed(e.to_string()))?;

        tx.track(Applied::FileOverwritten {
            path: target.to_path_buf(),
            original,
            backup: Some(backup.backup_path.clone()),
        });
        result.backups.push(backup);
        push_unique(&mut result.installed, component_id);
        return Ok(());
    }

    fs::copy(source, target).map_err(|e| step_failed(e.to_string()))?;
    tx.track_file_created(target);
    push_unique(&mut result.installed, component_id);
    Ok(())
}

/// Components are recorded once even when a `both`-target plan copies
/// their file under two roots
fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

fn set_permissions_tracked(
    target: &Path,
    mode: u32,
    component_id: &str,
    tx: &mut Transaction,
) -> Result<()> {
    apply_mode(target, mode, tx).map_err(|e| ClaudekitError::StepFailed {
        component_id: component_id.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: u32, tx: &mut Transaction) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let prior_mode = fs::metadata(target)?.permissions().mode() & 0o777;
    if prior_mode == mode {
        return Ok(());
    }

    fs::set_permissions(target, fs::Permissions::from_mode(mode))?;
    tx.track(Applied::PermissionsChanged {
        path: target.to_path_buf(),
        prior_mode,
    });
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: u32, _tx: &mut Transaction) -> std::io::Result<()> {
    Ok(())
}

/// Write a timestamped sibling backup and describe it
fn write_backup(target: &Path, content: &[u8]) -> std::io::Result<BackupInfo> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let backup_path = target.with_file_name(format!("{file_name}.backup-{timestamp}"));

    fs::write(&backup_path, content)?;

    Ok(BackupInfo {
        original_path: target.to_path_buf(),
        backup_path,
        timestamp,
        content_hash: hash::hash_file(target).unwrap_or_default(),
    })
}
