//! Setup command: plan, install and sync settings

use std::path::PathBuf;

use crate::cli::SetupArgs;
use crate::error::{ClaudekitError, Result};
use crate::installer::{self, InstallOptions};
use crate::paths;
use crate::planner::{self, Installation};
use crate::progress::{ProgressDisplay, ProgressSink, SilentProgress};
use crate::project;
use crate::registry::{ComponentKind, Registry};
use crate::settings::{self, MergeMode};
use crate::ui::{self, AlwaysConfirm, Confirm, InquireConfirm};

/// Run the setup command
pub fn run(
    project_arg: Option<PathBuf>,
    source_arg: Option<PathBuf>,
    verbose: bool,
    args: SetupArgs,
) -> Result<()> {
    let project_dir = super::project_dir(project_arg)?;
    let source_dir = super::source_dir(source_arg);
    let registry = super::discover_registry(&source_dir, verbose)?;
    let project_info = project::detect(&project_dir);

    if verbose && project_info.has_claude_config {
        eprintln!("Existing Claude configuration detected; settings will be merged.");
    }

    let mut installation = build_installation(&args, &registry, &project_info, &project_dir)?;
    installation.user_dir = args.user_dir.clone();

    if installation.component_ids.is_empty() {
        return Err(ClaudekitError::EmptySelection);
    }

    let options = InstallOptions {
        dry_run: args.dry_run,
        force: args.force,
    };

    let mut sink: Box<dyn ProgressSink> = if args.dry_run {
        Box::new(SilentProgress)
    } else {
        Box::new(ProgressDisplay::new())
    };

    let result = installer::install(
        &installation,
        &registry,
        &project_info,
        &options,
        sink.as_mut(),
    )?;

    if args.dry_run && result.success {
        ui::print_dry_run_summary(&result);
        return Ok(());
    }

    ui::print_install_summary(&result);

    if !result.success {
        return Err(ClaudekitError::InstallFailed {
            reason: result.errors.join("; "),
        });
    }

    if !args.skip_settings {
        sync_settings(&args, &installation, &registry, &result)?;
    }

    Ok(())
}

fn build_installation(
    args: &SetupArgs,
    registry: &Registry,
    project_info: &project::ProjectInfo,
    project_dir: &std::path::Path,
) -> Result<Installation> {
    let target = args.target.into();

    if args.all {
        let ids: Vec<String> = registry
            .components
            .values()
            .filter(|c| c.enabled)
            .map(|c| c.id.clone())
            .collect();
        let mut installation = Installation::new(ids, target, project_dir.to_path_buf());
        installation.install_dependencies = !args.no_deps;
        return Ok(installation);
    }

    if args.components.is_empty() {
        let mut installation =
            installer::create_default_installation(registry, project_info, target);
        installation.project_dir = project_dir.to_path_buf();
        installation.install_dependencies = !args.no_deps;
        return Ok(installation);
    }

    let mut installation =
        Installation::new(args.components.clone(), target, project_dir.to_path_buf());
    installation.install_dependencies = !args.no_deps;
    Ok(installation)
}

/// Fold the installed hook components into settings.json under each root
fn sync_settings(
    args: &SetupArgs,
    installation: &Installation,
    registry: &Registry,
    result: &installer::InstallResult,
) -> Result<()> {
    let hooks: Vec<_> = result
        .installed
        .iter()
        .chain(result.skipped.iter())
        .filter_map(|id| registry.get(id))
        .filter(|c| c.kind == ComponentKind::Hook)
        .cloned()
        .collect();

    if hooks.is_empty() {
        return Ok(());
    }

    let mode = if args.force {
        MergeMode::Force
    } else if args.non_interactive {
        MergeMode::NonInteractive
    } else {
        MergeMode::Interactive { backup: true }
    };

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AlwaysConfirm(true))
    } else {
        Box::new(InquireConfirm)
    };

    for root in planner::target_roots(installation)? {
        let settings_path = root.join(paths::SETTINGS_FILE);
        match settings::sync_hook_settings(&settings_path, &hooks, mode, confirm.as_mut())? {
            Some(backup) => println!(
                "Updated {} (backup: {})",
                settings_path.display(),
                backup.display()
            ),
            None => println!("Settings synced: {}", settings_path.display()),
        }
    }

    Ok(())
}
