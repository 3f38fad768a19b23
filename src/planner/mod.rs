//! Install planning
//!
//! [`create_install_plan`] turns an [`Installation`] request into an
//! ordered [`InstallPlan`] of concrete file-system steps. Planning never
//! mutates anything; it may read the file system only to generate
//! warnings. Same inputs always produce the same plan.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths;
use crate::project::ProjectInfo;
use crate::registry::{Component, ComponentKind, Registry};
use crate::resolver;

pub mod recommend;

/// Where components are installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallTarget {
    User,
    #[default]
    Project,
    Both,
}

/// A requested installation, before planning
#[derive(Debug, Clone)]
pub struct Installation {
    pub component_ids: Vec<String>,
    pub target: InstallTarget,
    pub project_dir: PathBuf,
    /// Override for the per-user profile directory; defaults to `~/.claude`.
    /// A leading `~` is expanded during planning.
    pub user_dir: Option<PathBuf>,
    /// Auto-include missing dependencies
    pub install_dependencies: bool,
}

impl Installation {
    pub fn new(component_ids: Vec<String>, target: InstallTarget, project_dir: PathBuf) -> Self {
        Self {
            component_ids,
            target,
            project_dir,
            user_dir: None,
            install_dependencies: true,
        }
    }
}

/// One atomic file-system operation within a plan
///
/// Steps are the unit of rollback; ordering matters (directories before
/// files before permission changes, dependencies before dependents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStep {
    CreateDir {
        target: PathBuf,
        component_id: String,
    },
    CopyFile {
        source: PathBuf,
        target: PathBuf,
        component_id: String,
    },
    SetPermissions {
        target: PathBuf,
        mode: u32,
        component_id: String,
    },
}

impl InstallStep {
    pub fn target(&self) -> &Path {
        match self {
            InstallStep::CreateDir { target, .. }
            | InstallStep::CopyFile { target, .. }
            | InstallStep::SetPermissions { target, .. } => target,
        }
    }

    pub fn component_id(&self) -> &str {
        match self {
            InstallStep::CreateDir { component_id, .. }
            | InstallStep::CopyFile { component_id, .. }
            | InstallStep::SetPermissions { component_id, .. } => component_id,
        }
    }
}

/// Executable permission bits applied to installed hooks
pub const HOOK_MODE: u32 = 0o755;

/// Component id used for steps that serve the whole plan (directories)
const PLAN_COMPONENT: &str = "(plan)";

/// An immutable, fully computed intention to change the file system
#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    /// Final, dependency-ordered component list
    pub components: Vec<Component>,
    pub target: InstallTarget,
    pub steps: Vec<InstallStep>,
    /// Advisory only; never block execution
    pub warnings: Vec<String>,
    /// Populated by validation, never by planning itself
    #[allow(dead_code)]
    pub errors: Vec<String>,
}

impl InstallPlan {
    pub fn copy_steps(&self) -> impl Iterator<Item = &InstallStep> {
        self.steps
            .iter()
            .filter(|s| matches!(s, InstallStep::CopyFile { .. }))
    }
}

/// Compute the plan for an installation request
///
/// Resolution: disabled and platform-incompatible components are dropped
/// with a warning; missing dependencies are auto-included when
/// `install_dependencies` is set; the final list is topologically ordered.
pub fn create_install_plan(
    installation: &Installation,
    registry: &Registry,
    project: &ProjectInfo,
) -> Result<InstallPlan> {
    let mut warnings = Vec::new();

    let mut seen = BTreeSet::new();
    let mut ids: Vec<String> = installation
        .component_ids
        .iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect();

    if installation.install_dependencies {
        let missing = resolver::missing_dependencies(&ids, registry)?;
        for id in &missing {
            warnings.push(format!("auto-including dependency '{id}'"));
        }
        ids = resolver::resolve_all_dependencies(
            &ids,
            registry,
            &resolver::ResolveOptions::default(),
        )?;
    }

    let ordered = resolver::resolve_dependency_order(&ids, registry)?;
    warnings.extend(resolver::dangling_warnings(&ordered, registry));

    let mut components: Vec<Component> = Vec::new();
    for id in &ordered {
        // Existence was checked during resolution
        let Some(component) = registry.get(id) else {
            continue;
        };
        if !component.enabled {
            warnings.push(format!("component '{id}' is disabled, skipping"));
            continue;
        }
        if !supports_current_platform(component) {
            warnings.push(format!(
                "component '{id}' does not support this platform, skipping"
            ));
            continue;
        }
        components.push(component.clone());
    }

    warnings.extend(recommend::selection_warnings(project, &components, registry));

    let mut steps = Vec::new();
    if !components.is_empty() {
        for root in target_roots(installation)? {
            plan_steps_for_root(&root, &components, &mut steps);
        }
    }

    Ok(InstallPlan {
        components,
        target: installation.target,
        steps,
        warnings,
        errors: Vec::new(),
    })
}

/// Resolve the install root directories for a request
///
/// `Both` yields the project root first, then the user root. The `~`
/// shorthand in a user directory override is expanded here, not later.
pub fn target_roots(installation: &Installation) -> Result<Vec<PathBuf>> {
    let user_root = || -> Result<PathBuf> {
        match &installation.user_dir {
            Some(dir) => paths::expand_home(dir),
            None => paths::user_claude_dir(),
        }
    };

    Ok(match installation.target {
        InstallTarget::Project => vec![paths::project_claude_dir(&installation.project_dir)],
        InstallTarget::User => vec![user_root()?],
        InstallTarget::Both => vec![
            paths::project_claude_dir(&installation.project_dir),
            user_root()?,
        ],
    })
}

/// Emit the steps for one install root
///
/// Order within a root: the root directory, each needed kind
/// subdirectory, copies in dependency order, then permission bits for
/// hooks.
fn plan_steps_for_root(root: &Path, components: &[Component], steps: &mut Vec<InstallStep>) {
    let kinds_present: BTreeSet<ComponentKind> =
        components.iter().map(|c| c.kind).collect();

    steps.push(InstallStep::CreateDir {
        target: root.to_path_buf(),
        component_id: PLAN_COMPONENT.to_string(),
    });
    for kind in ComponentKind::all() {
        if kinds_present.contains(&kind) {
            steps.push(InstallStep::CreateDir {
                target: root.join(kind.subdir()),
                component_id: PLAN_COMPONENT.to_string(),
            });
        }
    }

    for component in components {
        steps.push(InstallStep::CopyFile {
            source: component.path.clone(),
            target: component_target(root, component),
            component_id: component.id.clone(),
        });
    }

    for component in components {
        if component.kind == ComponentKind::Hook {
            steps.push(InstallStep::SetPermissions {
                target: component_target(root, component),
                mode: HOOK_MODE,
                component_id: component.id.clone(),
            });
        }
    }
}

/// Installed location of a component under an install root
pub fn component_target(root: &Path, component: &Component) -> PathBuf {
    let file_name = component
        .path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&component.id));
    root.join(component.kind.subdir()).join(file_name)
}

fn supports_current_platform(component: &Component) -> bool {
    use crate::registry::Platform;

    component.platforms.iter().any(|p| match p {
        Platform::All => true,
        Platform::Linux => cfg!(target_os = "linux"),
        Platform::Macos => cfg!(target_os = "macos"),
        Platform::Windows => cfg!(target_os = "windows"),
    })
}
