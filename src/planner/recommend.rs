//! Capability-based recommendations and plan warnings
//!
//! Cross-references the detected project capabilities against the
//! component catalog: the default installation unions universally
//! recommended components with capability matches, and planning warns when
//! a capability has no matching component in the selection. Warnings are
//! advisory, never errors.

use std::collections::BTreeSet;

use crate::project::ProjectInfo;
use crate::registry::{Category, Component, Registry};

/// Component ids recommended for the detected capabilities
///
/// Disabled components never qualify. Sorted for determinism.
pub fn recommended_for_project(project: &ProjectInfo, registry: &Registry) -> Vec<String> {
    let mut ids: BTreeSet<String> = BTreeSet::new();

    for component in registry.components.values() {
        if !component.enabled {
            continue;
        }
        if component.recommended || matches_capability(component, project) {
            ids.insert(component.id.clone());
        }
    }

    ids.into_iter().collect()
}

/// Warnings about capabilities the selection leaves uncovered
pub fn selection_warnings(
    project: &ProjectInfo,
    selected: &[Component],
    registry: &Registry,
) -> Vec<String> {
    let mut warnings = Vec::new();

    let covered = |predicate: fn(&Component) -> bool| selected.iter().any(predicate);
    let available = |predicate: fn(&Component) -> bool| {
        registry
            .components
            .values()
            .any(|c| c.enabled && predicate(c))
    };

    if project.has_typescript
        && project.strict_typescript
        && available(is_typecheck)
        && !covered(is_typecheck)
    {
        warnings.push(
            "project uses strict type checking but no typecheck hook was selected".to_string(),
        );
    }

    if project.has_eslint && available(is_lint) && !covered(is_lint) {
        warnings.push("project has an ESLint configuration but no lint hook was selected".to_string());
    }

    if project.test_framework.is_some() && available(is_test) && !covered(is_test) {
        warnings.push("project has a test framework but no test component was selected".to_string());
    }

    if project.is_git_repo && available(is_git) && !covered(is_git) {
        warnings.push("project is a git repository but no git component was selected".to_string());
    }

    warnings
}

fn matches_capability(component: &Component, project: &ProjectInfo) -> bool {
    (project.has_typescript && is_typecheck(component))
        || (project.has_eslint && is_lint(component))
        || (project.test_framework.is_some() && is_test(component))
        || (project.is_git_repo && is_git(component))
}

fn is_git(component: &Component) -> bool {
    component.category == Category::Git
}

fn is_typecheck(component: &Component) -> bool {
    component.id.starts_with("typecheck")
}

fn is_lint(component: &Component) -> bool {
    component.id.starts_with("lint") || component.id.starts_with("eslint")
}

fn is_test(component: &Component) -> bool {
    component.category == Category::Testing || component.id.starts_with("test")
}
