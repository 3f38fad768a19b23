//! Component registry: discovery and the in-memory catalog
//!
//! [`discover`] walks a component source tree, classifies files by
//! location and extension, parses each file's metadata header and builds
//! the catalog plus its dependency graph. A malformed header fails that
//! single file (recorded in [`Registry::skipped`]), never the whole scan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use walkdir::WalkDir;

use crate::error::{ClaudekitError, Result};

pub mod graph;
pub mod metadata;

pub use graph::DependencyGraph;
use metadata::MetadataHeader;

/// Kind of an installable component, closed set
///
/// The kind decides the target subdirectory and whether the installed file
/// receives executable permission bits (hooks only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComponentKind {
    Command,
    Hook,
    Agent,
}

impl ComponentKind {
    /// Source and target subdirectory for this kind
    pub fn subdir(&self) -> &'static str {
        match self {
            ComponentKind::Command => "commands",
            ComponentKind::Hook => "hooks",
            ComponentKind::Agent => "agents",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Command => "command",
            ComponentKind::Hook => "hook",
            ComponentKind::Agent => "agent",
        }
    }

    /// All kinds in the order their directory steps are planned
    pub fn all() -> [ComponentKind; 3] {
        [
            ComponentKind::Command,
            ComponentKind::Hook,
            ComponentKind::Agent,
        ]
    }
}

/// Component category, closed set
///
/// Used for filtering and recommendations, never for dependency resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Git,
    Validation,
    Workflow,
    Testing,
    Utility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Git => "git",
            Category::Validation => "validation",
            Category::Workflow => "workflow",
            Category::Testing => "testing",
            Category::Utility => "utility",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "git" => Ok(Category::Git),
            "validation" => Ok(Category::Validation),
            "workflow" => Ok(Category::Workflow),
            "testing" => Ok(Category::Testing),
            "utility" => Ok(Category::Utility),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Target operating system a component supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    All,
    Linux,
    Macos,
    Windows,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Platform::All),
            "linux" => Ok(Platform::Linux),
            "macos" | "darwin" => Ok(Platform::Macos),
            "windows" => Ok(Platform::Windows),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// One discoverable, installable unit
///
/// Constructed once per scan; immutable thereafter.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    pub name: String,
    pub description: String,
    /// Absolute source location
    pub path: PathBuf,
    /// Required dependency ids, declaration order preserved for diagnostics
    pub dependencies: Vec<String>,
    /// Dependencies excluded from the closure unless opted in
    pub optional_dependencies: Vec<String>,
    pub category: Category,
    pub platforms: Vec<Platform>,
    /// Disabled components are discoverable but excluded from default installs
    pub enabled: bool,
    /// Universally recommended; unioned into the default installation
    pub recommended: bool,
    /// Hook components: host event the hook binds to
    pub event: Option<String>,
    /// Hook components: matcher expression
    pub matcher: Option<String>,
}

/// A file the scan could not turn into a component
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// In-memory catalog of one discovery pass
///
/// Rebuilt whole on each [`discover`]; there are no partial updates.
#[derive(Debug, Default)]
pub struct Registry {
    /// id -> component, sorted keys for deterministic iteration
    pub components: BTreeMap<String, Component>,
    /// category -> sorted component ids
    pub categories: BTreeMap<Category, Vec<String>>,
    pub graph: DependencyGraph,
    /// Per-file metadata failures, recovered locally
    pub skipped: Vec<SkippedFile>,
}

impl Registry {
    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Required plus optional dependency ids of a component, required first
    pub fn all_dependencies_of(&self, id: &str) -> Vec<&str> {
        let Some(component) = self.components.get(id) else {
            return Vec::new();
        };
        component
            .dependencies
            .iter()
            .chain(component.optional_dependencies.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Scan a source tree and build the catalog
///
/// Layout: `<root>/hooks/**/*.sh`, `<root>/commands/**/*.md`,
/// `<root>/agents/**/*.md`. Anything else is ignored. Read-only with
/// respect to the source tree.
pub fn discover(source_dir: &Path) -> Result<Registry> {
    if !source_dir.is_dir() {
        return Err(ClaudekitError::SourceTreeNotFound {
            path: source_dir.display().to_string(),
        });
    }

    let mut registry = Registry::default();

    for kind in ComponentKind::all() {
        let subtree = source_dir.join(kind.subdir());
        if !subtree.is_dir() {
            continue;
        }
        scan_subtree(&subtree, kind, &mut registry);
    }

    for (id, component) in &registry.components {
        registry
            .categories
            .entry(component.category)
            .or_default()
            .push(id.clone());
    }

    registry.graph = graph::build_graph(&registry.components);

    Ok(registry)
}

fn scan_subtree(subtree: &Path, kind: ComponentKind, registry: &mut Registry) {
    let expected_ext = match kind {
        ComponentKind::Hook => "sh",
        ComponentKind::Command | ComponentKind::Agent => "md",
    };

    // Sorted traversal keeps discovery independent of directory enumeration
    // order, which the determinism property depends on.
    let walker = WalkDir::new(subtree)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some(expected_ext));

    for entry in walker {
        let path = entry.path();
        match load_component(path, kind) {
            Ok(component) => {
                if registry.components.contains_key(&component.id) {
                    registry.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: format!("duplicate component id '{}'", component.id),
                    });
                } else {
                    registry.components.insert(component.id.clone(), component);
                }
            }
            Err(e) => registry.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}

fn load_component(path: &Path, kind: ComponentKind) -> Result<Component> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ClaudekitError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let header = match kind {
        ComponentKind::Hook => metadata::parse_shell_header(&content),
        ComponentKind::Command | ComponentKind::Agent => {
            metadata::parse_frontmatter(&content).map(|(header, _body)| header)
        }
    }
    .ok_or_else(|| metadata_error(path, "missing metadata header"))?;

    component_from_header(path, kind, header)
}

fn component_from_header(
    path: &Path,
    kind: ComponentKind,
    header: MetadataHeader,
) -> Result<Component> {
    let id = match header.id {
        Some(id) if !id.is_empty() => id,
        _ => path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| metadata_error(path, "cannot derive id from file name"))?,
    };

    let description = header
        .description
        .filter(|d| !d.is_empty())
        .ok_or_else(|| metadata_error(path, "missing description"))?;

    let category = header
        .category
        .ok_or_else(|| metadata_error(path, "missing category"))?
        .parse::<Category>()
        .map_err(|reason| metadata_error(path, &reason))?;

    let platforms = if header.platforms.is_empty() {
        vec![Platform::All]
    } else {
        header
            .platforms
            .iter()
            .map(|p| p.parse::<Platform>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|reason| metadata_error(path, &reason))?
    };

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    Ok(Component {
        name: header.name.unwrap_or_else(|| id.clone()),
        id,
        kind,
        description,
        path: absolute,
        dependencies: header.dependencies,
        optional_dependencies: header.optional_dependencies,
        category,
        platforms,
        enabled: header.enabled.unwrap_or(true),
        recommended: header.recommended,
        event: header.event,
        matcher: header.matcher,
    })
}

fn metadata_error(path: &Path, reason: &str) -> ClaudekitError {
    ClaudekitError::MetadataInvalid {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
