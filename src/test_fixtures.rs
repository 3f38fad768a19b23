//! Shared test fixtures
//!
//! Builders for component source trees on disk and for in-memory
//! registries, so unit tests across modules do not each reinvent them.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::registry::{self, Category, Component, ComponentKind, Platform, Registry};

/// A component source tree rooted in a tempdir
pub struct SourceTree {
    temp: TempDir,
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write a hook script with a standard metadata header
    pub fn hook(&self, id: &str, category: &str, deps: &[&str]) -> PathBuf {
        self.hook_with_event(id, category, deps, "PostToolUse", "*")
    }

    pub fn hook_with_event(
        &self,
        id: &str,
        category: &str,
        deps: &[&str],
        event: &str,
        matcher: &str,
    ) -> PathBuf {
        let content = format!(
            "#!/usr/bin/env bash\n\
             # id: {id}\n\
             # description: {id} test hook\n\
             # category: {category}\n\
             # dependencies: {}\n\
             # event: {event}\n\
             # matcher: {matcher}\n\
             \n\
             echo \"{id}\"\n",
            deps.join(", ")
        );
        self.raw_file(&format!("hooks/{id}.sh"), &content)
    }

    /// Write a command document with YAML frontmatter
    pub fn command(&self, id: &str, category: &str, deps: &[&str]) -> PathBuf {
        let deps_yaml = if deps.is_empty() {
            "[]".to_string()
        } else {
            format!("[{}]", deps.join(", "))
        };
        let content = format!(
            "---\n\
             id: {id}\n\
             description: {id} test command\n\
             category: {category}\n\
             dependencies: {deps_yaml}\n\
             ---\n\
             \n\
             # {id}\n",
        );
        self.raw_file(&format!("commands/{id}.md"), &content)
    }

    /// Write an agent document with YAML frontmatter
    pub fn agent(&self, id: &str, category: &str, deps: &[&str]) -> PathBuf {
        let deps_yaml = if deps.is_empty() {
            "[]".to_string()
        } else {
            format!("[{}]", deps.join(", "))
        };
        let content = format!(
            "---\n\
             id: {id}\n\
             description: {id} test agent\n\
             category: {category}\n\
             dependencies: {deps_yaml}\n\
             ---\n\
             \n\
             You are {id}.\n",
        );
        self.raw_file(&format!("agents/{id}.md"), &content)
    }

    /// Write an arbitrary file under the tree root
    pub fn raw_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    /// Discover this tree into a registry
    pub fn discover(&self) -> Registry {
        registry::discover(self.root()).expect("discover fixture tree")
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory component for resolver and planner tests
pub fn make_component(id: &str, deps: &[&str], optional: &[&str]) -> Component {
    Component {
        id: id.to_string(),
        kind: ComponentKind::Hook,
        name: id.to_string(),
        description: format!("{id} fixture"),
        path: PathBuf::from(format!("/fixtures/hooks/{id}.sh")),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        optional_dependencies: optional.iter().map(|d| d.to_string()).collect(),
        category: Category::Validation,
        platforms: vec![Platform::All],
        enabled: true,
        recommended: false,
        event: Some("PostToolUse".to_string()),
        matcher: Some("*".to_string()),
    }
}

/// Build an in-memory registry from `(id, required_deps)` pairs
pub fn registry_from(specs: &[(&str, &[&str])]) -> Registry {
    let full: Vec<(&str, &[&str], &[&str])> =
        specs.iter().map(|(id, deps)| (*id, *deps, &[][..])).collect();
    registry_from_full(&full)
}

/// Build an in-memory registry from `(id, required_deps, optional_deps)`
pub fn registry_from_full(specs: &[(&str, &[&str], &[&str])]) -> Registry {
    let components: BTreeMap<String, Component> = specs
        .iter()
        .map(|(id, deps, optional)| (id.to_string(), make_component(id, deps, optional)))
        .collect();

    let mut categories: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for (id, component) in &components {
        categories
            .entry(component.category)
            .or_default()
            .push(id.clone());
    }

    let graph = registry::graph::build_graph(&components);

    Registry {
        components,
        categories,
        graph,
        skipped: Vec::new(),
    }
}
