//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A disposable workspace: component source tree plus a project directory
pub struct TestWorkspace {
    temp: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let workspace = Self {
            temp: TempDir::new().expect("create tempdir"),
        };
        std::fs::create_dir_all(workspace.project_dir()).expect("create project dir");
        workspace
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Component source tree root
    pub fn source_dir(&self) -> PathBuf {
        self.temp.path().join("components")
    }

    /// Target project root
    pub fn project_dir(&self) -> PathBuf {
        self.temp.path().join("project")
    }

    /// Stand-in for the per-user profile directory
    pub fn user_dir(&self) -> PathBuf {
        self.temp.path().join("home/.claude")
    }

    /// Write a hook with a standard metadata header
    pub fn add_hook(&self, id: &str, deps: &[&str]) {
        self.add_hook_with_event(id, deps, "PostToolUse", "*");
    }

    pub fn add_hook_with_event(&self, id: &str, deps: &[&str], event: &str, matcher: &str) {
        let content = format!(
            "#!/usr/bin/env bash\n\
             # id: {id}\n\
             # description: {id} integration hook\n\
             # category: validation\n\
             # dependencies: {}\n\
             # event: {event}\n\
             # matcher: {matcher}\n\
             \n\
             echo \"{id}\"\n",
            deps.join(", ")
        );
        self.write(&format!("components/hooks/{id}.sh"), &content);
    }

    /// Write a command document with YAML frontmatter
    pub fn add_command(&self, id: &str, deps: &[&str]) {
        let deps_yaml = if deps.is_empty() {
            "[]".to_string()
        } else {
            format!("[{}]", deps.join(", "))
        };
        let content = format!(
            "---\n\
             id: {id}\n\
             description: {id} integration command\n\
             category: git\n\
             dependencies: {deps_yaml}\n\
             ---\n\
             \n\
             # {id}\n",
        );
        self.write(&format!("components/commands/{id}.md"), &content);
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write file");
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.temp.path().join(relative)).expect("read file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.temp.path().join(relative).exists()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
