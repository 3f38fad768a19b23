//! Project capability detection
//!
//! Produces the read-only [`ProjectInfo`] record the planner and the
//! default installation consume. The engine treats the record as opaque
//! input; this module is the bundled detector implementation.

use std::path::{Path, PathBuf};

use crate::paths;

/// Detected capabilities of a target project
#[derive(Debug, Clone, Default)]
pub struct ProjectInfo {
    pub root: PathBuf,
    pub has_typescript: bool,
    /// `compilerOptions.strict` in tsconfig.json
    pub strict_typescript: bool,
    pub has_eslint: bool,
    /// Test runner found in package.json dev dependencies
    pub test_framework: Option<String>,
    pub is_git_repo: bool,
    /// An existing `.claude/settings.json`
    pub has_claude_config: bool,
}

/// Probe a project root for capabilities
pub fn detect(root: &Path) -> ProjectInfo {
    let tsconfig = read_jsonc(&root.join("tsconfig.json"));

    ProjectInfo {
        root: root.to_path_buf(),
        has_typescript: tsconfig.is_some(),
        strict_typescript: tsconfig
            .as_ref()
            .and_then(|v| v.get("compilerOptions"))
            .and_then(|o| o.get("strict"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
        has_eslint: has_eslint_config(root),
        test_framework: detect_test_framework(root),
        is_git_repo: root.join(".git").is_dir(),
        has_claude_config: paths::project_claude_dir(root)
            .join(paths::SETTINGS_FILE)
            .is_file(),
    }
}

fn has_eslint_config(root: &Path) -> bool {
    const ESLINT_MARKERS: &[&str] = &[
        ".eslintrc",
        ".eslintrc.json",
        ".eslintrc.js",
        ".eslintrc.cjs",
        ".eslintrc.yaml",
        "eslint.config.js",
        "eslint.config.mjs",
    ];
    ESLINT_MARKERS.iter().any(|m| root.join(m).exists())
}

fn detect_test_framework(root: &Path) -> Option<String> {
    let package = read_jsonc(&root.join("package.json"))?;

    const FRAMEWORKS: &[&str] = &["vitest", "jest", "mocha", "ava"];
    for section in ["devDependencies", "dependencies"] {
        if let Some(deps) = package.get(section).and_then(|v| v.as_object()) {
            for framework in FRAMEWORKS {
                if deps.contains_key(*framework) {
                    return Some((*framework).to_string());
                }
            }
        }
    }
    None
}

/// Read a JSON file tolerating `//` and `/* */` comments (tsconfig.json
/// is JSONC in practice)
fn read_jsonc(path: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&strip_jsonc_comments(&content)).ok()
}

fn strip_jsonc_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    result.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => result.push(c),
        }
    }

    result
}
