//! Settings document merging
//!
//! Folds installed hook components into the host tool's `settings.json`
//! without duplicating entries. Duplicate detection compares the semantic
//! hook command for a component across both the current runner invocation
//! (`claudekit-hooks run <id>`) and the legacy script-path form
//! (`.claude/hooks/<id>.sh`), so re-running installation never yields two
//! entries for one hook under either historical representation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{ClaudekitError, Result};
use crate::registry::{Component, ComponentKind};
use crate::ui::Confirm;

/// Current hook invocation prefix
pub const HOOK_RUNNER_PREFIX: &str = "claudekit-hooks run ";

/// Legacy hook invocation path fragment
const LEGACY_HOOK_DIR: &str = ".claude/hooks/";

/// Event a hook defaults to when its header names none
const DEFAULT_EVENT: &str = "Stop";

/// Matcher applied when a hook header names none
pub const WILDCARD_MATCHER: &str = "*";

/// One command invoked by the host for a matched event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
}

impl HookCommand {
    fn for_component(id: &str) -> Self {
        Self {
            kind: "command".to_string(),
            command: format!("{HOOK_RUNNER_PREFIX}{id}"),
        }
    }
}

/// One matcher bucket under an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookMatcher {
    pub matcher: String,
    pub hooks: Vec<HookCommand>,
}

/// The persisted settings document
///
/// Unrelated top-level keys in an existing file are carried through the
/// flattened map untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HookSettings {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hooks: BTreeMap<String, Vec<HookMatcher>>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// How [`sync_hook_settings`] treats a differing existing document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Overwrite without asking
    Force,
    /// Fail on any difference; protects unattended invocations
    NonInteractive,
    /// Ask the injected confirmation; back up first unless disabled
    Interactive { backup: bool },
}

/// Fold hook components into a settings document
///
/// Pure merge: the existing document (or an empty one) gains one entry per
/// not-yet-configured hook component. Wildcard-matcher entries for an
/// event append into the existing wildcard bucket instead of opening a new
/// bucket per component.
pub fn merge_hook_settings(
    existing: Option<HookSettings>,
    components: &[Component],
) -> HookSettings {
    let mut settings = existing.unwrap_or_default();

    for component in components {
        if component.kind != ComponentKind::Hook {
            continue;
        }
        if is_hook_configured(&settings, &component.id) {
            continue;
        }

        let event = component
            .event
            .clone()
            .unwrap_or_else(|| DEFAULT_EVENT.to_string());
        let matcher = component
            .matcher
            .clone()
            .unwrap_or_else(|| WILDCARD_MATCHER.to_string());
        let command = HookCommand::for_component(&component.id);

        let buckets = settings.hooks.entry(event).or_default();
        if matcher == WILDCARD_MATCHER {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.matcher == WILDCARD_MATCHER) {
                bucket.hooks.push(command);
                continue;
            }
        }
        buckets.push(HookMatcher {
            matcher,
            hooks: vec![command],
        });
    }

    settings
}

/// Whether any entry already invokes the hook, in either representation
pub fn is_hook_configured(settings: &HookSettings, id: &str) -> bool {
    settings
        .hooks
        .values()
        .flatten()
        .flat_map(|bucket| &bucket.hooks)
        .any(|hook| is_component_command(&hook.command, id))
}

fn is_component_command(command: &str, id: &str) -> bool {
    if let Some(rest) = command.strip_prefix(HOOK_RUNNER_PREFIX) {
        // Exact id, tolerating trailing arguments
        let invoked = rest.split_whitespace().next().unwrap_or("");
        if invoked == id {
            return true;
        }
    }
    command.contains(&format!("{LEGACY_HOOK_DIR}{id}.sh"))
}

/// Merge into the document at `settings_path` and write it back
///
/// Identical resulting content short-circuits with no write and no backup.
/// Differing content is handled per [`MergeMode`]; returns the backup path
/// when one was taken.
pub fn sync_hook_settings(
    settings_path: &Path,
    components: &[Component],
    mode: MergeMode,
    confirm: &mut dyn Confirm,
) -> Result<Option<PathBuf>> {
    let existing_bytes = match fs::read(settings_path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(ClaudekitError::FileReadFailed {
                path: settings_path.display().to_string(),
                reason: e.to_string(),
            });
        }
    };

    let existing: Option<HookSettings> = match &existing_bytes {
        Some(bytes) => Some(serde_json::from_slice(bytes).map_err(|e| {
            ClaudekitError::SettingsParseFailed {
                path: settings_path.display().to_string(),
                reason: e.to_string(),
            }
        })?),
        None => None,
    };

    let merged = merge_hook_settings(existing, components);
    let mut rendered = serde_json::to_string_pretty(&merged)?;
    rendered.push('\n');

    if existing_bytes.as_deref() == Some(rendered.as_bytes()) {
        return Ok(None);
    }

    let mut backup_path = None;
    if let Some(bytes) = &existing_bytes {
        match mode {
            MergeMode::Force => {}
            MergeMode::NonInteractive => {
                return Err(ClaudekitError::SettingsConflict {
                    path: settings_path.display().to_string(),
                });
            }
            MergeMode::Interactive { backup } => {
                let prompt = format!(
                    "Update {} with the merged hook settings?",
                    settings_path.display()
                );
                if !confirm.confirm(&prompt)? {
                    return Err(ClaudekitError::SettingsConflict {
                        path: settings_path.display().to_string(),
                    });
                }
                if backup {
                    backup_path = Some(write_backup(settings_path, bytes)?);
                }
            }
        }
    }

    if let Some(parent) = settings_path.parent() {
        fs::create_dir_all(parent).map_err(|e| ClaudekitError::FileWriteFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    fs::write(settings_path, rendered).map_err(|e| ClaudekitError::FileWriteFailed {
        path: settings_path.display().to_string(),
        reason: e.to_string(),
    })?;

    Ok(backup_path)
}

fn write_backup(settings_path: &Path, content: &[u8]) -> Result<PathBuf> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let file_name = settings_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("settings.json");
    let backup_path = settings_path.with_file_name(format!("{file_name}.backup-{timestamp}"));

    fs::write(&backup_path, content).map_err(|e| ClaudekitError::FileWriteFailed {
        path: backup_path.display().to_string(),
        reason: e.to_string(),
    })?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::make_component;
    use crate::ui::AlwaysConfirm;
    use tempfile::TempDir;

    fn hook(id: &str, event: &str, matcher: &str) -> Component {
        let mut component = make_component(id, &[], &[]);
        component.event = Some(event.to_string());
        component.matcher = Some(matcher.to_string());
        component
    }

    #[test]
    fn test_merge_into_empty_document() {
        let components = vec![hook("typecheck-changed", "PostToolUse", "*")];
        let settings = merge_hook_settings(None, &components);

        let buckets = settings.hooks.get("PostToolUse").unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].matcher, "*");
        assert_eq!(
            buckets[0].hooks[0].command,
            "claudekit-hooks run typecheck-changed"
        );
    }

    #[test]
    fn test_merge_skips_current_format_duplicate() {
        let components = vec![hook("typecheck-changed", "PostToolUse", "*")];
        let first = merge_hook_settings(None, &components);
        let second = merge_hook_settings(Some(first.clone()), &components);

        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_skips_legacy_format_duplicate() {
        let mut existing = HookSettings::default();
        existing.hooks.insert(
            "PostToolUse".to_string(),
            vec![HookMatcher {
                matcher: "*".to_string(),
                hooks: vec![HookCommand {
                    kind: "command".to_string(),
                    command: "bash .claude/hooks/typecheck-changed.sh".to_string(),
                }],
            }],
        );

        let components = vec![hook("typecheck-changed", "PostToolUse", "*")];
        let merged = merge_hook_settings(Some(existing.clone()), &components);

        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_id_prefix_is_not_a_duplicate() {
        let components = vec![hook("typecheck", "PostToolUse", "*")];
        let existing = merge_hook_settings(
            None,
            &[hook("typecheck-changed", "PostToolUse", "*")],
        );

        let merged = merge_hook_settings(Some(existing), &components);

        let bucket = &merged.hooks["PostToolUse"][0];
        assert_eq!(bucket.hooks.len(), 2);
    }

    #[test]
    fn test_merge_wildcard_entries_share_one_bucket() {
        let components = vec![
            hook("auto-checkpoint", "Stop", "*"),
            hook("validate-todos", "Stop", "*"),
        ];
        let settings = merge_hook_settings(None, &components);

        let buckets = settings.hooks.get("Stop").unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].hooks.len(), 2);
    }

    #[test]
    fn test_merge_specific_matchers_get_own_buckets() {
        let components = vec![
            hook("typecheck-changed", "PostToolUse", "tools:Write"),
            hook("lint-changed", "PostToolUse", "tools:Edit"),
        ];
        let settings = merge_hook_settings(None, &components);

        let buckets = settings.hooks.get("PostToolUse").unwrap();
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_merge_ignores_non_hooks() {
        let mut command = make_component("git-commit", &[], &[]);
        command.kind = ComponentKind::Command;

        let settings = merge_hook_settings(None, &[command]);
        assert!(settings.hooks.is_empty());
    }

    #[test]
    fn test_merge_preserves_unrelated_keys() {
        let raw = r#"{"model": "opus", "hooks": {}}"#;
        let existing: HookSettings = serde_json::from_str(raw).unwrap();

        let merged = merge_hook_settings(
            Some(existing),
            &[hook("auto-checkpoint", "Stop", "*")],
        );

        assert_eq!(merged.rest.get("model").unwrap(), "opus");
        assert!(merged.hooks.contains_key("Stop"));
    }

    #[test]
    fn test_sync_creates_new_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".claude/settings.json");
        let components = vec![hook("auto-checkpoint", "Stop", "*")];

        let backup = sync_hook_settings(
            &path,
            &components,
            MergeMode::NonInteractive,
            &mut AlwaysConfirm(false),
        )
        .unwrap();

        assert!(backup.is_none());
        let written: HookSettings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(is_hook_configured(&written, "auto-checkpoint"));
    }

    #[test]
    fn test_sync_identical_content_short_circuits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let components = vec![hook("typecheck-changed", "PostToolUse", "*")];

        sync_hook_settings(
            &path,
            &components,
            MergeMode::NonInteractive,
            &mut AlwaysConfirm(false),
        )
        .unwrap();
        let first_mtime = fs::metadata(&path).unwrap().modified().unwrap();

        // Re-running with the hook already present changes nothing
        let backup = sync_hook_settings(
            &path,
            &components,
            MergeMode::NonInteractive,
            &mut AlwaysConfirm(false),
        )
        .unwrap();

        assert!(backup.is_none());
        assert_eq!(
            fs::metadata(&path).unwrap().modified().unwrap(),
            first_mtime
        );
    }

    #[test]
    fn test_sync_non_interactive_conflict_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{\"hooks\": {}}").unwrap();

        let components = vec![hook("auto-checkpoint", "Stop", "*")];
        let result = sync_hook_settings(
            &path,
            &components,
            MergeMode::NonInteractive,
            &mut AlwaysConfirm(true),
        );

        assert!(matches!(
            result,
            Err(ClaudekitError::SettingsConflict { .. })
        ));
        // The file was not touched
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"hooks\": {}}");
    }

    #[test]
    fn test_sync_interactive_accept_takes_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{\"hooks\": {}}").unwrap();

        let components = vec![hook("auto-checkpoint", "Stop", "*")];
        let backup = sync_hook_settings(
            &path,
            &components,
            MergeMode::Interactive { backup: true },
            &mut AlwaysConfirm(true),
        )
        .unwrap()
        .expect("backup path");

        assert_eq!(fs::read_to_string(&backup).unwrap(), "{\"hooks\": {}}");
        let written: HookSettings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(is_hook_configured(&written, "auto-checkpoint"));
    }

    #[test]
    fn test_sync_interactive_decline_is_conflict() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{\"hooks\": {}}").unwrap();

        let components = vec![hook("auto-checkpoint", "Stop", "*")];
        let result = sync_hook_settings(
            &path,
            &components,
            MergeMode::Interactive { backup: true },
            &mut AlwaysConfirm(false),
        );

        assert!(matches!(
            result,
            Err(ClaudekitError::SettingsConflict { .. })
        ));
    }

    #[test]
    fn test_sync_force_overwrites_without_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{\"hooks\": {}}").unwrap();

        let components = vec![hook("auto-checkpoint", "Stop", "*")];
        let backup = sync_hook_settings(
            &path,
            &components,
            MergeMode::Force,
            &mut AlwaysConfirm(false),
        )
        .unwrap();

        assert!(backup.is_none());
        let written: HookSettings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(is_hook_configured(&written, "auto-checkpoint"));
    }

    #[test]
    fn test_sync_parse_failure_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let result = sync_hook_settings(
            &path,
            &[hook("auto-checkpoint", "Stop", "*")],
            MergeMode::Force,
            &mut AlwaysConfirm(true),
        );

        match result {
            Err(ClaudekitError::SettingsParseFailed { path: p, .. }) => {
                assert!(p.contains("settings.json"));
            }
            other => panic!("expected SettingsParseFailed, got {other:?}"),
        }
    }
}
