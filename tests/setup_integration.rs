//! End-to-end setup command tests

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::TestWorkspace;

fn claudekit_cmd(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("claudekit").expect("binary builds");
    cmd.env_remove("CLAUDEKIT_PROJECT");
    cmd.env_remove("CLAUDEKIT_SOURCE");
    cmd.arg("--project").arg(workspace.project_dir());
    cmd.arg("--source").arg(workspace.source_dir());
    cmd
}

#[test]
fn test_setup_installs_hook_and_settings() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("typecheck-changed", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "typecheck-changed", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("typecheck-changed"));

    assert!(workspace.exists("project/.claude/hooks/typecheck-changed.sh"));

    let settings = workspace.read("project/.claude/settings.json");
    assert!(settings.contains("claudekit-hooks run typecheck-changed"));
    assert!(settings.contains("PostToolUse"));
}

#[cfg(unix)]
#[test]
fn test_setup_makes_hooks_executable() {
    use std::os::unix::fs::PermissionsExt;

    let workspace = TestWorkspace::new();
    workspace.add_hook("auto-checkpoint", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "auto-checkpoint", "--yes"])
        .assert()
        .success();

    let installed = workspace
        .project_dir()
        .join(".claude/hooks/auto-checkpoint.sh");
    let mode = std::fs::metadata(&installed)
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o755);
}

#[test]
fn test_setup_auto_includes_dependencies() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("main", &["dependency"]);
    workspace.add_hook("dependency", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "main", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auto-including dependency 'dependency'"));

    assert!(workspace.exists("project/.claude/hooks/main.sh"));
    assert!(workspace.exists("project/.claude/hooks/dependency.sh"));
}

#[test]
fn test_setup_commands_are_not_hooks() {
    let workspace = TestWorkspace::new();
    workspace.add_command("git-commit", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "git-commit", "--yes"])
        .assert()
        .success();

    assert!(workspace.exists("project/.claude/commands/git-commit.md"));
    // A command contributes nothing to settings.json
    assert!(!workspace.exists("project/.claude/settings.json"));
}

#[test]
fn test_setup_second_run_is_idempotent() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("typecheck-changed", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "typecheck-changed", "--yes"])
        .assert()
        .success();

    let settings_before = workspace.read("project/.claude/settings.json");

    claudekit_cmd(&workspace)
        .args(["setup", "typecheck-changed", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));

    let settings_after = workspace.read("project/.claude/settings.json");
    assert_eq!(settings_before, settings_after);

    // No second entry for the hook under either representation
    assert_eq!(
        settings_after.matches("claudekit-hooks run typecheck-changed").count(),
        1
    );

    // No backups were taken
    let backups: Vec<_> = std::fs::read_dir(workspace.project_dir().join(".claude"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("backup"))
        .collect();
    assert!(backups.is_empty());
}

#[test]
fn test_setup_target_both_installs_twice() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("solo", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "solo", "--target", "both", "--yes"])
        .arg("--user-dir")
        .arg(workspace.user_dir())
        .assert()
        .success();

    assert!(workspace.exists("project/.claude/hooks/solo.sh"));
    assert!(workspace.exists("home/.claude/hooks/solo.sh"));
    assert!(workspace.exists("home/.claude/settings.json"));
}

#[test]
fn test_setup_unknown_component_fails() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("real", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "ghost", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'ghost' not found"));
}

#[test]
fn test_setup_cycle_fails_with_chain() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("a", &["b"]);
    workspace.add_hook("b", &["c"]);
    workspace.add_hook("c", &["a"]);

    claudekit_cmd(&workspace)
        .args(["setup", "a", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency"));

    // Nothing was installed
    assert!(!workspace.exists("project/.claude"));
}

#[test]
fn test_setup_cycle_elsewhere_does_not_block_acyclic_subset() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("a", &["b"]);
    workspace.add_hook("b", &["a"]);
    workspace.add_hook("free", &[]);

    claudekit_cmd(&workspace)
        .args(["setup", "free", "--yes"])
        .assert()
        .success();

    assert!(workspace.exists("project/.claude/hooks/free.sh"));
}

#[test]
fn test_setup_non_interactive_conflict_fails() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("auto-checkpoint", &[]);
    workspace.write("project/.claude/settings.json", "{\"model\": \"opus\"}");

    claudekit_cmd(&workspace)
        .args(["setup", "auto-checkpoint", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));

    // The settings file is untouched
    assert_eq!(
        workspace.read("project/.claude/settings.json"),
        "{\"model\": \"opus\"}"
    );
}

#[test]
fn test_setup_force_overwrites_conflicting_settings() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("auto-checkpoint", &[]);
    workspace.write("project/.claude/settings.json", "{\"model\": \"opus\"}");

    claudekit_cmd(&workspace)
        .args(["setup", "auto-checkpoint", "--force"])
        .assert()
        .success();

    let settings = workspace.read("project/.claude/settings.json");
    assert!(settings.contains("claudekit-hooks run auto-checkpoint"));
    // Unrelated keys survive the merge
    assert!(settings.contains("\"model\""));
}

#[test]
fn test_setup_empty_selection_fails() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("unrecommended", &[]);

    // No ids, no --all, nothing recommended for an empty project
    claudekit_cmd(&workspace)
        .args(["setup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to install"));
}

#[test]
fn test_setup_default_uses_recommendations() {
    let workspace = TestWorkspace::new();
    workspace.add_hook("typecheck-changed", &[]);
    workspace.add_hook("unrelated", &[]);
    workspace.write(
        "project/tsconfig.json",
        "{\"compilerOptions\": {\"strict\": true}}",
    );

    claudekit_cmd(&workspace)
        .args(["setup", "--yes"])
        .assert()
        .success();

    assert!(workspace.exists("project/.claude/hooks/typecheck-changed.sh"));
    assert!(!workspace.exists("project/.claude/hooks/unrelated.sh"));
}

#[cfg(unix)]
#[test]
fn test_setup_force_failure_rolls_back() {
    use std::os::unix::fs::PermissionsExt;

    let workspace = TestWorkspace::new();
    workspace.add_hook("solo", &[]);

    // A read-only .claude blocks the hooks subdirectory creation
    let claude_dir = workspace.project_dir().join(".claude");
    std::fs::create_dir_all(&claude_dir).unwrap();
    std::fs::set_permissions(&claude_dir, std::fs::Permissions::from_mode(0o555)).unwrap();

    claudekit_cmd(&workspace)
        .args(["setup", "solo", "--force", "--skip-settings"])
        .assert()
        .failure();

    std::fs::set_permissions(&claude_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    assert!(!workspace.exists("project/.claude/hooks"));
}

#[test]
fn test_setup_missing_source_tree_fails() {
    let workspace = TestWorkspace::new();

    claudekit_cmd(&workspace)
        .args(["setup", "anything", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source tree not found"));
}
