//! Terminal interaction seams
//!
//! The merge logic never talks to a terminal directly: confirmation is a
//! capability injected by the caller, so the engine stays testable without
//! a PTY. The CLI injects [`InquireConfirm`]; tests inject scripted
//! answers.

use console::Style;

use crate::error::Result;
use crate::installer::InstallResult;

/// Yes/no confirmation capability
///
/// The single suspension point in the pipeline; callers pause progress
/// output for its duration.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Interactive confirmation backed by `inquire`
#[derive(Debug, Default)]
pub struct InquireConfirm;

impl Confirm for InquireConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(inquire::Confirm::new(prompt).with_default(true).prompt()?)
    }
}

/// Fixed answer, for tests and `--yes` flows
#[derive(Debug)]
pub struct AlwaysConfirm(pub bool);

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// Print what a dry run would have done
pub fn print_dry_run_summary(result: &InstallResult) {
    for warning in &result.warnings {
        println!(
            "{} {}",
            Style::new().yellow().bold().apply_to("warning:"),
            warning
        );
    }

    println!(
        "{} {} component(s)",
        Style::new().bold().apply_to("Would install"),
        result.installed.len()
    );
    for id in &result.installed {
        println!("  {}", Style::new().cyan().apply_to(id));
    }
    println!("Dry run: no files were changed.");
}

/// Print the outcome of an install run
pub fn print_install_summary(result: &InstallResult) {
    for warning in &result.warnings {
        println!(
            "{} {}",
            Style::new().yellow().bold().apply_to("warning:"),
            warning
        );
    }

    if !result.installed.is_empty() {
        println!(
            "{} {} component(s)",
            Style::new().green().bold().apply_to("Installed"),
            result.installed.len()
        );
        for id in &result.installed {
            println!("  {}", Style::new().cyan().apply_to(id));
        }
    }

    if !result.skipped.is_empty() {
        println!(
            "{} {} component(s) already up to date",
            Style::new().bold().apply_to("Skipped"),
            result.skipped.len()
        );
    }

    for backup in &result.backups {
        println!(
            "{} {} -> {} ({})",
            Style::new().bold().apply_to("Backup:"),
            backup.original_path.display(),
            backup.backup_path.display(),
            Style::new().dim().apply_to(&backup.content_hash),
        );
    }

    for error in &result.errors {
        eprintln!(
            "{} {}",
            Style::new().red().bold().apply_to("error:"),
            error
        );
    }
}
