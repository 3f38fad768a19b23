//! Error types and handling for claudekit
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! The taxonomy follows the pipeline: discovery errors are recovered locally
//! as per-file skips and never surface here; resolution, validation,
//! execution and conflict errors all do.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for claudekit operations
#[derive(Error, Diagnostic, Debug)]
pub enum ClaudekitError {
    // Registry errors
    #[error("Component source tree not found: {path}")]
    #[diagnostic(
        code(claudekit::registry::source_not_found),
        help("Pass --source with a directory containing hooks/, commands/ or agents/ subtrees")
    )]
    SourceTreeNotFound { path: String },

    #[error("Component '{id}' not found")]
    #[diagnostic(
        code(claudekit::registry::component_not_found),
        help("Run 'claudekit list' to see discovered components")
    )]
    ComponentNotFound { id: String },

    #[error("Invalid metadata in {path}: {reason}")]
    #[diagnostic(code(claudekit::registry::metadata_invalid))]
    MetadataInvalid { path: String, reason: String },

    // Dependency errors
    #[error("Circular dependency detected: {chain}")]
    #[diagnostic(
        code(claudekit::deps::circular),
        help("Remove the circular dependency from the component metadata headers")
    )]
    CircularDependency { chain: String },

    // Plan validation and execution errors
    #[error("Install step failed for '{component_id}': {reason}")]
    #[diagnostic(
        code(claudekit::install::step_failed),
        help("All changes applied before the failure were rolled back")
    )]
    StepFailed { component_id: String, reason: String },

    #[error("Installation failed: {reason}")]
    #[diagnostic(
        code(claudekit::install::failed),
        help("Fix the listed problems or re-run with --force to continue anyway")
    )]
    InstallFailed { reason: String },

    #[error("Nothing to install: no components selected")]
    #[diagnostic(
        code(claudekit::install::empty_selection),
        help("Pass component ids, or --all to select every enabled component")
    )]
    EmptySelection,

    // Settings errors
    #[error("Refusing to overwrite {path}: existing settings differ")]
    #[diagnostic(
        code(claudekit::settings::conflict),
        help("Re-run interactively, or pass --force to overwrite the existing settings")
    )]
    SettingsConflict { path: String },

    #[error("Failed to parse settings file: {path}")]
    #[diagnostic(code(claudekit::settings::parse_failed))]
    SettingsParseFailed { path: String, reason: String },

    // Environment and file system errors
    #[error("Could not determine the user home directory")]
    #[diagnostic(
        code(claudekit::env::home_not_found),
        help("Set HOME, or pass an explicit user directory with --user-dir")
    )]
    HomeDirNotFound,

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(claudekit::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(claudekit::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(claudekit::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for ClaudekitError {
    fn from(err: std::io::Error) -> Self {
        ClaudekitError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClaudekitError {
    fn from(err: serde_json::Error) -> Self {
        ClaudekitError::SettingsParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ClaudekitError {
    fn from(err: serde_yaml::Error) -> Self {
        ClaudekitError::MetadataInvalid {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ClaudekitError {
    fn from(err: inquire::InquireError) -> Self {
        ClaudekitError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ClaudekitError>;
