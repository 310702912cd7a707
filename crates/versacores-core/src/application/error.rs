//! Application layer errors.
//!
//! These errors represent failures in loading, resolution, and execution.
//! Illegal graph or view operations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Hook;
use crate::error::ErrorCategory;

/// Errors that occur while orchestrating a build.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    // ========================================================================
    // Descriptor errors
    // ========================================================================
    /// Descriptor file name has extra dot-separated groups.
    #[error("Illegal descriptor name '{}': {reason}", path.display())]
    IllegalDescriptorName { path: PathBuf, reason: String },

    /// A required attribute is absent.
    #[error("{}: missing required attribute '{attribute}'", path.display())]
    MissingAttribute { path: PathBuf, attribute: String },

    /// An attribute is present but has the wrong type.
    #[error("{}: attribute '{attribute}' must be {expected}", path.display())]
    AttributeType {
        path: PathBuf,
        attribute: String,
        expected: &'static str,
    },

    /// The file could not be read or parsed.
    #[error("{}: malformed descriptor: {reason}", path.display())]
    MalformedDescriptor { path: PathBuf, reason: String },

    /// A hook contains a step its phase does not allow.
    #[error("{}: {hook} step {index}: {reason}", path.display())]
    IllegalStep {
        path: PathBuf,
        hook: Hook,
        index: usize,
        reason: String,
    },

    // ========================================================================
    // Resolution errors
    // ========================================================================
    #[error("Core '{name}' not found")]
    CoreNotFound { name: String, searched: Vec<PathBuf> },

    #[error("No top level core in {}", dir.display())]
    TopCoreNotFound { dir: PathBuf },

    #[error("Several descriptors in {} and no top.versacore: {}", dir.display(), candidates.join(", "))]
    AmbiguousTopCore { dir: PathBuf, candidates: Vec<String> },

    #[error("Dependency cycle: {}", chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    // ========================================================================
    // Execution errors
    // ========================================================================
    #[error("Command '{command}' failed with {}", exit_description(*code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Could not start '{command}': {reason}")]
    CommandSpawn { command: String, reason: String },

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Not a regular file: {}", path.display())]
    NotARegularFile { path: PathBuf },

    #[error("Invalid glob '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("Filesystem error at {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "no exit status (terminated by signal)".into(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::IllegalDescriptorName { .. } => vec![
                "Descriptor names take the form <name>.versacore or <name>.<variant>.versacore"
                    .into(),
            ],
            Self::MissingAttribute { attribute, .. } => vec![
                format!("Add '{}' to the descriptor", attribute),
                "Required: NAME, VERSION, API_VERSION, DESCRIPTION, CREATE, GENERATE".into(),
            ],
            Self::AttributeType { attribute, expected, .. } => {
                vec![format!("Change '{}' to {}", attribute, expected)]
            }
            Self::MalformedDescriptor { .. } => vec!["Check the descriptor's TOML syntax".into()],
            Self::IllegalStep { hook, .. } => {
                vec![format!(
                    "Remove the step or move it to the hook that allows it (not {})",
                    hook
                )]
            }
            Self::CoreNotFound { name, searched } => {
                let mut out = vec![format!("Create '{}.versacore' in a search location", name)];
                if searched.is_empty() {
                    out.push("No search locations are configured".into());
                } else {
                    let dirs: Vec<String> =
                        searched.iter().map(|p| p.display().to_string()).collect();
                    out.push(format!("Searched: {}", dirs.join(", ")));
                }
                out.push("Add directories with VERSACORES_PATH or cores.search_paths".into());
                out
            }
            Self::TopCoreNotFound { .. } => vec![
                "Run versacores in a directory containing a .versacore file".into(),
                "Or pass the directory with --dir".into(),
            ],
            Self::AmbiguousTopCore { .. } => {
                vec!["Name the top level descriptor top.versacore".into()]
            }
            Self::DependencyCycle { .. } => {
                vec!["Remove one of the depend_on steps that close the cycle".into()]
            }
            Self::CommandFailed { .. } => {
                vec!["See the command output logged above".into()]
            }
            Self::CommandSpawn { command, .. } => {
                vec![format!("Check that '{}' is installed and on PATH", command)]
            }
            Self::NotARegularFile { .. } => {
                vec!["Narrow the add_files glob so it only matches files".into()]
            }
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that the path exists and is readable".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IllegalDescriptorName { .. }
            | Self::MissingAttribute { .. }
            | Self::AttributeType { .. }
            | Self::MalformedDescriptor { .. }
            | Self::IllegalStep { .. } => ErrorCategory::Descriptor,
            Self::CoreNotFound { .. }
            | Self::TopCoreNotFound { .. }
            | Self::AmbiguousTopCore { .. }
            | Self::DependencyCycle { .. } => ErrorCategory::Resolution,
            Self::CommandFailed { .. }
            | Self::CommandSpawn { .. }
            | Self::InvalidCommand { .. }
            | Self::NotARegularFile { .. }
            | Self::InvalidGlob { .. }
            | Self::Filesystem { .. } => ErrorCategory::Execution,
        }
    }
}
