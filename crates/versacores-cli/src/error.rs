//! Error handling for the VersaCores CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use versacores_core::error::{ErrorCategory, VersaError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration file could not be read, parsed, or queried.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The `-C` directory could not be used.
    #[error("Cannot use directory {}: {reason}", path.display())]
    InvalidDirectory { path: PathBuf, reason: String },

    /// An error propagated from the orchestrator.
    ///
    /// Wrapped here so that the CLI can attach suggestions drawn from the
    /// core error's category without touching core internals.
    #[error("Build failed: {0}")]
    Core(#[from] VersaError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Exit codes by failure class.
pub mod exit {
    pub const INTERNAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const RESOLUTION: u8 = 3;
    pub const CONFIGURATION: u8 = 4;
    pub const DESCRIPTOR: u8 = 5;
    pub const EXECUTION: u8 = 6;
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Show the default config location: versacores config path".into(),
            ],

            Self::InvalidDirectory { path, .. } => vec![
                format!("Check that '{}' exists and is a directory", path.display()),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { .. } => vec!["Check file permissions".into()],

            Self::Serialize(_) => vec!["This appears to be a bug in VersaCores".into()],
        }
    }

    /// Failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::InvalidDirectory { .. } => ErrorCategory::Resolution,
            Self::Core(core) => core.category(),
            Self::IoError { .. } | Self::Serialize(_) => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | Resolution    |  3   |
    /// | Configuration |  4   |
    /// | Descriptor    |  5   |
    /// | Execution     |  6   |
    ///
    /// Code 2 is reserved for argument errors reported by clap.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => exit::INTERNAL,
            ErrorCategory::Resolution => exit::RESOLUTION,
            ErrorCategory::Configuration => exit::CONFIGURATION,
            ErrorCategory::Descriptor => exit::DESCRIPTOR,
            ErrorCategory::Execution => exit::EXECUTION,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::Descriptor => tracing::error!("Descriptor error: {}", self),
            ErrorCategory::Resolution => tracing::error!("Resolution error: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Execution => tracing::error!("Execution error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}
