// ============================================================================
// domain/error.rs - CORE GRAPH ERROR DOMAIN
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they cross the generation join barrier by value)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Descriptor content errors
    // ========================================================================
    #[error("Invalid core name '{name}': {reason}")]
    InvalidCoreName { name: String, reason: String },

    #[error("Unsupported API version '{version}' (supported: {supported})")]
    UnsupportedApiVersion { version: String, supported: String },

    #[error("Unknown file type '{0}'")]
    UnknownFileCategory(String),

    #[error("Unknown usage context '{0}'")]
    UnknownUsageContext(String),

    // ========================================================================
    // Configuration errors (raised at the call site inside a hook)
    // ========================================================================
    #[error("Core '{core}' already defines a target named '{target}'")]
    DuplicateTarget { core: String, target: String },

    #[error("Target '{target}' does not exist in core '{core}'")]
    UnknownTarget { core: String, target: String },

    #[error("The top level core ('{}') does not define a default target", path.display())]
    MissingDefaultTarget { path: PathBuf },

    #[error("Core '{core}' already has a top entry: {}", existing.display())]
    TopAlreadySet { core: String, existing: PathBuf },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Core '{core}' cannot move from phase {from} to {to}")]
    InvalidPhaseTransition {
        core: String,
        from: &'static str,
        to: &'static str,
    },

    // ========================================================================
    // Manifest errors
    // ========================================================================
    #[error("File already registered: {}", path.display())]
    DuplicateFile { path: PathBuf },

    #[error("Top entry is not a registered file: {}", path.display())]
    TopNotRegistered { path: PathBuf },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidCoreName { name, .. } => vec![
                format!("Rename the core '{}'", name),
                "Core names use letters, digits, '-' and '_' only".into(),
            ],
            Self::UnsupportedApiVersion { supported, .. } => vec![
                format!("Set API_VERSION to one of: {}", supported),
            ],
            Self::UnknownFileCategory(_) => vec![
                "Known file types: hdl, simulation, include, constraint, ip, setting, script, source"
                    .into(),
            ],
            Self::UnknownUsageContext(_) => {
                vec!["Known usage contexts: all, implementation, simulation".into()]
            }
            Self::DuplicateTarget { target, .. } => vec![
                format!("Target '{}' is defined more than once in TOP", target),
                "Give every target a unique name".into(),
            ],
            Self::UnknownTarget { target, .. } => vec![
                format!("Define target '{}' before selecting it as default", target),
            ],
            Self::MissingDefaultTarget { .. } => vec![
                "Call set_default_target in the TOP hook".into(),
                "Or remove TOP to use an implicit default target".into(),
            ],
            Self::TopAlreadySet { .. } => vec!["Call set_top only once per core".into()],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide the '{}' field", field)]
            }
            Self::DuplicateFile { path } => vec![
                format!("'{}' matched more than one add_files pattern", path.display()),
                "Make the glob patterns disjoint".into(),
            ],
            Self::TopNotRegistered { .. } => {
                vec!["Register the file with add_files before calling set_top".into()]
            }
            Self::InvalidPhaseTransition { .. } => {
                vec!["This is a bug in VersaCores, please report it".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCoreName { .. }
            | Self::UnsupportedApiVersion { .. }
            | Self::UnknownFileCategory(_)
            | Self::UnknownUsageContext(_) => ErrorCategory::Descriptor,
            Self::DuplicateTarget { .. }
            | Self::UnknownTarget { .. }
            | Self::MissingDefaultTarget { .. }
            | Self::TopAlreadySet { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Configuration,
            Self::DuplicateFile { .. } | Self::TopNotRegistered { .. } => ErrorCategory::Execution,
            Self::InvalidPhaseTransition { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed, incomplete, or mistyped descriptor.
    Descriptor,
    /// A core, or the top core, could not be located; or the graph is cyclic.
    Resolution,
    /// Illegal use of a phase view.
    Configuration,
    /// A generate-phase action failed.
    Execution,
    Internal,
}
