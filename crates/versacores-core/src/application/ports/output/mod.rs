//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `versacores-adapters` crate provides implementations.
//!
//! ## Design Notes
//!
//! Generation runs on a single-threaded runtime, so none of these traits
//! require `Send + Sync` and the async ones use `async_trait(?Send)`.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::application::views::{CommandView, CreateView, GenerateView, Stage, TopView};
use crate::domain::{CoreMetadata, DescriptorUnit, Hook, Params};
use crate::error::VersaResult;

/// A loaded, validated descriptor.
pub struct Descriptor {
    pub path: PathBuf,
    pub unit: DescriptorUnit,
    pub metadata: CoreMetadata,
    pub program: Box<dyn DescriptorProgram>,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("path", &self.path)
            .field("unit", &self.unit)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// The hook table of one descriptor.
///
/// Implemented by:
/// - `versacores_adapters::program::ScriptProgram` (TOML step lists)
/// - native test programs in `tests/`
///
/// Hooks only see the view for their phase; none of them touch the node
/// directly. The orchestrator asks `has_hook` before invoking an optional one.
#[async_trait(?Send)]
pub trait DescriptorProgram {
    fn has_hook(&self, hook: Hook) -> bool;

    /// `TOP`: declare targets and pick the default. Only run for the top node.
    fn top(&self, view: &mut TopView<'_>) -> VersaResult<()>;

    /// `CREATE`: declare dependencies. `params` are the creation parameters.
    fn create(&self, view: &mut CreateView<'_>, params: &Params) -> VersaResult<()>;

    /// `GENERATE`: register files. Every dependency has finished generating.
    async fn generate(&self, view: &mut GenerateView<'_>) -> VersaResult<()>;

    /// `CLEAN`, `GET_SOURCES`, or `PREPARE_SOURCES`.
    async fn run_stage(&self, stage: Stage, view: &mut CommandView<'_>) -> VersaResult<()>;
}

/// Port for turning a descriptor file into a [`Descriptor`].
///
/// Every call yields an independent unit; nothing is cached between loads.
pub trait DescriptorLoader {
    fn load(&self, path: &Path) -> VersaResult<Descriptor>;
}

/// Port for locating descriptor files.
///
/// Implemented by:
/// - `versacores_adapters::resolver::SearchPathResolver` (production)
pub trait CoreResolver {
    /// First `<name>.versacore` found scanning `locations` in order.
    fn resolve(&self, name: &str, locations: &[PathBuf]) -> VersaResult<PathBuf>;

    /// The top descriptor of `dir`: the only descriptor there, or `top.versacore`.
    fn select_top(&self, dir: &Path) -> VersaResult<PathBuf>;
}

/// Port for the filesystem queries the generate phase needs.
///
/// Implemented by:
/// - `versacores_adapters::filesystem::LocalFilesystem` (production)
/// - `MockFilesystem` (unit tests)
#[cfg_attr(test, automock)]
pub trait Filesystem {
    /// Expand `pattern` relative to `base`. Returned paths are resolved.
    fn glob(&self, base: &Path, pattern: &str) -> VersaResult<Vec<PathBuf>>;

    fn is_file(&self, path: &Path) -> bool;

    /// Resolve `relative` against `base` the same way `glob` resolves matches.
    fn resolve(&self, base: &Path, relative: &str) -> PathBuf;
}

/// A fully split external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Port for running external commands.
///
/// Implemented by:
/// - `versacores_adapters::process::TokioCommandRunner` (production)
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait CommandRunner {
    /// Suspends until the process exits. A non-zero status is returned, not
    /// raised; only a failure to spawn is an error.
    async fn run(&self, request: &CommandRequest) -> VersaResult<CommandOutput>;
}
