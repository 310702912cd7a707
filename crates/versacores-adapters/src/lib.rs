//! Infrastructure adapters for VersaCores.
//!
//! This crate implements the ports defined in `versacores-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod descriptor_loader;
pub mod filesystem;
pub mod process;
pub mod program;
pub mod resolver;

use std::path::PathBuf;

use versacores_core::application::Orchestrator;

// Re-export commonly used adapters
pub use descriptor_loader::{DESCRIPTOR_EXTENSION, TomlDescriptorLoader};
pub use filesystem::LocalFilesystem;
pub use process::TokioCommandRunner;
pub use program::ScriptProgram;
pub use resolver::{SearchPathResolver, TOP_DESCRIPTOR};

/// An orchestrator wired to the production adapters.
pub fn local_orchestrator(locations: Vec<PathBuf>) -> Orchestrator {
    Orchestrator::new(
        Box::new(TomlDescriptorLoader::new()),
        Box::new(SearchPathResolver::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(TokioCommandRunner::new()),
    )
    .with_locations(locations)
}
