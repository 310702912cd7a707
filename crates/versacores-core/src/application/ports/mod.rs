//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `versacores-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DescriptorLoader`: descriptor file -> descriptor program
//!   - `CoreResolver`: core name -> descriptor path, top-core selection
//!   - `Filesystem`: glob expansion and file checks
//!   - `CommandRunner`: external process execution
//!
//! - **Descriptor programs**: `DescriptorProgram` is the hook table a loader
//!   hands back. The orchestrator drives it through the phase views.

pub mod output;

pub use output::{
    CommandOutput, CommandRequest, CommandRunner, CoreResolver, Descriptor, DescriptorLoader,
    DescriptorProgram, Filesystem,
};

#[cfg(test)]
pub use output::{MockCommandRunner, MockFilesystem};
