//! Application layer for VersaCores.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Orchestrator)
//! - **Views**: Capability-scoped facades handed to descriptor hooks
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Graph invariants
//! live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;
pub mod views;

// Re-export main services
pub use services::{
    BuildReport, BuildSession,
    CoreSummary, // DTO for per-core display
    Orchestrator,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandOutput, CommandRequest, CommandRunner, CoreResolver, Descriptor, DescriptorLoader,
    DescriptorProgram, Filesystem,
};

pub use error::ApplicationError;
