//! VersaCores Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the VersaCores
//! IP core build orchestrator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         versacores-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (Orchestrator: top/create/generate)   │
//! └──────────────────┬──────────────────────┘
//!                    │ drives descriptor programs through
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │             Phase Views                 │
//! │  (TopView, CreateView, GenerateView)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Loader, Resolver, Filesystem, Runner)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   versacores-adapters (Infrastructure)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use versacores_core::prelude::*;
//!
//! let orchestrator = Orchestrator::new(loader, resolver, filesystem, runner)
//!     .with_locations(search_paths);
//! let report = orchestrator.run(Path::new(".")).await?;
//! println!("{} files", report.total_files());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BuildReport, BuildSession, CoreSummary, Orchestrator,
        ports::{
            CommandOutput, CommandRequest, CommandRunner, CoreResolver, Descriptor,
            DescriptorLoader, DescriptorProgram, Filesystem,
        },
        views::{
            CommandView, CreateView, DependencyRequest, DependencyView, ForeignDependency,
            GenerateView, Stage, TopView,
        },
    };
    pub use crate::domain::{
        CoreGraph, CoreMetadata, CoreNode, DescriptorUnit, DomainError, FileCategory, FileEntry,
        FileManifest, Hook, NodeId, ParamValue, Params, Phase, RenderContext, Target,
        UsageContext,
    };
    pub use crate::error::{ErrorCategory, VersaError, VersaResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
