//! Application services (use case orchestration).

pub mod orchestrator;

pub use orchestrator::{BuildReport, BuildSession, CoreSummary, Orchestrator};
