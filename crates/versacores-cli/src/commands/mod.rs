//! Command handlers. Each translates parsed arguments into orchestrator
//! calls and renders the result; no build logic lives here.

pub mod build;
pub mod clean;
pub mod completions;
pub mod config;
pub mod graph;

use std::path::{Path, PathBuf};

use tracing::debug;

use versacores_adapters::local_orchestrator;
use versacores_core::application::{CoreSummary, Orchestrator};

use crate::{
    cli::GlobalArgs,
    config::{AppConfig, SEARCH_PATH_ENV},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// The directory holding the top core: `-C DIR` or the process cwd.
pub(crate) fn work_dir(global: &GlobalArgs) -> CliResult<PathBuf> {
    let dir = match &global.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    dir.canonicalize()
        .map_err(|e| CliError::InvalidDirectory {
            path: dir.clone(),
            reason: e.to_string(),
        })
}

/// Orchestrator over the local adapters, searching `work_dir` first.
pub(crate) fn orchestrator_for(work_dir: &Path, config: &AppConfig) -> Orchestrator {
    let env_path = std::env::var(SEARCH_PATH_ENV).ok();
    let locations = config.search_locations(work_dir, env_path.as_deref());
    debug!(?locations, "Search locations");
    local_orchestrator(locations)
}

/// One tree line per core, indented by depth.
pub(crate) fn print_tree(
    output: &OutputManager,
    summaries: &[CoreSummary],
    with_files: bool,
) -> CliResult<()> {
    for summary in summaries {
        let indent = "  ".repeat(summary.depth);
        let target = summary
            .target
            .as_deref()
            .map(|t| format!(" [{t}]"))
            .unwrap_or_default();
        output.print(&format!(
            "{indent}{} {}{target}",
            summary.name, summary.version
        ))?;

        if !with_files {
            output.detail(&format!("{indent}  {}", summary.path.display()))?;
            continue;
        }

        let counts: Vec<String> = summary
            .file_counts
            .iter()
            .map(|(category, n)| format!("{category} {n}"))
            .collect();
        let counts = if counts.is_empty() {
            "no files".to_string()
        } else {
            counts.join(", ")
        };
        output.detail(&format!("{indent}  files: {counts}"))?;

        if let Some(top) = &summary.top {
            let shown = summary
                .path
                .parent()
                .and_then(|dir| top.strip_prefix(dir).ok())
                .unwrap_or(top.as_path());
            output.detail(&format!("{indent}  top:   {}", shown.display()))?;
        }
    }
    Ok(())
}
