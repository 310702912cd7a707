//! `versacores graph`: resolve the tree without generating it.

use tracing::instrument;

use crate::{
    cli::GlobalArgs,
    commands::{orchestrator_for, print_tree, work_dir},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(global: &GlobalArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let dir = work_dir(global)?;
    let session = orchestrator_for(&dir, config).create_in(&dir)?;
    let summaries = session.summaries();

    if output.is_json() {
        return output.json(&summaries);
    }

    output.header(&format!("Dependency tree of {}", session.top().name()))?;
    print_tree(output, &summaries, false)?;
    Ok(())
}
