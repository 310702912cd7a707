//! `versacores build`: the default flow.

use tracing::instrument;

use crate::{
    cli::GlobalArgs,
    commands::{orchestrator_for, print_tree, work_dir},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Build the top core of the working directory and report every manifest.
#[instrument(skip_all)]
pub async fn execute(
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let dir = work_dir(global)?;
    let orchestrator = orchestrator_for(&dir, config);

    let report = orchestrator.run(&dir).await?;
    let summaries = report.summaries();

    if output.is_json() {
        return output.json(&summaries);
    }

    output.header(&format!("Build of {}", report.top().name()))?;
    print_tree(output, &summaries, true)?;
    output.success(&format!(
        "{} cores generated, {} files registered",
        report.graph().len(),
        report.total_files()
    ))?;
    Ok(())
}
