//! `versacores clean`: run every `CLEAN` hook, dependencies first.

use serde::Serialize;
use tracing::instrument;

use crate::{
    cli::GlobalArgs,
    commands::{orchestrator_for, work_dir},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Serialize)]
struct CleanReport {
    cleaned: usize,
}

#[instrument(skip_all)]
pub async fn execute(
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let dir = work_dir(global)?;
    let cleaned = orchestrator_for(&dir, config).clean(&dir).await?;

    if output.is_json() {
        return output.json(&CleanReport { cleaned });
    }
    if cleaned == 0 {
        output.warning("No core declares a CLEAN hook")?;
    } else {
        output.success(&format!("Cleaned {cleaned} cores"))?;
    }
    Ok(())
}
