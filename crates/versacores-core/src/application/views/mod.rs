//! Phase views.
//!
//! Each view wraps exactly the node state its phase may touch and exposes
//! only the operations legal in that phase. Descriptor programs never see a
//! [`CoreNode`](crate::domain::CoreNode) directly.
//!
//! | View | Phase | Operations |
//! |------|-------|------------|
//! | [`TopView`] | `TOP` | `define_target`, `set_default_target` |
//! | [`CreateView`] | `CREATE` | `depend_on`, `depend_on_foreign`, `is_singleton` |
//! | [`GenerateView`] | `GENERATE` | `add_files`, `set_top`, `run_external_command`, `dependencies` |
//! | [`CommandView`] | `CLEAN`, `GET_SOURCES`, `PREPARE_SOURCES` | `run_external_command` |

mod command;
mod create;
mod generate;
mod top;

pub use command::{CommandView, Stage};
pub use create::{CreateView, DependencyRequest, ForeignDependency};
pub use generate::{DependencyView, GenerateView};
pub use top::TopView;

pub(crate) use create::CreateHost;

use tracing::{debug, error, info};

use crate::application::{
    ApplicationError,
    ports::{CommandOutput, CommandRequest, CommandRunner},
};
use crate::domain::CoreNode;
use crate::error::VersaResult;

/// Split `command` on whitespace and run it in the node's directory.
///
/// Output lines are logged prefixed with the descriptor file name: stdout at
/// INFO, stderr at ERROR. A non-zero exit fails after logging.
pub(crate) async fn run_command(
    runner: &dyn CommandRunner,
    node: &CoreNode,
    command: &str,
) -> VersaResult<CommandOutput> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| ApplicationError::InvalidCommand {
        reason: "empty command".into(),
    })?;

    let request = CommandRequest {
        program: program.to_string(),
        args: parts.map(str::to_string).collect(),
        cwd: node.dir().to_path_buf(),
    };
    debug!(
        core = %node.name(),
        command = %request,
        cwd = %request.cwd.display(),
        "Running command"
    );

    let output = runner.run(&request).await?;

    let prefix = node.file_name();
    for line in output.stdout.lines() {
        info!("{prefix}: {line}");
    }
    for line in output.stderr.lines() {
        error!("{prefix}: {line}");
    }

    if !output.success() {
        return Err(ApplicationError::CommandFailed {
            command: request.to_string(),
            code: output.status,
        }
        .into());
    }
    Ok(output)
}
