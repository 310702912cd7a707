//! External command execution on the tokio runtime.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use versacores_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandRequest, CommandRunner},
    },
    error::VersaResult,
};

/// Runs commands as child processes with captured output.
///
/// Children are killed when the run future is dropped, so a cancelled
/// generation does not leave processes behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl CommandRunner for TokioCommandRunner {
    #[instrument(skip(self), fields(command = %request, cwd = %request.cwd.display()))]
    async fn run(&self, request: &CommandRequest) -> VersaResult<CommandOutput> {
        let child = Command::new(&request.program)
            .args(&request.args)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ApplicationError::CommandSpawn {
                command: request.to_string(),
                reason: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ApplicationError::CommandSpawn {
                command: request.to_string(),
                reason: format!("failed to collect output: {e}"),
            })?;

        debug!(status = ?output.status.code(), "Command finished");
        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use versacores_core::error::VersaError;

    fn request(program: &str, args: &[&str], cwd: &Path) -> CommandRequest {
        CommandRequest {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn captures_stdout_and_stderr() {
        let temp = TempDir::new().unwrap();
        let output = TokioCommandRunner::new()
            .run(&request("sh", &["-c", "echo out; echo err >&2"], temp.path()))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn non_zero_status_is_returned() {
        let temp = TempDir::new().unwrap();
        let output = TokioCommandRunner::new()
            .run(&request("sh", &["-c", "exit 3"], temp.path()))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.status, Some(3));
    }

    #[tokio::test]
    async fn runs_in_requested_directory() {
        let temp = TempDir::new().unwrap();
        let output = TokioCommandRunner::new()
            .run(&request("pwd", &[], temp.path()))
            .await
            .unwrap();

        let reported = PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let temp = TempDir::new().unwrap();
        let err = TokioCommandRunner::new()
            .run(&request("versacores-no-such-tool", &["x"], temp.path()))
            .await
            .unwrap_err();

        match err {
            VersaError::Application(ApplicationError::CommandSpawn { command, .. }) => {
                assert_eq!(command, "versacores-no-such-tool x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
