use std::fmt;

use crate::application::{
    ports::{CommandOutput, CommandRunner},
    views::run_command,
};
use crate::domain::{CoreNode, Hook, RenderContext};
use crate::error::VersaResult;

/// Hooks whose only capability is running commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Clean,
    GetSources,
    PrepareSources,
}

impl Stage {
    pub const fn hook(&self) -> Hook {
        match self {
            Self::Clean => Hook::Clean,
            Self::GetSources => Hook::GetSources,
            Self::PrepareSources => Hook::PrepareSources,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.hook(), f)
    }
}

/// View handed to `CLEAN`, `GET_SOURCES`, and `PREPARE_SOURCES`.
pub struct CommandView<'a> {
    node: &'a CoreNode,
    runner: &'a dyn CommandRunner,
}

impl<'a> CommandView<'a> {
    pub(crate) fn new(node: &'a CoreNode, runner: &'a dyn CommandRunner) -> Self {
        Self { node, runner }
    }

    pub fn core_name(&self) -> &str {
        self.node.name()
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::for_node(self.node)
    }

    pub async fn run_external_command(&self, command: &str) -> VersaResult<CommandOutput> {
        run_command(self.runner, self.node, command).await
    }
}
