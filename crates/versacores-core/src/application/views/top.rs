use tracing::debug;

use crate::domain::{CoreNode, Params, RenderContext, Target};
use crate::error::VersaResult;

/// View handed to a descriptor's `TOP` hook.
pub struct TopView<'a> {
    node: &'a mut CoreNode,
}

impl<'a> TopView<'a> {
    pub(crate) fn new(node: &'a mut CoreNode) -> Self {
        Self { node }
    }

    pub fn core_name(&self) -> &str {
        self.node.name()
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::for_node(self.node)
    }

    /// Register a target. Names are unique per core.
    pub fn define_target(&mut self, name: &str, params: Params) -> VersaResult<&Target> {
        debug!(core = %self.node.name(), target = name, "Defining target");
        let core = self.node.name().to_string();
        Ok(self.node.targets.define(&core, Target::new(name, params))?)
    }

    /// Select an already-defined target as the default.
    pub fn set_default_target(&mut self, name: &str) -> VersaResult<()> {
        let core = self.node.name().to_string();
        self.node.targets.set_default(&core, name)?;
        debug!(core = %core, target = name, "Default target selected");
        Ok(())
    }
}
