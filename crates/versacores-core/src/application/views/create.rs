use tracing::{debug, info};

use crate::domain::{CoreNode, DomainError, NodeId, ParamValue, Params, RenderContext};
use crate::error::VersaResult;

/// Arguments of a `depend_on` call.
///
/// `version` and `repo` are informational: they show up in logs and nothing
/// else. There is no version constraint solving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyRequest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub repo: Option<String>,
    pub params: Params,
}

impl DependencyRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Arguments of a `depend_on_foreign` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignDependency {
    pub name: String,
    pub kind: String,
    pub params: Params,
}

/// The part of graph construction a [`CreateView`] may call back into.
pub(crate) trait CreateHost {
    fn node(&self, id: NodeId) -> &CoreNode;

    fn node_mut(&mut self, id: NodeId) -> &mut CoreNode;

    /// Resolve, load, and fully create a child of `parent`, returning its id.
    /// The parent's dependency list is not touched.
    fn create_dependency(
        &mut self,
        parent: NodeId,
        name: &str,
        request: &DependencyRequest,
    ) -> VersaResult<NodeId>;
}

/// View handed to a descriptor's `CREATE` hook.
pub struct CreateView<'a> {
    host: &'a mut dyn CreateHost,
    node: NodeId,
}

impl<'a> CreateView<'a> {
    pub(crate) fn new(host: &'a mut dyn CreateHost, node: NodeId) -> Self {
        Self { host, node }
    }

    pub fn core_name(&self) -> &str {
        self.host.node(self.node).name()
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext::for_node(self.host.node(self.node))
    }

    /// Resolve `request.name`, build and create the child, then append it to
    /// this core's dependency list.
    ///
    /// The list is only touched once the child is fully created, so a
    /// failure leaves it unchanged.
    pub fn depend_on(&mut self, request: DependencyRequest) -> VersaResult<()> {
        let name = request
            .name
            .as_deref()
            .ok_or(DomainError::MissingRequiredField { field: "name" })?;

        debug!(
            core = %self.core_name(),
            dependency = name,
            version = request.version.as_deref().unwrap_or("any"),
            repo = request.repo.as_deref().unwrap_or("-"),
            "Declaring dependency"
        );

        let child = self.host.create_dependency(self.node, name, &request)?;
        self.host.node_mut(self.node).dependencies.push(child);
        Ok(())
    }

    /// Reserved extension point. Logged and otherwise ignored.
    pub fn depend_on_foreign(&mut self, dependency: ForeignDependency) -> VersaResult<()> {
        info!(
            core = %self.core_name(),
            name = %dependency.name,
            kind = %dependency.kind,
            "Foreign dependencies are not supported yet, ignoring"
        );
        Ok(())
    }

    /// Advisory. Every `depend_on` still creates a fresh node.
    pub fn is_singleton(&mut self, singleton: bool) {
        self.host.node_mut(self.node).singleton = singleton;
    }
}
