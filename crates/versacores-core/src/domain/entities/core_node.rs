//! Core nodes and the arena that owns them.
//!
//! ```text
//! CoreGraph (arena)
//! ├── NodeId(0)  top.versacore       Created
//! │   ├── NodeId(1)  fifo.versacore  Created
//! │   │   └── NodeId(2)  ram.versacore
//! │   └── NodeId(3)  uart.versacore
//! ```
//!
//! A node's `dependencies` are indices into the same arena. Every node has
//! exactly one parent (except the root) so the arena is a tree, even when the
//! same descriptor is depended on twice.

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::{
    capabilities,
    entities::{manifest::FileManifest, target::TargetSet},
    error::DomainError,
    value_objects::{Params, fingerprint},
};

/// Index of a node inside a [`CoreGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one descriptor load.
///
/// Loading the same file twice yields two units with distinct ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorUnit {
    id: Uuid,
    name: String,
}

impl DescriptorUnit {
    /// `stem` is the descriptor's file stem; the unit name keeps the part
    /// before the first dot and appends the id.
    pub fn new(stem: &str) -> Self {
        let id = Uuid::new_v4();
        let base = stem.split('.').next().unwrap_or(stem);
        Self {
            id,
            name: format!("{base}-{}", id.simple()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Validated descriptor metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreMetadata {
    name: String,
    version: String,
    api_version: String,
    description: String,
}

impl CoreMetadata {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        api_version: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let api_version = api_version.into();

        if name.is_empty() {
            return Err(DomainError::InvalidCoreName {
                name,
                reason: "name is empty".into(),
            });
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DomainError::InvalidCoreName {
                reason: format!("illegal character '{c}'"),
                name,
            });
        }
        if !capabilities::is_supported_api_version(&api_version) {
            return Err(DomainError::UnsupportedApiVersion {
                version: api_version,
                supported: capabilities::SUPPORTED_API_VERSIONS.join(", "),
            });
        }

        Ok(Self {
            name,
            version: version.into(),
            api_version,
            description: description.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Lifecycle phase of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Loaded,
    Topped,
    Created,
    Sourced,
    Generated,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Topped => "topped",
            Self::Created => "created",
            Self::Sourced => "sourced",
            Self::Generated => "generated",
        }
    }

    /// Source stages are optional, so `Created` may go straight to `Generated`.
    pub const fn can_advance_to(&self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::Loaded, Self::Topped)
                | (Self::Topped, Self::Created)
                | (Self::Created, Self::Sourced)
                | (Self::Created, Self::Generated)
                | (Self::Sourced, Self::Generated)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One core in the dependency graph.
#[derive(Debug, Clone)]
pub struct CoreNode {
    id: NodeId,
    path: PathBuf,
    unit: DescriptorUnit,
    metadata: CoreMetadata,
    phase: Phase,
    pub targets: TargetSet,
    pub params: Params,
    pub singleton: bool,
    pub dependencies: Vec<NodeId>,
    pub manifest: FileManifest,
}

impl CoreNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the descriptor lives in. Globs and commands resolve against it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Descriptor file name, used to prefix command output.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.metadata.name.clone())
    }

    pub fn unit(&self) -> &DescriptorUnit {
        &self.unit
    }

    pub fn metadata(&self) -> &CoreMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.params)
    }

    pub fn advance(&mut self, next: Phase) -> Result<(), DomainError> {
        if !self.phase.can_advance_to(next) {
            return Err(DomainError::InvalidPhaseTransition {
                core: self.metadata.name.clone(),
                from: self.phase.as_str(),
                to: next.as_str(),
            });
        }
        self.phase = next;
        Ok(())
    }
}

/// Arena of core nodes.
#[derive(Debug, Clone, Default)]
pub struct CoreGraph {
    nodes: Vec<CoreNode>,
}

impl CoreGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly loaded node. The first node inserted is the root.
    pub fn insert(
        &mut self,
        path: impl Into<PathBuf>,
        unit: DescriptorUnit,
        metadata: CoreMetadata,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CoreNode {
            id,
            path: path.into(),
            unit,
            metadata,
            phase: Phase::Loaded,
            targets: TargetSet::new(),
            params: Params::new(),
            singleton: false,
            dependencies: Vec::new(),
            manifest: FileManifest::new(),
        });
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    /// Panics on an id from another graph, like slice indexing.
    pub fn node(&self, id: NodeId) -> &CoreNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CoreNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&CoreNode> {
        self.nodes.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoreNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first post-order from `from`: dependencies in declaration order,
    /// then the node itself.
    pub fn post_order(&self, from: NodeId) -> Vec<NodeId> {
        fn visit(graph: &CoreGraph, id: NodeId, out: &mut Vec<NodeId>) {
            for &dep in &graph.node(id).dependencies {
                visit(graph, dep, out);
            }
            out.push(id);
        }

        let mut out = Vec::with_capacity(self.nodes.len());
        visit(self, from, &mut out);
        out
    }

    /// Depth of every node below `from`, in pre-order. Used for tree display.
    pub fn pre_order_with_depth(&self, from: NodeId) -> Vec<(usize, NodeId)> {
        fn visit(graph: &CoreGraph, id: NodeId, depth: usize, out: &mut Vec<(usize, NodeId)>) {
            out.push((depth, id));
            for &dep in &graph.node(id).dependencies {
                visit(graph, dep, depth + 1, out);
            }
        }

        let mut out = Vec::with_capacity(self.nodes.len());
        visit(self, from, 0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> CoreMetadata {
        CoreMetadata::new(name, "1.0.0", "0.1", "test core").unwrap()
    }

    #[test]
    fn metadata_rejects_bad_names() {
        assert!(matches!(
            CoreMetadata::new("", "1", "0.1", ""),
            Err(DomainError::InvalidCoreName { .. })
        ));
        assert!(matches!(
            CoreMetadata::new("my core", "1", "0.1", ""),
            Err(DomainError::InvalidCoreName { .. })
        ));
        assert!(CoreMetadata::new("my_core-2", "1", "0.1", "").is_ok());
    }

    #[test]
    fn metadata_rejects_unsupported_api() {
        let err = CoreMetadata::new("a", "1", "9.9", "").unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedApiVersion { .. }));
    }

    #[test]
    fn units_are_unique_per_load() {
        let a = DescriptorUnit::new("fifo");
        let b = DescriptorUnit::new("fifo");
        assert_ne!(a.id(), b.id());
        assert_ne!(a.name(), b.name());
        assert!(a.name().starts_with("fifo-"));
    }

    #[test]
    fn unit_name_drops_extra_stem_part() {
        let unit = DescriptorUnit::new("fifo.xilinx");
        assert!(unit.name().starts_with("fifo-"));
    }

    #[test]
    fn phase_transitions() {
        let mut graph = CoreGraph::new();
        let id = graph.insert("/c/a.versacore", DescriptorUnit::new("a"), meta("a"));
        let node = graph.node_mut(id);

        assert!(node.advance(Phase::Created).is_err());
        node.advance(Phase::Topped).unwrap();
        node.advance(Phase::Created).unwrap();
        node.advance(Phase::Generated).unwrap();
        let err = node.advance(Phase::Generated).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPhaseTransition { .. }));
    }

    #[test]
    fn post_order_visits_dependencies_first() {
        let mut graph = CoreGraph::new();
        let a = graph.insert("/c/a.versacore", DescriptorUnit::new("a"), meta("a"));
        let b = graph.insert("/c/b.versacore", DescriptorUnit::new("b"), meta("b"));
        let c = graph.insert("/c/c.versacore", DescriptorUnit::new("c"), meta("c"));
        let d = graph.insert("/c/d.versacore", DescriptorUnit::new("d"), meta("d"));
        graph.node_mut(a).dependencies = vec![b, d];
        graph.node_mut(b).dependencies = vec![c];

        assert_eq!(graph.root(), Some(a));
        assert_eq!(graph.post_order(a), vec![c, b, d, a]);
        assert_eq!(
            graph.pre_order_with_depth(a),
            vec![(0, a), (1, b), (2, c), (1, d)]
        );
    }

    #[test]
    fn node_dir_is_descriptor_parent() {
        let mut graph = CoreGraph::new();
        let id = graph.insert("/cores/a/a.versacore", DescriptorUnit::new("a"), meta("a"));
        assert_eq!(graph.node(id).dir(), Path::new("/cores/a"));
        assert_eq!(graph.node(id).file_name(), "a.versacore");
    }
}
