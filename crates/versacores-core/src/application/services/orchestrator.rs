//! Orchestrator - main application service.
//!
//! This service drives a build across the whole core tree:
//! 1. Select the top descriptor in a directory
//! 2. Load it, run `TOP`, then `CREATE` recursively (synchronous, depth-first)
//! 3. Run `GET_SOURCES` / `PREPARE_SOURCES` bottom-up
//! 4. Run `GENERATE` bottom-up, every node's dependencies concurrently
//!
//! It also drives `CLEAN` over a freshly created tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, try_join_all};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, CoreResolver, DescriptorLoader, DescriptorProgram, Filesystem},
        views::{
            CommandView, CreateHost, CreateView, DependencyRequest, DependencyView, GenerateView,
            Stage, TopView,
        },
    },
    domain::{
        CoreGraph, CoreNode, DomainError, FileCategory, FileEntry, FileManifest, Hook, NodeId,
        Params, Phase, TargetSet,
    },
    error::VersaResult,
};

/// Per-core information for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreSummary {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    /// Distance from the top core.
    pub depth: usize,
    pub target: Option<String>,
    pub dependencies: Vec<String>,
    pub files: Vec<FileEntry>,
    pub file_counts: BTreeMap<FileCategory, usize>,
    pub top: Option<PathBuf>,
}

impl CoreSummary {
    fn from_node(node: &CoreNode, depth: usize, graph: &CoreGraph) -> Self {
        let mut file_counts = BTreeMap::new();
        for entry in node.manifest.entries() {
            *file_counts.entry(entry.category).or_insert(0) += 1;
        }

        Self {
            name: node.name().to_string(),
            version: node.metadata().version().to_string(),
            path: node.path().to_path_buf(),
            depth,
            target: node.targets.default_target().map(|t| t.name().to_string()),
            dependencies: node
                .dependencies
                .iter()
                .map(|d| graph.node(*d).name().to_string())
                .collect(),
            files: node.manifest.entries().to_vec(),
            file_counts,
            top: node.manifest.top().map(Path::to_path_buf),
        }
    }
}

fn summarize(graph: &CoreGraph, root: NodeId) -> Vec<CoreSummary> {
    graph
        .pre_order_with_depth(root)
        .into_iter()
        .map(|(depth, id)| CoreSummary::from_node(graph.node(id), depth, graph))
        .collect()
}

/// A created core tree, ready for the source stages and generation.
pub struct BuildSession {
    graph: CoreGraph,
    programs: Vec<Rc<dyn DescriptorProgram>>,
    root: NodeId,
}

impl std::fmt::Debug for BuildSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildSession")
            .field("graph", &self.graph)
            .field("programs", &self.programs.len())
            .field("root", &self.root)
            .finish()
    }
}

impl BuildSession {
    pub fn graph(&self) -> &CoreGraph {
        &self.graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn top(&self) -> &CoreNode {
        self.graph.node(self.root)
    }

    /// Tree in pre-order, for display.
    pub fn summaries(&self) -> Vec<CoreSummary> {
        summarize(&self.graph, self.root)
    }

    fn program(&self, id: NodeId) -> Rc<dyn DescriptorProgram> {
        Rc::clone(&self.programs[id.index()])
    }
}

/// Outcome of a successful generation.
#[derive(Debug, Clone)]
pub struct BuildReport {
    graph: CoreGraph,
    root: NodeId,
}

impl BuildReport {
    pub fn graph(&self) -> &CoreGraph {
        &self.graph
    }

    pub fn top(&self) -> &CoreNode {
        self.graph.node(self.root)
    }

    pub fn summaries(&self) -> Vec<CoreSummary> {
        summarize(&self.graph, self.root)
    }

    pub fn total_files(&self) -> usize {
        self.graph.iter().map(|n| n.manifest.len()).sum()
    }
}

/// Main build service.
pub struct Orchestrator {
    loader: Box<dyn DescriptorLoader>,
    resolver: Box<dyn CoreResolver>,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    locations: Vec<PathBuf>,
}

impl Orchestrator {
    /// Create a new orchestrator with the given adapters and no search locations.
    pub fn new(
        loader: Box<dyn DescriptorLoader>,
        resolver: Box<dyn CoreResolver>,
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            loader,
            resolver,
            filesystem,
            runner,
            locations: Vec::new(),
        }
    }

    /// Ordered directories scanned for `<name>.versacore`.
    pub fn with_locations(mut self, locations: Vec<PathBuf>) -> Self {
        self.locations = locations;
        self
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Full build of the top core in `dir`.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub async fn run(&self, dir: &Path) -> VersaResult<BuildReport> {
        let mut session = self.create_in(dir)?;
        self.prepare_sources(&mut session).await?;
        let report = self.generate(session).await?;
        info!(
            cores = report.graph().len(),
            files = report.total_files(),
            "Build completed successfully"
        );
        Ok(report)
    }

    /// Select the top core of `dir` and create its tree.
    pub fn create_in(&self, dir: &Path) -> VersaResult<BuildSession> {
        let top = self.resolver.select_top(dir)?;
        info!(top = %top.display(), "Top core selected");
        self.create_tree(&top)
    }

    /// Load `top_path` as the top core, run `TOP`, then create the whole tree.
    #[instrument(skip_all, fields(top = %top_path.display()))]
    pub fn create_tree(&self, top_path: &Path) -> VersaResult<BuildSession> {
        let mut builder = GraphBuilder::new(self);
        let root = builder.load(top_path)?;
        builder.top(root)?;

        let params = builder
            .graph
            .node(root)
            .targets
            .default_target()
            .map(|t| t.params().clone())
            .unwrap_or_default();
        builder.create(root, params)?;

        let session = builder.finish(root);
        check_singletons(&session.graph);
        info!(cores = session.graph.len(), "Core tree created");
        Ok(session)
    }

    /// Run `GET_SOURCES` then `PREPARE_SOURCES` for every core, dependencies first.
    #[instrument(skip_all)]
    pub async fn prepare_sources(&self, session: &mut BuildSession) -> VersaResult<()> {
        for id in session.graph.post_order(session.root) {
            let program = session.program(id);
            for stage in [Stage::GetSources, Stage::PrepareSources] {
                if !program.has_hook(stage.hook()) {
                    continue;
                }
                debug!(core = %session.graph.node(id).name(), %stage, "Running stage");
                let mut view = CommandView::new(session.graph.node(id), self.runner.as_ref());
                program.run_stage(stage, &mut view).await?;
            }
            session.graph.node_mut(id).advance(Phase::Sourced)?;
        }
        Ok(())
    }

    /// Generate the whole tree. A node's `GENERATE` starts only after all of
    /// its dependencies have generated; siblings generate concurrently.
    #[instrument(skip_all, fields(top = %session.top().name()))]
    pub async fn generate(&self, session: BuildSession) -> VersaResult<BuildReport> {
        let BuildSession {
            mut graph,
            programs,
            root,
        } = session;

        let generated = generate_node(
            &graph,
            &programs,
            root,
            self.filesystem.as_ref(),
            self.runner.as_ref(),
        )
        .await?;

        let mut pending = vec![generated];
        while let Some(done) = pending.pop() {
            let node = graph.node_mut(done.id);
            node.manifest = done.manifest;
            node.advance(Phase::Generated)?;
            pending.extend(done.dependencies);
        }

        Ok(BuildReport { graph, root })
    }

    /// Create the tree of `dir` and run every `CLEAN` hook, dependencies first.
    /// Returns the number of cores that had a `CLEAN` hook.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub async fn clean(&self, dir: &Path) -> VersaResult<usize> {
        let session = self.create_in(dir)?;
        let mut cleaned = 0;

        for id in session.graph.post_order(session.root) {
            let program = session.program(id);
            if !program.has_hook(Hook::Clean) {
                continue;
            }
            let mut view = CommandView::new(session.graph.node(id), self.runner.as_ref());
            program.run_stage(Stage::Clean, &mut view).await?;
            cleaned += 1;
        }

        info!(cleaned, "Clean completed");
        Ok(cleaned)
    }
}

// ============================================================================
// Create phase
// ============================================================================

/// Builds the arena during `TOP` and `CREATE`.
///
/// `resolving` holds the descriptors on the current creation path, root
/// first, so a `depend_on` back to any of them is a cycle.
struct GraphBuilder<'o> {
    orchestrator: &'o Orchestrator,
    graph: CoreGraph,
    programs: Vec<Rc<dyn DescriptorProgram>>,
    resolving: Vec<(PathBuf, String)>,
}

impl<'o> GraphBuilder<'o> {
    fn new(orchestrator: &'o Orchestrator) -> Self {
        Self {
            orchestrator,
            graph: CoreGraph::new(),
            programs: Vec::new(),
            resolving: Vec::new(),
        }
    }

    fn load(&mut self, path: &Path) -> VersaResult<NodeId> {
        let descriptor = self.orchestrator.loader.load(path)?;
        debug!(
            core = %descriptor.metadata.name(),
            unit = %descriptor.unit.name(),
            "Descriptor loaded"
        );
        let id = self
            .graph
            .insert(descriptor.path, descriptor.unit, descriptor.metadata);
        self.programs.push(Rc::from(descriptor.program));
        Ok(id)
    }

    /// `Loaded -> Topped` for the top core.
    fn top(&mut self, id: NodeId) -> VersaResult<()> {
        let program = Rc::clone(&self.programs[id.index()]);
        let node = self.graph.node_mut(id);

        if program.has_hook(Hook::Top) {
            program.top(&mut TopView::new(node))?;
            if node.targets.default_target().is_none() {
                return Err(DomainError::MissingDefaultTarget {
                    path: node.path().to_path_buf(),
                }
                .into());
            }
        } else {
            node.targets = TargetSet::implicit();
        }

        node.advance(Phase::Topped)?;
        Ok(())
    }

    /// `Loaded -> Topped` for a dependency: the implicit `default` target.
    fn implicit_top(&mut self, id: NodeId) -> VersaResult<()> {
        let node = self.graph.node_mut(id);
        node.targets = TargetSet::implicit();
        node.advance(Phase::Topped)?;
        Ok(())
    }

    /// `Topped -> Created`, recursing into every declared dependency.
    fn create(&mut self, id: NodeId, params: Params) -> VersaResult<()> {
        let program = Rc::clone(&self.programs[id.index()]);
        let node = self.graph.node_mut(id);
        node.params = params.clone();
        self.resolving
            .push((node.path().to_path_buf(), node.name().to_string()));

        let result = program.create(&mut CreateView::new(self, id), &params);
        self.resolving.pop();
        result?;

        let node = self.graph.node_mut(id);
        node.advance(Phase::Created)?;
        debug!(core = %node.name(), dependencies = node.dependencies.len(), "Core created");
        Ok(())
    }

    fn finish(self, root: NodeId) -> BuildSession {
        BuildSession {
            graph: self.graph,
            programs: self.programs,
            root,
        }
    }
}

impl CreateHost for GraphBuilder<'_> {
    fn node(&self, id: NodeId) -> &CoreNode {
        self.graph.node(id)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut CoreNode {
        self.graph.node_mut(id)
    }

    fn create_dependency(
        &mut self,
        parent: NodeId,
        name: &str,
        request: &DependencyRequest,
    ) -> VersaResult<NodeId> {
        let path = self
            .orchestrator
            .resolver
            .resolve(name, &self.orchestrator.locations)?;

        if let Some(pos) = self.resolving.iter().position(|(p, _)| *p == path) {
            let mut chain: Vec<String> =
                self.resolving[pos..].iter().map(|(_, n)| n.clone()).collect();
            chain.push(name.to_string());
            return Err(ApplicationError::DependencyCycle { chain }.into());
        }

        debug!(
            parent = %self.graph.node(parent).name(),
            dependency = name,
            path = %path.display(),
            "Dependency resolved"
        );

        let child = self.load(&path)?;
        self.implicit_top(child)?;
        self.create(child, request.params.clone())?;
        Ok(child)
    }
}

/// Warn when a core marked singleton was created with differing parameters.
fn check_singletons(graph: &CoreGraph) {
    let mut variants: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for node in graph.iter().filter(|n| n.singleton) {
        variants
            .entry(node.name())
            .or_default()
            .insert(node.fingerprint());
    }

    for (core, fingerprints) in variants {
        if fingerprints.len() > 1 {
            warn!(
                core,
                variants = fingerprints.len(),
                "Singleton core instantiated with different parameters"
            );
        }
    }
}

// ============================================================================
// Generate phase
// ============================================================================

/// Result of one node's generation, handed to its parent by value.
struct Generated {
    id: NodeId,
    manifest: FileManifest,
    dependencies: Vec<Generated>,
}

/// Generate every dependency of `id` concurrently, then `id` itself.
///
/// `try_join_all` resolves on the first failure and drops the remaining
/// futures, cancelling siblings that are still running.
fn generate_node<'a>(
    graph: &'a CoreGraph,
    programs: &'a [Rc<dyn DescriptorProgram>],
    id: NodeId,
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn CommandRunner,
) -> LocalBoxFuture<'a, VersaResult<Generated>> {
    async move {
        let node = graph.node(id);
        let children = try_join_all(
            node.dependencies
                .iter()
                .map(|&dep| generate_node(graph, programs, dep, filesystem, runner)),
        )
        .await?;

        debug!(core = %node.name(), dependencies = children.len(), "Running GENERATE");
        let mut manifest = FileManifest::new();
        {
            let deps = children
                .iter()
                .map(|c| DependencyView::new(graph.node(c.id), &c.manifest))
                .collect();
            let mut view = GenerateView::new(node, &mut manifest, deps, filesystem, runner);
            programs[id.index()].generate(&mut view).await?;
        }

        info!(core = %node.name(), files = manifest.len(), "Core generated");
        Ok(Generated {
            id,
            manifest,
            dependencies: children,
        })
    }
    .boxed_local()
}
