use std::path::Path;

use tracing::{debug, warn};

use crate::application::{
    ApplicationError,
    ports::{CommandOutput, CommandRunner, Filesystem},
    views::run_command,
};
use crate::domain::{
    CoreNode, FileCategory, FileEntry, FileManifest, RenderContext, UsageContext, capabilities,
};
use crate::error::VersaResult;

/// Read-only handle on a dependency that has finished generating.
#[derive(Debug, Clone, Copy)]
pub struct DependencyView<'a> {
    node: &'a CoreNode,
    manifest: &'a FileManifest,
}

impl<'a> DependencyView<'a> {
    pub(crate) fn new(node: &'a CoreNode, manifest: &'a FileManifest) -> Self {
        Self { node, manifest }
    }

    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    pub fn version(&self) -> &'a str {
        self.node.metadata().version()
    }

    pub fn dir(&self) -> &'a Path {
        self.node.dir()
    }

    pub fn manifest(&self) -> &'a FileManifest {
        self.manifest
    }

    pub fn top(&self) -> Option<&'a Path> {
        self.manifest.top()
    }
}

/// View handed to a descriptor's `GENERATE` hook.
///
/// Owns a borrow of the node's manifest under construction; the node itself
/// and every dependency are read-only.
pub struct GenerateView<'a> {
    node: &'a CoreNode,
    manifest: &'a mut FileManifest,
    dependencies: Vec<DependencyView<'a>>,
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn CommandRunner,
}

impl<'a> GenerateView<'a> {
    pub(crate) fn new(
        node: &'a CoreNode,
        manifest: &'a mut FileManifest,
        dependencies: Vec<DependencyView<'a>>,
        filesystem: &'a dyn Filesystem,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            node,
            manifest,
            dependencies,
            filesystem,
            runner,
        }
    }

    pub fn core_name(&self) -> &str {
        self.node.name()
    }

    pub fn core_dir(&self) -> &Path {
        self.node.dir()
    }

    /// Node variables plus `deps.<name>.files` and `deps.<name>.top` for every
    /// dependency. The first dependency of a given name wins.
    pub fn render_context(&self) -> RenderContext {
        let mut ctx = RenderContext::for_node(self.node);
        for dep in self.dependencies.iter().rev() {
            let files: Vec<String> = dep
                .manifest()
                .entries()
                .iter()
                .map(|e| e.path.display().to_string())
                .collect();
            ctx.insert(format!("deps.{}.files", dep.name()), files.join(" "));
            ctx.insert(
                format!("deps.{}.top", dep.name()),
                dep.top().map(|p| p.display().to_string()).unwrap_or_default(),
            );
        }
        ctx
    }

    /// Expand each glob relative to the core directory and register the
    /// matches. Returns the number of files added.
    ///
    /// An explicit `category` overrides the extension table; `usage` defaults
    /// to [`UsageContext::All`].
    pub fn add_files<S: AsRef<str>>(
        &mut self,
        globs: &[S],
        category: Option<FileCategory>,
        usage: Option<UsageContext>,
    ) -> VersaResult<usize> {
        let usage = usage.unwrap_or_default();
        let dir = self.node.dir();
        let mut added = 0;

        for pattern in globs {
            let pattern = pattern.as_ref();
            let matches = self.filesystem.glob(dir, pattern)?;
            if matches.is_empty() {
                warn!(core = %self.node.name(), pattern, "Glob matched no files");
                continue;
            }

            for path in matches {
                if !self.filesystem.is_file(&path) {
                    return Err(ApplicationError::NotARegularFile { path }.into());
                }
                let category = category.unwrap_or_else(|| capabilities::classify(&path));
                debug!(
                    core = %self.node.name(),
                    path = %path.display(),
                    %category,
                    %usage,
                    "Adding file"
                );
                self.manifest.add(FileEntry::new(path, category, usage))?;
                added += 1;
            }
        }

        Ok(added)
    }

    /// Designate an already registered file as this core's top entry.
    pub fn set_top(&mut self, path: &str) -> VersaResult<()> {
        let resolved = self.filesystem.resolve(self.node.dir(), path);
        self.manifest.set_top(self.node.name(), &resolved)?;
        debug!(core = %self.node.name(), top = %resolved.display(), "Top entry set");
        Ok(())
    }

    pub async fn run_external_command(&self, command: &str) -> VersaResult<CommandOutput> {
        run_command(self.runner, self.node, command).await
    }

    /// Direct dependencies in declaration order, all fully generated.
    pub fn dependencies(&self) -> &[DependencyView<'a>] {
        &self.dependencies
    }

    /// First dependency named `name`.
    pub fn dependency(&self, name: &str) -> Option<&DependencyView<'a>> {
        self.dependencies.iter().find(|d| d.name() == name)
    }

    /// Files registered so far by this core.
    pub fn manifest(&self) -> &FileManifest {
        self.manifest
    }
}
