//! Local filesystem adapter using the `glob` crate.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use versacores_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{VersaError, VersaResult},
};

/// Production filesystem implementation.
///
/// Patterns are matched relative to the descriptor's directory. Matches come
/// back canonicalized and in the order `glob` yields them (alphabetical).
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn glob(&self, base: &Path, pattern: &str) -> VersaResult<Vec<PathBuf>> {
        let full = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            // Metacharacters in the base directory must match literally.
            let base = glob::Pattern::escape(&base.to_string_lossy());
            format!("{}/{}", base.trim_end_matches('/'), pattern)
        };
        trace!(pattern = %full, "Expanding glob");

        let paths = glob::glob(&full).map_err(|e| ApplicationError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.msg.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                map_io_error(&path, e.into_error(), "read glob match")
            })?;
            let resolved = path
                .canonicalize()
                .map_err(|e| map_io_error(&path, e, "resolve path"))?;
            matches.push(resolved);
        }
        Ok(matches)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn resolve(&self, base: &Path, relative: &str) -> PathBuf {
        let joined = base.join(relative);
        // Unresolvable paths are returned joined; the manifest rejects them.
        joined.canonicalize().unwrap_or(joined)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> VersaError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
