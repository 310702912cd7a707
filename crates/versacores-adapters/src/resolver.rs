//! Search-path resolution of core names to descriptor files.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};
use walkdir::WalkDir;

use versacores_core::{
    application::{ApplicationError, ports::CoreResolver},
    error::VersaResult,
};

use crate::descriptor_loader::DESCRIPTOR_EXTENSION;

/// Name of the descriptor picked when a directory holds several.
pub const TOP_DESCRIPTOR: &str = "top.versacore";

/// Resolves `<name>.versacore` against an ordered list of directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchPathResolver;

impl SearchPathResolver {
    pub fn new() -> Self {
        Self
    }
}

impl CoreResolver for SearchPathResolver {
    #[instrument(skip(self, locations), fields(locations = locations.len()))]
    fn resolve(&self, name: &str, locations: &[PathBuf]) -> VersaResult<PathBuf> {
        let file_name = format!("{name}.{DESCRIPTOR_EXTENSION}");

        for location in locations {
            let candidate = location.join(&file_name);
            trace!(candidate = %candidate.display(), "Probing");
            if candidate.is_file() {
                let resolved = candidate
                    .canonicalize()
                    .map_err(|e| map_io_error(&candidate, e))?;
                debug!(path = %resolved.display(), "Resolved core");
                return Ok(resolved);
            }
        }

        Err(ApplicationError::CoreNotFound {
            name: name.to_string(),
            searched: locations.to_vec(),
        }
        .into())
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn select_top(&self, dir: &Path) -> VersaResult<PathBuf> {
        if !dir.is_dir() {
            return Err(ApplicationError::Filesystem {
                path: dir.to_path_buf(),
                reason: "not a directory".into(),
            }
            .into());
        }

        let mut candidates = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ApplicationError::Filesystem {
                path: dir.to_path_buf(),
                reason: format!("directory walk error: {e}"),
            })?;
            // Follows symlinks, matching `resolve`.
            let is_descriptor = entry.path().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some(DESCRIPTOR_EXTENSION);
            if is_descriptor {
                candidates.push(entry.into_path());
            }
        }

        let chosen = match candidates.len() {
            0 => {
                return Err(ApplicationError::TopCoreNotFound {
                    dir: dir.to_path_buf(),
                }
                .into());
            }
            1 => candidates.remove(0),
            _ => match candidates
                .iter()
                .position(|p| p.file_name().and_then(|n| n.to_str()) == Some(TOP_DESCRIPTOR))
            {
                Some(index) => candidates.swap_remove(index),
                None => {
                    return Err(ApplicationError::AmbiguousTopCore {
                        dir: dir.to_path_buf(),
                        candidates: candidates
                            .iter()
                            .filter_map(|p| p.file_name())
                            .map(|n| n.to_string_lossy().into_owned())
                            .collect(),
                    }
                    .into());
                }
            },
        };

        let resolved = chosen.canonicalize().map_err(|e| map_io_error(&chosen, e))?;
        debug!(path = %resolved.display(), "Selected top descriptor");
        Ok(resolved)
    }
}

fn map_io_error(path: &Path, e: std::io::Error) -> ApplicationError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to resolve path: {e}"),
    }
}
