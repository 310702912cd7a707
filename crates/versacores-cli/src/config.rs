//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `VERSACORES__<SECTION>__<KEY>`
//! 3. Config file: `--config FILE`, else [`AppConfig::config_path`] if present
//! 4. Built-in defaults (always present)
//!
//! `cores.search_paths` from the environment is a comma-separated list.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "VERSACORES";

/// Platform path list of extra core directories, searched after the
/// working directory.
pub const SEARCH_PATH_ENV: &str = "VERSACORES_PATH";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where dependencies are looked up.
    pub cores: CoresConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoresConfig {
    /// Searched after the working directory and `VERSACORES_PATH`.
    pub search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and the process
    /// environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.  The
    /// default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_with(config_file, environment())
    }

    fn load_with(config_file: Option<&PathBuf>, env: Environment) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        Config::builder()
            .add_source(file_source(&path).required(required))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.versacores.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "versacores", "versacores")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".versacores.toml"))
    }

    /// Ordered search locations: `work_dir`, then each `VERSACORES_PATH`
    /// entry, then `cores.search_paths`.
    pub fn search_locations(&self, work_dir: &Path, env_path: Option<&str>) -> Vec<PathBuf> {
        let mut locations = vec![work_dir.to_path_buf()];
        if let Some(value) = env_path {
            locations.extend(std::env::split_paths(value).filter(|p| !p.as_os_str().is_empty()));
        }
        locations.extend(self.cores.search_paths.iter().cloned());
        locations
    }
}

fn file_source(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::new(&path.to_string_lossy(), FileFormat::Toml)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cores.search_paths")
        .try_parsing(true)
}
