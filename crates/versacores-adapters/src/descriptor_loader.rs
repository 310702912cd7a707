//! TOML descriptor loader.
//!
//! Reads a `.versacore` file, validates its attributes, and turns its hooks
//! into a [`ScriptProgram`].
//!
//! # `.versacore` format
//!
//! ```toml
//! NAME        = "uart"
//! VERSION     = "1.2.0"
//! API_VERSION = "0.1"
//! DESCRIPTION = "16550-compatible UART"
//!
//! CREATE   = [ { depend_on = { name = "fifo" } } ]
//! GENERATE = [ { add_files = { globs = ["rtl/*.sv"] } }, { set_top = "rtl/uart.sv" } ]
//!
//! # Optional hooks
//! # TOP, CLEAN, GET_SOURCES, PREPARE_SOURCES
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use versacores_core::{
    application::{
        ApplicationError,
        ports::{Descriptor, DescriptorLoader},
    },
    domain::{CoreMetadata, DescriptorUnit, Hook},
    error::VersaResult,
};

use crate::program::ScriptProgram;

/// File extension of descriptor files, without the dot.
pub const DESCRIPTOR_EXTENSION: &str = "versacore";

const METADATA_KEYS: [&str; 4] = ["NAME", "VERSION", "API_VERSION", "DESCRIPTION"];

/// Loads `.versacore` descriptors from disk.
///
/// Stateless: every call parses the file again and gets a fresh unit id.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDescriptorLoader;

impl TomlDescriptorLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorLoader for TomlDescriptorLoader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> VersaResult<Descriptor> {
        let stem = descriptor_stem(path)?;

        let raw = fs::read_to_string(path).map_err(|e| ApplicationError::MalformedDescriptor {
            path: path.to_path_buf(),
            reason: format!("failed to read: {e}"),
        })?;

        let table: toml::Table =
            toml::from_str(&raw).map_err(|e| ApplicationError::MalformedDescriptor {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        for key in table.keys() {
            let known = METADATA_KEYS.iter().any(|k| k == key)
                || Hook::ALL.iter().any(|h| h.attribute() == key);
            if !known {
                warn!(path = %path.display(), attribute = %key, "Ignoring unknown attribute");
            }
        }

        let parser = AttributeParser { path, table: &table };
        let metadata = CoreMetadata::new(
            parser.string("NAME")?,
            parser.string("VERSION")?,
            parser.string("API_VERSION")?,
            parser.string("DESCRIPTION")?,
        )?;

        let program = ScriptProgram {
            top: parser.hook(Hook::Top)?,
            create: parser.required_hook(Hook::Create)?,
            generate: parser.required_hook(Hook::Generate)?,
            clean: parser.hook(Hook::Clean)?,
            get_sources: parser.hook(Hook::GetSources)?,
            prepare_sources: parser.hook(Hook::PrepareSources)?,
        };

        let unit = DescriptorUnit::new(&stem);
        debug!(name = %metadata.name(), unit = %unit.name(), "Descriptor validated");

        Ok(Descriptor {
            path: path.to_path_buf(),
            unit,
            metadata,
            program: Box::new(program),
        })
    }
}

/// File name without the `.versacore` suffix. At most one further dot group
/// is allowed (`fifo.xilinx.versacore`).
fn descriptor_stem(path: &Path) -> Result<String, ApplicationError> {
    let illegal = |reason: &str| ApplicationError::IllegalDescriptorName {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| illegal("not a valid file name"))?;

    let suffix = format!(".{DESCRIPTOR_EXTENSION}");
    let stem = file_name.strip_suffix(&suffix).unwrap_or(file_name);

    if stem.is_empty() {
        return Err(illegal("empty name"));
    }
    if stem.matches('.').count() > 1 {
        return Err(illegal("more than one '.' before the extension"));
    }
    Ok(stem.to_string())
}

/// Typed access to a descriptor's top-level table.
struct AttributeParser<'a> {
    path: &'a Path,
    table: &'a toml::Table,
}

impl AttributeParser<'_> {
    fn path(&self) -> PathBuf {
        self.path.to_path_buf()
    }

    fn string(&self, key: &str) -> Result<String, ApplicationError> {
        match self.table.get(key) {
            None => Err(ApplicationError::MissingAttribute {
                path: self.path(),
                attribute: key.to_string(),
            }),
            Some(toml::Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(ApplicationError::AttributeType {
                path: self.path(),
                attribute: key.to_string(),
                expected: "a string",
            }),
        }
    }

    fn required_hook<T: DeserializeOwned>(&self, hook: Hook) -> Result<Vec<T>, ApplicationError> {
        self.hook(hook)?
            .ok_or_else(|| ApplicationError::MissingAttribute {
                path: self.path(),
                attribute: hook.attribute().to_string(),
            })
    }

    /// `None` when the hook is absent.
    fn hook<T: DeserializeOwned>(&self, hook: Hook) -> Result<Option<Vec<T>>, ApplicationError> {
        let Some(value) = self.table.get(hook.attribute()) else {
            return Ok(None);
        };

        let type_error = || ApplicationError::AttributeType {
            path: self.path(),
            attribute: hook.attribute().to_string(),
            expected: "an array of step tables",
        };

        let items = value.as_array().ok_or_else(type_error)?;
        let mut steps = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let table = item.as_table().ok_or_else(type_error)?;
            if table.len() != 1 {
                return Err(ApplicationError::IllegalStep {
                    path: self.path(),
                    hook,
                    index,
                    reason: format!("a step has exactly one key, found {}", table.len()),
                });
            }
            let step = item
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| ApplicationError::IllegalStep {
                    path: self.path(),
                    hook,
                    index,
                    reason: e.to_string().trim().to_string(),
                })?;
            steps.push(step);
        }
        Ok(Some(steps))
    }
}
