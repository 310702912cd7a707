//! Targets: named build configurations and the ordered set a core owns.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::fmt;

use crate::domain::{error::DomainError, value_objects::Params};

/// Name of the target every non-top core, and every top core without a
/// `TOP` hook, receives implicitly.
pub const DEFAULT_TARGET_NAME: &str = "default";

/// A named build configuration with creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    name: String,
    params: Params,
}

impl Target {
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// The unparameterized `default` target.
    pub fn implicit_default() -> Self {
        Self::new(DEFAULT_TARGET_NAME, Params::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            write!(f, " ({} params)", self.params.len())?;
        }
        Ok(())
    }
}

/// Ordered set of targets with unique names and an optional default.
///
/// The default, once set, always indexes into `targets`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSet {
    targets: Vec<Target>,
    default: Option<usize>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only the implicit `default` target, already selected.
    pub fn implicit() -> Self {
        Self {
            targets: vec![Target::implicit_default()],
            default: Some(0),
        }
    }

    /// Register a target. `core` is only used for the error message.
    pub fn define(&mut self, core: &str, target: Target) -> Result<&Target, DomainError> {
        if self.get(target.name()).is_some() {
            return Err(DomainError::DuplicateTarget {
                core: core.to_string(),
                target: target.name().to_string(),
            });
        }
        self.targets.push(target);
        let idx = self.targets.len() - 1;
        Ok(&self.targets[idx])
    }

    /// Select an already-defined target as default.
    pub fn set_default(&mut self, core: &str, name: &str) -> Result<(), DomainError> {
        let idx = self
            .targets
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| DomainError::UnknownTarget {
                core: core.to_string(),
                target: name.to_string(),
            })?;
        self.default = Some(idx);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name() == name)
    }

    pub fn default_target(&self) -> Option<&Target> {
        self.default.map(|idx| &self.targets[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
