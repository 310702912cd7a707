//! `{{VARIABLE}}` substitution for descriptor step arguments.

use std::collections::HashMap;

use crate::domain::{entities::core_node::CoreNode, value_objects::Params};

/// Variables available while a hook runs.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `CORE_NAME` | "fifo" | descriptor `NAME` |
/// | `CORE_VERSION` | "1.2.0" | descriptor `VERSION` |
/// | `CORE_DIR` | "/cores/fifo" | descriptor directory |
/// | `TARGET` | "default" | node's default target |
///
/// Creation parameters are added under their own names; dependency
/// manifests under `deps.<name>.files` and `deps.<name>.top`.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata, default target, and creation parameters of `node`.
    ///
    /// Built-ins win over parameters of the same name.
    pub fn for_node(node: &CoreNode) -> Self {
        let mut ctx = Self::new().with_params(&node.params);
        ctx.insert("CORE_NAME", node.name());
        ctx.insert("CORE_VERSION", node.metadata().version());
        ctx.insert("CORE_DIR", node.dir().to_string_lossy());
        if let Some(target) = node.targets.default_target() {
            ctx.insert("TARGET", target.name());
        }
        ctx
    }

    pub fn with_params(mut self, params: &Params) -> Self {
        for (key, value) in params {
            self.insert(key, value.to_string());
        }
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Replace every `{{KEY}}` with its value.
    ///
    /// - `{{UNKNOWN}}` stays as the literal `{{UNKNOWN}}`
    /// - Substituted values are not rescanned
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = after[..end].trim();
                    match self.variables.get(key) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[start..start + 2 + end + 2]),
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
