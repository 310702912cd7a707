//! File classification registry.
//!
//! # Design Rationale
//!
//! Every category is described exactly once by its [`CategoryDef`]. Extension
//! lookup is an O(n) scan over a tiny static table, which keeps the mapping
//! readable in one place instead of spread across `match` arms.
//!
//! # Adding a New Extension
//!
//! 1. Append it to the matching entry's `extensions`
//! 2. That's it. Classification derives from the registry
//!
//! Extensions are compared case-sensitively: `.S` (preprocessed assembly)
//! is a script while `.s` falls through to the generic category.

use crate::domain::value_objects::FileCategory;
use std::path::Path;

/// API versions a descriptor may declare.
pub const SUPPORTED_API_VERSIONS: &[&str] = &["0.1"];

/// Describes the file extensions that imply one category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDef {
    pub category: FileCategory,

    /// Extensions without the leading dot. Empty means the category is only
    /// reachable through an explicit type.
    pub extensions: &'static [&'static str],

    pub description: &'static str,
}

/// Single source of truth for extension-based classification.
pub static CATEGORY_REGISTRY: &[CategoryDef] = &[
    CategoryDef {
        category: FileCategory::HdlSource,
        extensions: &["sv", "v", "vhd", "vhdl"],
        description: "Synthesizable HDL source",
    },
    CategoryDef {
        category: FileCategory::SimulationSource,
        extensions: &[],
        description: "Simulation-only HDL source",
    },
    CategoryDef {
        category: FileCategory::Include,
        extensions: &["svh", "vh"],
        description: "Include or header file",
    },
    CategoryDef {
        category: FileCategory::Constraint,
        extensions: &["xdc", "sdc"],
        description: "Timing or placement constraint",
    },
    CategoryDef {
        category: FileCategory::IpSpecification,
        extensions: &["xci", "xcix", "ip", "ipx", "qip", "qsys", "edif", "edn", "dcp"],
        description: "IP specification or netlist",
    },
    CategoryDef {
        category: FileCategory::ToolSetting,
        extensions: &["qsf", "sbt"],
        description: "Tool setting or build file",
    },
    CategoryDef {
        category: FileCategory::Script,
        extensions: &["tcl", "c", "h", "S", "py"],
        description: "Script or verification source",
    },
    CategoryDef {
        category: FileCategory::GenericSource,
        extensions: &[],
        description: "Generic source",
    },
];

/// Look up the registry entry for a category.
pub fn category_def(category: FileCategory) -> Option<&'static CategoryDef> {
    CATEGORY_REGISTRY.iter().find(|d| d.category == category)
}

/// Classify a path by extension, falling back to [`FileCategory::GenericSource`].
pub fn classify(path: &Path) -> FileCategory {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileCategory::GenericSource;
    };

    CATEGORY_REGISTRY
        .iter()
        .find(|d| d.extensions.contains(&ext))
        .map(|d| d.category)
        .unwrap_or(FileCategory::GenericSource)
}

pub fn is_supported_api_version(version: &str) -> bool {
    SUPPORTED_API_VERSIONS.contains(&version)
}
