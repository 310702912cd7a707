//! Domain value objects: FileCategory, UsageContext, Hook, ParamValue.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! Extension classification does NOT live here; the extension table is in
//! `capabilities.rs`. This file's only job is to define the types, their
//! string representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── FileCategory ─────────────────────────────────────────────────────────────

/// Classification of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// Synthesizable HDL (Verilog, SystemVerilog, VHDL).
    #[serde(rename = "hdl")]
    HdlSource,
    /// HDL only used by simulators. Never inferred from the extension.
    #[serde(rename = "simulation")]
    SimulationSource,
    /// Include / header files.
    Include,
    /// Timing and placement constraints.
    Constraint,
    /// IP specifications and netlists.
    #[serde(rename = "ip")]
    IpSpecification,
    /// Tool-specific setting or build files.
    #[serde(rename = "setting")]
    ToolSetting,
    /// Scripting and verification sources.
    Script,
    /// Fallback for anything the extension table does not know.
    #[serde(rename = "source")]
    GenericSource,
}

impl FileCategory {
    pub const ALL: [FileCategory; 8] = [
        Self::HdlSource,
        Self::SimulationSource,
        Self::Include,
        Self::Constraint,
        Self::IpSpecification,
        Self::ToolSetting,
        Self::Script,
        Self::GenericSource,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HdlSource => "hdl",
            Self::SimulationSource => "simulation",
            Self::Include => "include",
            Self::Constraint => "constraint",
            Self::IpSpecification => "ip",
            Self::ToolSetting => "setting",
            Self::Script => "script",
            Self::GenericSource => "source",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hdl" | "verilog" | "systemverilog" | "vhdl" => Ok(Self::HdlSource),
            "simulation" | "sim" => Ok(Self::SimulationSource),
            "include" | "header" => Ok(Self::Include),
            "constraint" | "constraints" => Ok(Self::Constraint),
            "ip" | "netlist" => Ok(Self::IpSpecification),
            "setting" | "settings" | "build" => Ok(Self::ToolSetting),
            "script" | "tcl" | "python" | "c" => Ok(Self::Script),
            "source" | "generic" => Ok(Self::GenericSource),
            _ => Err(DomainError::UnknownFileCategory(s.to_string())),
        }
    }
}

// ── UsageContext ─────────────────────────────────────────────────────────────

/// Which flows a manifest entry participates in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageContext {
    #[default]
    All,
    Implementation,
    Simulation,
}

impl UsageContext {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Implementation => "implementation",
            Self::Simulation => "simulation",
        }
    }
}

impl fmt::Display for UsageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageContext {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "both" => Ok(Self::All),
            "implementation" | "synthesis" => Ok(Self::Implementation),
            "simulation" | "sim" => Ok(Self::Simulation),
            _ => Err(DomainError::UnknownUsageContext(s.to_string())),
        }
    }
}

// ── Hook ─────────────────────────────────────────────────────────────────────

/// A lifecycle hook a descriptor may export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Top,
    Create,
    Generate,
    Clean,
    GetSources,
    PrepareSources,
}

impl Hook {
    pub const ALL: [Hook; 6] = [
        Self::Top,
        Self::Create,
        Self::Generate,
        Self::Clean,
        Self::GetSources,
        Self::PrepareSources,
    ];

    /// Attribute name in the descriptor.
    pub const fn attribute(&self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Create => "CREATE",
            Self::Generate => "GENERATE",
            Self::Clean => "CLEAN",
            Self::GetSources => "GET_SOURCES",
            Self::PrepareSources => "PREPARE_SOURCES",
        }
    }

    /// `CREATE` and `GENERATE` are mandatory; everything else may be absent.
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Create | Self::Generate)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

// ── Parameters ───────────────────────────────────────────────────────────────

/// One value in an open-ended parameter mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// Parameter mapping. Sorted by key so iteration order is canonical.
pub type Params = BTreeMap<String, ParamValue>;

/// Canonical fingerprint of a parameter set: `k=v` pairs sorted by key, joined with `;`.
///
/// Lists render as `[a,b]` here so that `["a b"]` and `["a", "b"]` differ.
pub fn fingerprint(params: &Params) -> String {
    fn canonical(value: &ParamValue) -> String {
        match value {
            ParamValue::String(s) => format!("{s:?}"),
            ParamValue::List(items) => {
                let inner: Vec<String> = items.iter().map(canonical).collect();
                format!("[{}]", inner.join(","))
            }
            other => other.to_string(),
        }
    }

    params
        .iter()
        .map(|(k, v)| format!("{k}={}", canonical(v)))
        .collect::<Vec<_>>()
        .join(";")
}
