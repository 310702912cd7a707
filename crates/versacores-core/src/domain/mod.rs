// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for VersaCores.
//!
//! This module contains the core graph model with no I/O. Descriptor
//! loading, globbing, and process execution are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No logging**: `tracing` lives in the application layer
//! - **Arena-owned nodes**: nodes reference children by [`NodeId`]
//!
// Public API - what the world sees
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    core_node::{CoreGraph, CoreMetadata, CoreNode, DescriptorUnit, NodeId, Phase},
    manifest::{FileEntry, FileManifest},
    render::RenderContext,
    target::{DEFAULT_TARGET_NAME, Target, TargetSet},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{FileCategory, Hook, ParamValue, Params, UsageContext, fingerprint};

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn meta(name: &str) -> CoreMetadata {
        CoreMetadata::new(name, "0.1.0", "0.1", name).unwrap()
    }

    // ========================================================================
    // Graph + manifest interplay
    // ========================================================================

    #[test]
    fn two_loads_of_same_descriptor_share_nothing() {
        let mut graph = CoreGraph::new();
        let a = graph.insert("/c/ram.versacore", DescriptorUnit::new("ram"), meta("ram"));
        let b = graph.insert("/c/ram.versacore", DescriptorUnit::new("ram"), meta("ram"));

        graph
            .node_mut(a)
            .manifest
            .add(FileEntry::new("/c/ram.sv", FileCategory::HdlSource, UsageContext::All))
            .unwrap();
        graph.node_mut(a).params.insert("depth".into(), ParamValue::Integer(4));

        assert_eq!(graph.node(a).manifest.len(), 1);
        assert!(graph.node(b).manifest.is_empty());
        assert!(graph.node(b).params.is_empty());
        assert_ne!(graph.node(a).unit(), graph.node(b).unit());
    }

    #[test]
    fn classification_feeds_manifest() {
        let mut manifest = FileManifest::new();
        for file in ["/c/a.sv", "/c/b.vhd", "/c/c.xdc", "/c/d.txt"] {
            let path = Path::new(file);
            manifest
                .add(FileEntry::new(path, capabilities::classify(path), UsageContext::All))
                .unwrap();
        }

        assert_eq!(manifest.len(), 4);
        assert_eq!(manifest.by_category(FileCategory::HdlSource).count(), 2);
        assert_eq!(manifest.by_category(FileCategory::Constraint).count(), 1);
        assert_eq!(manifest.by_category(FileCategory::GenericSource).count(), 1);
    }

    // ========================================================================
    // Render context built from a node
    // ========================================================================

    #[test]
    fn render_context_for_node() {
        let mut graph = CoreGraph::new();
        let id = graph.insert(
            "/cores/fifo/fifo.versacore",
            DescriptorUnit::new("fifo"),
            meta("fifo"),
        );
        let node = graph.node_mut(id);
        node.targets = TargetSet::implicit();
        node.params.insert("width".into(), ParamValue::Integer(32));

        let ctx = RenderContext::for_node(graph.node(id));
        assert_eq!(
            ctx.render("{{CORE_NAME}}@{{CORE_VERSION}} {{TARGET}} {{CORE_DIR}} w={{width}}"),
            "fifo@0.1.0 default /cores/fifo w=32"
        );
    }
}
