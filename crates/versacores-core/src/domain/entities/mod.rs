pub mod core_node;
pub mod manifest;
pub mod render;
pub mod target;

pub use crate::domain::DomainError;
pub use core_node::{CoreGraph, CoreMetadata, CoreNode, DescriptorUnit, NodeId, Phase};
pub use manifest::{FileEntry, FileManifest};
pub use render::RenderContext;
pub use target::{DEFAULT_TARGET_NAME, Target, TargetSet};
