//! Core engine: block type registry, placement validation, composition
//! tree and the edit/save dual-render pipeline.
//!
//! A [`Registry`] holds [`BlockType`] descriptors keyed by identity.
//! A [`CompositionTree`] holds block instances that reference descriptors
//! by name and validates every structural mutation against the registry
//! before committing it. [`render::edit_snapshot`] and
//! [`render::save_document`] walk the tree to produce the editable view and
//! the persisted form; [`render::parse_document`] turns persisted output
//! back into nodes.

pub mod blocks;
pub mod composing;
pub mod registry;
pub mod render;

// Re-export key types for easier usage
pub use composing::{Attrs, BlockNode, CompositionTree, NodeId, NodePath, TreeError, Validator};
pub use registry::{BlockType, Registry, RegistryError, Render, Supports};
pub use render::{
    EditNode, EditSnapshot, ParseError, RenderError, RenderIssue, SaveOutput, edit_snapshot,
    parse_document, save_checked, save_document,
};
