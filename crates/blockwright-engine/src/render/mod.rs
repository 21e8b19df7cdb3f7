//! Dual-render pipeline.
//!
//! Two independent depth-first traversals over the same tree: `edit`
//! produces the editable view ([`edit::edit_snapshot`]), `save` the
//! persisted form ([`save::save_document`]). They share node and attribute
//! data but no rendering state, both are pure with respect to the tree, and
//! either may be abandoned mid-walk with nothing to roll back.
//!
//! [`parse::parse_document`] closes the loop: it rebuilds a node forest
//! from save output, and for pure save callbacks the rebuilt forest is
//! structurally equivalent to the original tree.

pub mod edit;
pub mod parse;
pub mod save;

use crate::composing::NodePath;
use crate::registry::RegistryError;

pub use edit::{EditNode, EditSnapshot, edit_snapshot};
pub use parse::{ParseError, parse_document};
pub use save::{SaveOutput, save_checked, save_document};

/// Per-node failure collected during a traversal. The traversal itself
/// completes; the affected node degrades to a placeholder.
#[derive(Debug)]
pub struct RenderIssue {
    pub path: NodePath,
    pub error: RegistryError,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Two consecutive save traversals of an unchanged tree diverged —
    /// some block type's save callback is not deterministic. This is a
    /// defect in the block definition, reported rather than persisted.
    #[error("save output diverged between renders of version {version}, first at byte {at}")]
    NonDeterministicSave { version: u64, at: usize },
}
