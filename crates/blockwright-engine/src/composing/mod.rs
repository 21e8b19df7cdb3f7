//! Composition tree: block instances, paths, placement validation and
//! whole-tree invariant checks.

pub mod invariants;
pub mod node;
pub mod path;
pub mod tree;
pub mod validator;

pub use node::{Attrs, BlockNode, NodeId};
pub use path::NodePath;
pub use tree::{CompositionTree, TreeError};
pub use validator::Validator;
