//! Whole-tree constraint checking.
//!
//! The mutation-time validator guards individual edits; this walk audits an
//! entire tree after the fact — typically content adopted from persisted
//! output, or a tree whose registry lost definitions since it was built.
//! Unlike the validator it never rejects, it reports, so callers decide
//! whether a violation is fatal.

use std::sync::Arc;

use crate::composing::node::BlockNode;
use crate::composing::path::NodePath;
use crate::composing::tree::{CompositionTree, TreeError};
use crate::registry::Registry;

/// One constraint violation found by [`check`].
#[derive(Debug)]
pub struct Violation {
    pub path: NodePath,
    pub error: TreeError,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Report every dangling type reference and every parent constraint
/// violation in the tree, in depth-first order.
pub fn check(tree: &CompositionTree) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (index, root) in tree.roots().iter().enumerate() {
        walk(
            tree.registry(),
            root,
            None,
            NodePath::new(vec![index]),
            &mut violations,
        );
    }
    violations
}

fn walk(
    registry: &Arc<Registry>,
    node: &BlockNode,
    parent: Option<&str>,
    path: NodePath,
    violations: &mut Vec<Violation>,
) {
    match registry.lookup(node.name()) {
        Err(error) => violations.push(Violation {
            path: path.clone(),
            error: error.into(),
        }),
        Ok(block) => {
            if !block.allows_parent(parent) {
                violations.push(Violation {
                    path: path.clone(),
                    error: TreeError::PlacementRejected {
                        child: node.name().to_owned(),
                        parent: parent.map(str::to_owned),
                    },
                });
            }
        }
    }
    for (index, child) in node.children().iter().enumerate() {
        walk(registry, child, Some(node.name()), path.child(index), violations);
    }
}
