use std::sync::Arc;

use crate::composing::node::{Attrs, BlockNode};
use crate::composing::path::NodePath;
use crate::composing::validator::Validator;
use crate::registry::{Registry, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("cannot place {child:?} under {}", .parent.as_deref().unwrap_or("the document root"))]
    PlacementRejected {
        child: String,
        parent: Option<String>,
    },
    #[error("no node at path {0}")]
    InvalidPath(NodePath),
    #[error("cannot move the node at {0} into its own subtree")]
    MoveIntoSelf(NodePath),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Ordered tree of block instances owned by one editing session.
///
/// Every structural mutation consults the [`Validator`] before touching any
/// node; a rejected operation returns an error and leaves the tree exactly
/// as it was. Child order is significant and preserved by all operations.
/// Pure attribute edits skip placement validation.
///
/// The tree is single-writer: mutation requires `&mut self`, while any
/// number of read-only render traversals may share `&self`.
pub struct CompositionTree {
    registry: Arc<Registry>,
    roots: Vec<BlockNode>,
    version: u64,
}

impl CompositionTree {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            roots: Vec::new(),
            version: 0,
        }
    }

    /// Adopt already-built nodes, e.g. the output of
    /// [`crate::render::parse_document`]. Persisted content is trusted
    /// structurally; constraint violations in it surface through
    /// [`crate::composing::invariants::check`] or rendering, not here,
    /// so a document still loads when a block definition is missing.
    pub fn from_nodes(registry: Arc<Registry>, roots: Vec<BlockNode>) -> Self {
        Self {
            registry,
            roots,
            version: 0,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn roots(&self) -> &[BlockNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Version counter, bumped once per successful mutation. Lets a
    /// renderer detect whether a snapshot it holds is stale.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node(&self, path: &NodePath) -> Option<&BlockNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.roots.get(*first)?;
        for &index in rest {
            current = current.children().get(index)?;
        }
        Some(current)
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut BlockNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.roots.get_mut(*first)?;
        for &index in rest {
            current = current.children_mut().get_mut(index)?;
        }
        Some(current)
    }

    /// Sibling list a parent path denotes: the root forest for `None`.
    fn siblings_mut(
        &mut self,
        parent: Option<&NodePath>,
    ) -> Result<&mut Vec<BlockNode>, TreeError> {
        match parent {
            None => Ok(&mut self.roots),
            Some(path) => self
                .node_mut(path)
                .map(BlockNode::children_mut)
                .ok_or_else(|| TreeError::InvalidPath(path.clone())),
        }
    }

    fn parent_name(&self, parent: Option<&NodePath>) -> Result<Option<String>, TreeError> {
        match parent {
            None => Ok(None),
            Some(path) => self
                .node(path)
                .map(|node| Some(node.name().to_owned()))
                .ok_or_else(|| TreeError::InvalidPath(path.clone())),
        }
    }

    fn check_placement(&self, child: &str, parent: Option<&str>) -> Result<(), TreeError> {
        let validator = Validator::new(Arc::clone(&self.registry));
        if validator.can_place(child, parent)? {
            Ok(())
        } else {
            tracing::debug!(child, parent = parent.unwrap_or("<root>"), "placement rejected");
            Err(TreeError::PlacementRejected {
                child: child.to_owned(),
                parent: parent.map(str::to_owned),
            })
        }
    }

    /// Insert `node` as a child of `parent` (`None` = document root) at
    /// `index`. An out-of-range index appends. Returns the path of the
    /// inserted node.
    pub fn insert(
        &mut self,
        node: BlockNode,
        parent: Option<&NodePath>,
        index: usize,
    ) -> Result<NodePath, TreeError> {
        let parent_name = self.parent_name(parent)?;
        self.check_placement(node.name(), parent_name.as_deref())?;

        let siblings = self.siblings_mut(parent)?;
        let at = index.min(siblings.len());
        siblings.insert(at, node);
        self.version += 1;
        Ok(match parent {
            None => NodePath::new(vec![at]),
            Some(path) => path.child(at),
        })
    }

    /// Detach and return the subtree at `path`.
    pub fn remove(&mut self, path: &NodePath) -> Result<BlockNode, TreeError> {
        if self.node(path).is_none() {
            return Err(TreeError::InvalidPath(path.clone()));
        }
        let node = self.detach(path)?;
        self.version += 1;
        Ok(node)
    }

    /// Merge an attribute patch into the node at `path`. A `null` value
    /// removes its key; other values insert or replace.
    pub fn set_attributes(&mut self, path: &NodePath, patch: Attrs) -> Result<(), TreeError> {
        let node = self
            .node_mut(path)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
        for (key, value) in patch {
            if value.is_null() {
                node.attrs_mut().remove(&key);
            } else {
                node.attrs_mut().insert(key, value);
            }
        }
        self.version += 1;
        Ok(())
    }

    /// Re-parent the node at `path` under `new_parent` (`None` = document
    /// root) at `index`. The destination is validated before anything is
    /// detached, so a rejected move leaves the tree untouched. Returns the
    /// node's path in the new shape.
    pub fn move_node(
        &mut self,
        path: &NodePath,
        new_parent: Option<&NodePath>,
        index: usize,
    ) -> Result<NodePath, TreeError> {
        let child_name = self
            .node(path)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?
            .name()
            .to_owned();
        if let Some(dest) = new_parent
            && dest.starts_with(path)
        {
            return Err(TreeError::MoveIntoSelf(path.clone()));
        }
        let parent_name = self.parent_name(new_parent)?;
        self.check_placement(&child_name, parent_name.as_deref())?;

        let node = self.detach(path)?;
        // Detaching shifts sibling indices after the removal point, so a
        // destination path sharing that prefix must be adjusted.
        let adjusted = new_parent.map(|dest| adjust_for_removal(dest, path));
        let siblings = self.siblings_mut(adjusted.as_ref())?;
        let at = index.min(siblings.len());
        siblings.insert(at, node);
        self.version += 1;
        Ok(match adjusted {
            None => NodePath::new(vec![at]),
            Some(parent) => parent.child(at),
        })
    }

    fn detach(&mut self, path: &NodePath) -> Result<BlockNode, TreeError> {
        let index = path
            .index()
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
        let siblings = self.siblings_mut(path.parent().as_ref())?;
        if index >= siblings.len() {
            return Err(TreeError::InvalidPath(path.clone()));
        }
        Ok(siblings.remove(index))
    }
}

/// Shift `dest` left by one at the removal level when the removed node was
/// an earlier sibling on `dest`'s spine.
fn adjust_for_removal(dest: &NodePath, removed: &NodePath) -> NodePath {
    let level = removed.depth() - 1;
    let mut indices = dest.indices().to_vec();
    if indices.len() > level
        && indices[..level] == removed.indices()[..level]
        && indices[level] > removed.indices()[level]
    {
        indices[level] -= 1;
    }
    NodePath::new(indices)
}
