use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use uuid::Uuid;

/// Attribute data owned by a node. Keys are kept in sorted order so
/// serialized output is deterministic.
pub type Attrs = BTreeMap<String, Value>;

/// Stable identity of a node instance; survives moves and attribute edits,
/// letting a UI keep references across tree mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One block instance in a composition tree.
///
/// A node holds its block type by identity only; the descriptor is resolved
/// through the registry whenever the node is validated or rendered, so a
/// descriptor hot-swap never leaves the tree holding stale behavior.
#[derive(Debug, Clone)]
pub struct BlockNode {
    id: NodeId,
    name: String,
    attrs: Attrs,
    children: Vec<BlockNode>,
}

impl BlockNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            name: name.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_child(mut self, child: BlockNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<BlockNode>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn children(&self) -> &[BlockNode] {
        &self.children
    }

    pub(crate) fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<BlockNode> {
        &mut self.children
    }

    /// Equality up to node identity: same block type, attributes and child
    /// order. This is the equivalence the round-trip guarantee is stated
    /// in, since re-parsing a saved document mints fresh ids.
    pub fn structurally_equal(&self, other: &BlockNode) -> bool {
        self.name == other.name
            && self.attrs == other.attrs
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.structurally_equal(b))
    }
}
