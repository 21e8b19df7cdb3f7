use std::fmt;

/// Index path addressing one node in a composition tree.
///
/// The first index selects among the root nodes, each further index among
/// the children of the node selected so far. Paths are positional: a
/// structural mutation above a path may invalidate it, and mutating
/// operations return the path of the affected node in the new shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path of the containing node, or `None` for a root-level path.
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.len() > 1 {
            Some(NodePath(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    /// Position among the siblings, i.e. the last index.
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }

    pub(crate) fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(empty)");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_index() {
        let path = NodePath::new(vec![2, 0, 1]);
        assert_eq!(path.parent(), Some(NodePath::new(vec![2, 0])));
        assert_eq!(path.index(), Some(1));
        assert_eq!(NodePath::new(vec![3]).parent(), None);
    }

    #[test]
    fn prefix_detection() {
        let outer = NodePath::new(vec![1]);
        let inner = NodePath::new(vec![1, 4, 0]);
        assert!(inner.starts_with(&outer));
        assert!(inner.starts_with(&inner));
        assert!(!outer.starts_with(&inner));
        assert!(!NodePath::new(vec![2, 4]).starts_with(&outer));
    }

    #[test]
    fn display_is_dotted() {
        assert_eq!(NodePath::new(vec![0, 2, 1]).to_string(), "0.2.1");
    }
}
