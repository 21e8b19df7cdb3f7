use std::sync::Arc;

use crate::composing::{BlockNode, CompositionTree, NodeId, NodePath};
use crate::registry::Registry;
use crate::render::RenderIssue;

/// Editable view of one node, ready for an interactive surface.
///
/// `markup` comes from the block type's edit callback. A node whose type is
/// no longer registered keeps its place in the view as a placeholder with
/// `missing` set; its children render normally.
#[derive(Debug)]
pub struct EditNode {
    pub id: NodeId,
    pub name: String,
    pub markup: String,
    pub missing: bool,
    pub children: Vec<EditNode>,
}

/// Immutable view of the whole tree for UI consumption.
///
/// The UI renders from this and never touches the tree; `version` lets it
/// detect staleness against [`CompositionTree::version`].
#[derive(Debug)]
pub struct EditSnapshot {
    pub version: u64,
    pub nodes: Vec<EditNode>,
    pub issues: Vec<RenderIssue>,
}

/// Depth-first edit traversal. Cheap enough for interactive use; never
/// mutates tree data.
pub fn edit_snapshot(tree: &CompositionTree) -> EditSnapshot {
    let mut issues = Vec::new();
    let nodes = tree
        .roots()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            render_node(tree.registry(), node, NodePath::new(vec![index]), &mut issues)
        })
        .collect();
    EditSnapshot {
        version: tree.version(),
        nodes,
        issues,
    }
}

fn render_node(
    registry: &Arc<Registry>,
    node: &BlockNode,
    path: NodePath,
    issues: &mut Vec<RenderIssue>,
) -> EditNode {
    let children: Vec<EditNode> = node
        .children()
        .iter()
        .enumerate()
        .map(|(index, child)| render_node(registry, child, path.child(index), issues))
        .collect();
    let child_markup: Vec<String> = children.iter().map(|c| c.markup.clone()).collect();

    match registry.lookup(node.name()) {
        Ok(block) => EditNode {
            id: node.id(),
            name: node.name().to_owned(),
            markup: block.render().edit(node.attrs(), &child_markup),
            missing: false,
            children,
        },
        Err(error) => {
            issues.push(RenderIssue { path, error });
            EditNode {
                id: node.id(),
                name: node.name().to_owned(),
                markup: String::new(),
                missing: true,
                children,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks;
    use crate::registry::RegistryError;

    fn tree_with(roots: Vec<BlockNode>) -> CompositionTree {
        let registry = Arc::new(Registry::new());
        blocks::register_builtins(&registry).unwrap();
        CompositionTree::from_nodes(registry, roots)
    }

    #[test]
    fn edit_view_mirrors_tree_structure() {
        let tree = tree_with(vec![
            BlockNode::new("core/columns").with_child(
                BlockNode::new("core/column")
                    .with_child(BlockNode::new("core/paragraph").with_attr("content", "hi")),
            ),
        ]);

        let snapshot = edit_snapshot(&tree);
        assert!(snapshot.issues.is_empty());
        assert_eq!(snapshot.nodes.len(), 1);

        let columns = &snapshot.nodes[0];
        assert_eq!(columns.name, "core/columns");
        let column = &columns.children[0];
        assert_eq!(column.children[0].name, "core/paragraph");
        assert!(column.children[0].markup.contains("hi"));
        // Child markup is embedded in the parent's editable view.
        assert!(columns.markup.contains(&column.markup));
    }

    #[test]
    fn repeated_edits_of_an_unchanged_tree_agree() {
        let tree = tree_with(vec![
            BlockNode::new("core/paragraph").with_attr("content", "stable"),
        ]);
        let a = edit_snapshot(&tree);
        let b = edit_snapshot(&tree);
        assert_eq!(a.version, b.version);
        assert_eq!(a.nodes[0].markup, b.nodes[0].markup);
    }

    #[test]
    fn dangling_node_becomes_placeholder_without_aborting() {
        let tree = tree_with(vec![
            BlockNode::new("core/paragraph").with_attr("content", "before"),
            BlockNode::new("core/gallery"),
            BlockNode::new("core/paragraph").with_attr("content", "after"),
        ]);

        let snapshot = edit_snapshot(&tree);
        assert_eq!(snapshot.nodes.len(), 3);
        assert!(snapshot.nodes[1].missing);
        assert!(!snapshot.nodes[0].missing);
        assert!(!snapshot.nodes[2].missing);

        assert_eq!(snapshot.issues.len(), 1);
        assert_eq!(snapshot.issues[0].path, NodePath::new(vec![1]));
        assert!(matches!(snapshot.issues[0].error, RegistryError::NotFound(_)));
    }

    #[test]
    fn light_wrapper_does_not_change_edit_structure() {
        // core/column is a light wrapper in save output, but its edit view
        // still renders a container of its own.
        let tree = tree_with(vec![BlockNode::new("core/columns").with_child(
            BlockNode::new("core/column")
                .with_child(BlockNode::new("core/paragraph").with_attr("content", "x")),
        )]);

        let snapshot = edit_snapshot(&tree);
        let column = &snapshot.nodes[0].children[0];
        assert!(!column.markup.is_empty());
        assert_ne!(column.markup, column.children[0].markup);
    }
}
