use std::sync::Arc;

use blockwright_engine::{
    BlockNode, BlockType, CompositionTree, NodePath, Registry, Render, RegistryError, TreeError,
    blocks, composing::invariants, edit_snapshot, parse_document, save_checked, save_document,
};
use pretty_assertions::assert_eq;

fn registry() -> Arc<Registry> {
    let registry = Arc::new(Registry::new());
    blocks::register_builtins(&registry).unwrap();
    registry
}

fn paragraph(text: &str) -> BlockNode {
    BlockNode::new("core/paragraph").with_attr("content", text)
}

/// Two-column page built through the validated mutation API.
fn two_column_tree(registry: Arc<Registry>) -> CompositionTree {
    let mut tree = CompositionTree::new(registry);
    tree.insert(
        BlockNode::new("core/heading")
            .with_attr("content", "Welcome")
            .with_attr("level", 1),
        None,
        0,
    )
    .unwrap();
    let columns = tree.insert(BlockNode::new("core/columns"), None, 1).unwrap();
    let left = tree
        .insert(BlockNode::new("core/column").with_attr("width", "50%"), Some(&columns), 0)
        .unwrap();
    let right = tree
        .insert(BlockNode::new("core/column"), Some(&columns), 1)
        .unwrap();
    tree.insert(paragraph("Left side"), Some(&left), 0).unwrap();
    tree.insert(paragraph("Right side"), Some(&right), 0).unwrap();
    tree
}

#[test]
fn save_then_parse_yields_an_equivalent_tree() {
    let registry = registry();
    let tree = two_column_tree(Arc::clone(&registry));

    let saved = save_checked(&tree).unwrap();
    assert!(saved.issues.is_empty());

    let reparsed = parse_document(&saved.markup).unwrap();
    assert_eq!(reparsed.len(), tree.roots().len());
    for (original, rebuilt) in tree.roots().iter().zip(&reparsed) {
        assert!(
            original.structurally_equal(rebuilt),
            "round trip changed {}",
            original.name()
        );
    }

    // And the rebuilt tree saves to the same bytes.
    let rebuilt_tree = CompositionTree::from_nodes(registry, reparsed);
    assert_eq!(save_document(&rebuilt_tree).markup, saved.markup);
}

#[test]
fn two_saves_of_an_unchanged_tree_are_identical() {
    let tree = two_column_tree(registry());
    assert_eq!(save_document(&tree).markup, save_document(&tree).markup);
}

#[test]
fn column_cannot_be_moved_to_the_root() {
    let registry = registry();
    let mut tree = two_column_tree(Arc::clone(&registry));
    let before = save_document(&tree).markup;

    let err = tree
        .move_node(&NodePath::new(vec![1, 0]), None, 0)
        .unwrap_err();
    assert!(matches!(err, TreeError::PlacementRejected { .. }));
    assert_eq!(save_document(&tree).markup, before);
}

#[test]
fn unregistering_a_type_degrades_only_its_nodes() {
    let registry = registry();
    let tree = two_column_tree(Arc::clone(&registry));

    registry.unregister("core/paragraph").unwrap();

    let snapshot = edit_snapshot(&tree);
    assert_eq!(snapshot.issues.len(), 2);
    for issue in &snapshot.issues {
        assert!(matches!(issue.error, RegistryError::NotFound(ref name) if name == "core/paragraph"));
    }
    // The heading and layout still render.
    assert!(!snapshot.nodes[0].missing);
    assert!(!snapshot.nodes[1].missing);
    assert!(snapshot.nodes[1].children[0].children[0].missing);

    // Saving still preserves the dangling nodes' frames, so nothing is
    // lost once the type is registered again.
    let saved = save_document(&tree);
    assert_eq!(saved.issues.len(), 2);
    blocks::register_builtins(&registry).unwrap();
    let reparsed = parse_document(&saved.markup).unwrap();
    let restored = CompositionTree::from_nodes(registry, reparsed);
    assert!(invariants::check(&restored).is_empty());
    assert!(save_document(&restored).issues.is_empty());
}

#[test]
fn reregistration_changes_subsequent_renders() {
    struct Shout;

    impl Render for Shout {
        fn edit(&self, attrs: &blockwright_engine::Attrs, _children: &[String]) -> String {
            self.save(attrs, _children)
        }

        fn save(&self, attrs: &blockwright_engine::Attrs, _children: &[String]) -> String {
            let content = attrs.get("content").and_then(|v| v.as_str()).unwrap_or("");
            format!("<p>{}!</p>", content.to_uppercase())
        }
    }

    let registry = registry();
    let tree = CompositionTree::from_nodes(
        Arc::clone(&registry),
        vec![paragraph("quiet words")],
    );

    let before = save_document(&tree).markup;
    assert!(before.contains("<p>quiet words</p>"));

    registry
        .register(
            BlockType::new("core/paragraph", Shout)
                .with_title("Paragraph")
                .with_description("A single run of body text."),
        )
        .unwrap();

    let after = save_document(&tree).markup;
    assert!(after.contains("<p>QUIET WORDS!</p>"));
}

#[test]
fn persisted_content_with_a_missing_plugin_still_loads() {
    let markup = "<!-- bw:acme/map {\"zoom\":4} /--><!-- bw:core/paragraph {\"content\":\"hi\"} --><p>hi</p><!-- /bw:core/paragraph -->";
    let nodes = parse_document(markup).unwrap();
    let tree = CompositionTree::from_nodes(registry(), nodes);

    let violations = invariants::check(&tree);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, NodePath::new(vec![0]));

    // The unknown block round-trips untouched.
    let saved = save_document(&tree);
    let reparsed = parse_document(&saved.markup).unwrap();
    assert!(tree.roots()[0].structurally_equal(&reparsed[0]));
}
