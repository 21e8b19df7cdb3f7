use std::sync::Arc;

use crate::composing::{Attrs, BlockNode, CompositionTree, NodePath};
use crate::registry::Registry;
use crate::render::{RenderError, RenderIssue};

/// Serialized document plus any per-node resolution failures hit while
/// producing it. Dangling nodes still serialize (frame and attributes are
/// preserved, children nest inside), so authored structure survives a
/// missing block definition.
#[derive(Debug)]
pub struct SaveOutput {
    pub markup: String,
    pub issues: Vec<RenderIssue>,
}

/// Depth-first save traversal.
///
/// Each node's save callback receives the node's attributes and its
/// children's already-serialized frames; the pipeline wraps the result in
/// the node's comment frame. A type with `light_wrapper` set contributes no
/// container markup of its own — its frame wraps the bare concatenation of
/// its children's frames.
pub fn save_document(tree: &CompositionTree) -> SaveOutput {
    let mut issues = Vec::new();
    let markup: String = tree
        .roots()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            serialize_node(tree.registry(), node, NodePath::new(vec![index]), &mut issues)
        })
        .collect();
    SaveOutput { markup, issues }
}

/// Serialize twice and verify the outputs agree byte for byte.
///
/// For a fixed tree and fixed registry, save output must be stable — that
/// is what makes persisted content re-parseable later. Divergence means a
/// save callback is impure and is surfaced as
/// [`RenderError::NonDeterministicSave`] instead of being written out.
pub fn save_checked(tree: &CompositionTree) -> Result<SaveOutput, RenderError> {
    let first = save_document(tree);
    let second = save_document(tree);
    if first.markup != second.markup {
        let at = first
            .markup
            .bytes()
            .zip(second.markup.bytes())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| first.markup.len().min(second.markup.len()));
        return Err(RenderError::NonDeterministicSave {
            version: tree.version(),
            at,
        });
    }
    Ok(first)
}

fn serialize_node(
    registry: &Arc<Registry>,
    node: &BlockNode,
    path: NodePath,
    issues: &mut Vec<RenderIssue>,
) -> String {
    let children: Vec<String> = node
        .children()
        .iter()
        .enumerate()
        .map(|(index, child)| serialize_node(registry, child, path.child(index), issues))
        .collect();

    let inner = match registry.lookup(node.name()) {
        Ok(block) if block.supports().light_wrapper => children.concat(),
        Ok(block) => block.render().save(node.attrs(), &children),
        Err(error) => {
            issues.push(RenderIssue { path, error });
            children.concat()
        }
    };
    frame(node.name(), node.attrs(), &inner)
}

/// Comment frame around one node's inner markup:
/// `<!-- bw:ns/block {json} -->inner<!-- /bw:ns/block -->`, with the
/// attribute object omitted when empty and a self-closing form when the
/// inner markup is empty.
fn frame(name: &str, attrs: &Attrs, inner: &str) -> String {
    let attr_json = if attrs.is_empty() {
        String::new()
    } else {
        // Attrs is ordered, so the JSON object is byte-stable.
        format!(" {}", serde_json::to_string(attrs).expect("attribute values are plain JSON"))
    };
    if inner.is_empty() {
        format!("<!-- bw:{name}{attr_json} /-->")
    } else {
        format!("<!-- bw:{name}{attr_json} -->{inner}<!-- /bw:{name} -->")
    }
}
