//! Multi-column layout: the `core/columns` container and the restricted
//! `core/column` child that may only live directly inside it.

use crate::blocks::text;
use crate::composing::Attrs;
use crate::registry::{BlockType, Render, Supports};

struct ColumnsRender;

impl Render for ColumnsRender {
    fn edit(&self, _attrs: &Attrs, children: &[String]) -> String {
        format!(
            "<div class=\"bw-columns bw-edit\">{}</div>",
            children.concat()
        )
    }

    fn save(&self, _attrs: &Attrs, children: &[String]) -> String {
        format!("<div class=\"bw-columns\">{}</div>", children.concat())
    }
}

struct ColumnRender;

impl Render for ColumnRender {
    fn edit(&self, attrs: &Attrs, children: &[String]) -> String {
        let width = text(attrs, "width");
        if width.is_empty() {
            format!("<div class=\"bw-column bw-edit\">{}</div>", children.concat())
        } else {
            format!(
                "<div class=\"bw-column bw-edit\" style=\"flex-basis:{}\">{}</div>",
                html_escape::encode_double_quoted_attribute(width),
                children.concat()
            )
        }
    }

    // The save assembler skips this wrapper for light-wrapper types; the
    // column's persisted form is just its children's markup.
    fn save(&self, _attrs: &Attrs, children: &[String]) -> String {
        children.concat()
    }
}

pub fn columns_definition() -> BlockType {
    BlockType::new("core/columns", ColumnsRender)
        .with_title("Columns")
        .with_description("A multi-column layout container.")
        .with_icon("columns")
}

pub fn column_definition() -> BlockType {
    BlockType::new("core/column", ColumnRender)
        .with_title("Column")
        .with_description("A single column within a columns block.")
        .with_icon("column")
        .with_parent(["core/columns"])
        .with_supports(Supports {
            reusable: false,
            html: false,
            light_wrapper: true,
        })
}
