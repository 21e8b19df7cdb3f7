use serde_json::Value;

use crate::blocks::text;
use crate::composing::Attrs;
use crate::registry::{BlockType, Render};

struct HeadingRender;

/// Heading level from attributes, clamped to the h1..h6 range. Missing or
/// non-numeric levels fall back to 2.
fn level(attrs: &Attrs) -> u64 {
    attrs
        .get("level")
        .and_then(Value::as_u64)
        .unwrap_or(2)
        .clamp(1, 6)
}

impl Render for HeadingRender {
    fn edit(&self, attrs: &Attrs, _children: &[String]) -> String {
        let level = level(attrs);
        format!(
            "<h{level} class=\"bw-edit\">{}</h{level}>",
            html_escape::encode_text(text(attrs, "content"))
        )
    }

    fn save(&self, attrs: &Attrs, _children: &[String]) -> String {
        let content = text(attrs, "content");
        if content.is_empty() {
            return String::new();
        }
        let level = level(attrs);
        format!("<h{level}>{}</h{level}>", html_escape::encode_text(content))
    }
}

pub fn definition() -> BlockType {
    BlockType::new("core/heading", HeadingRender)
        .with_title("Heading")
        .with_description("A section heading, levels one through six.")
        .with_icon("heading")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_level_two() {
        let attrs = Attrs::from([("content".to_owned(), "Title".into())]);
        assert_eq!(HeadingRender.save(&attrs, &[]), "<h2>Title</h2>");
    }

    #[test]
    fn out_of_range_levels_clamp() {
        let attrs = Attrs::from([
            ("content".to_owned(), "Deep".into()),
            ("level".to_owned(), 9.into()),
        ]);
        assert_eq!(HeadingRender.save(&attrs, &[]), "<h6>Deep</h6>");

        let attrs = Attrs::from([
            ("content".to_owned(), "Top".into()),
            ("level".to_owned(), 0.into()),
        ]);
        assert_eq!(HeadingRender.save(&attrs, &[]), "<h1>Top</h1>");
    }
}
