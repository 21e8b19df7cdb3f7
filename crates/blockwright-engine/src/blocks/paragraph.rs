use crate::blocks::text;
use crate::composing::Attrs;
use crate::registry::{BlockType, Render};

struct ParagraphRender;

impl Render for ParagraphRender {
    fn edit(&self, attrs: &Attrs, _children: &[String]) -> String {
        format!(
            "<p class=\"bw-edit\">{}</p>",
            html_escape::encode_text(text(attrs, "content"))
        )
    }

    fn save(&self, attrs: &Attrs, _children: &[String]) -> String {
        let content = text(attrs, "content");
        if content.is_empty() {
            return String::new();
        }
        format!("<p>{}</p>", html_escape::encode_text(content))
    }
}

pub fn definition() -> BlockType {
    BlockType::new("core/paragraph", ParagraphRender)
        .with_title("Paragraph")
        .with_description("A single run of body text.")
        .with_icon("paragraph")
}
