use crate::blocks::text;
use crate::composing::Attrs;
use crate::registry::{BlockType, Render};

struct QuoteRender;

impl Render for QuoteRender {
    fn edit(&self, attrs: &Attrs, children: &[String]) -> String {
        format!(
            "<blockquote class=\"bw-edit\">{}{}</blockquote>",
            children.concat(),
            citation(attrs)
        )
    }

    fn save(&self, attrs: &Attrs, children: &[String]) -> String {
        let body = children.concat();
        let cite = citation(attrs);
        if body.is_empty() && cite.is_empty() {
            return String::new();
        }
        format!("<blockquote>{body}{cite}</blockquote>")
    }
}

fn citation(attrs: &Attrs) -> String {
    let cite = text(attrs, "citation");
    if cite.is_empty() {
        String::new()
    } else {
        format!("<cite>{}</cite>", html_escape::encode_text(cite))
    }
}

pub fn definition() -> BlockType {
    BlockType::new("core/quote", QuoteRender)
        .with_title("Quote")
        .with_description("Quoted content with an optional citation.")
        .with_icon("quote")
}
