use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Turns Markdown into whatever the display shows as rich content.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// Hands the Markdown through untouched; used by the console binary and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl MarkdownRenderer for PlainRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"(https?://[^\s]+)").expect("static URL pattern is valid"))
}

/// Wrap every `http(s)://` URL in the line in an anchor tag.
pub fn linkify(line: &str) -> String {
    url_regex()
        .replace_all(line, r#"<a href="$1" class="link" target="_blank">$1</a>"#)
        .into_owned()
}

/// What the display collaborator receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum DisplayEvent {
    /// One line of plain text, possibly carrying link markup.
    Line(String),
    /// Pre-rendered rich content.
    Rich(String),
    Clear,
}
