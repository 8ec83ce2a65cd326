//! Readable Text Extraction
//!
//! Decides what, if anything, a hovered element should say.
//! Priority: accessible name (`aria-label`), then `title`, then the
//! element's own text when its tag is readable and the text is short.

use lumen_dom::{DomTree, NodeId};

/// Tags whose text content may be read
pub const READABLE_TAGS: &[&str] = &[
    "button", "a", "h1", "h2", "h3", "h4", "h5", "h6", "p", "label", "span", "li", "td", "th",
];

/// Where the text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    AccessibleName,
    Title,
    Content,
}

/// Text chosen for a hovered element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadableText {
    pub source: TextSource,
    pub text: String,
}

/// Extract readable text for `node`.
///
/// Content text must be non-empty and shorter than `max_chars` characters
/// after trimming.
pub fn readable_text(tree: &DomTree, node: NodeId, max_chars: usize) -> Option<ReadableText> {
    let element = tree.get(node)?.as_element()?;

    for (name, source) in [("aria-label", TextSource::AccessibleName), ("title", TextSource::Title)] {
        if let Some(value) = element.get_attr(name).map(str::trim).filter(|v| !v.is_empty()) {
            return Some(ReadableText { source, text: value.to_string() });
        }
    }

    if !READABLE_TAGS.contains(&element.tag.as_str()) {
        return None;
    }
    let content = tree.text_content(node);
    let trimmed = content.trim();
    let len = trimmed.chars().count();
    (len > 0 && len < max_chars).then(|| ReadableText {
        source: TextSource::Content,
        text: trimmed.to_string(),
    })
}
