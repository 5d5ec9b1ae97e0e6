//! Plain-text strategy: the cascade's floor.
//!
//! Emits visible text with paragraph breaks and no structural formatting.
//! Guaranteed non-empty for any input with visible text, which is what makes
//! the cascade total.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{self, Document, NodeRef, Selection};

#[allow(clippy::expect_used)]
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("ANY_TAG regex"));

#[allow(clippy::expect_used)]
static ANY_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[a-zA-Z]{2,8};|&#\d{1,7};").expect("ANY_ENTITY regex"));

/// Render the visible text of a document, one chunk per text node.
pub fn render(doc: &Document) -> String {
    let body = doc.select("body");
    let Some(node) = body.nodes().first() else {
        return strip_markup(&doc.html());
    };

    let mut chunks: Vec<String> = Vec::new();
    collect(node, &mut chunks);
    chunks.join("\n\n")
}

fn collect(node: &NodeRef, chunks: &mut Vec<String>) {
    for child in dom::child_nodes(node) {
        if child.is_text() {
            let text = Selection::from(child).text();
            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !collapsed.is_empty() {
                chunks.push(collapsed);
            }
            continue;
        }
        if child.is_element() {
            collect(&child, chunks);
        }
    }
}

/// Last-resort text recovery straight from raw markup, for input the parser
/// mangled. Tags are cut, entities become spaces, whitespace is normalized.
#[must_use]
pub fn strip_markup(raw: &str) -> String {
    let text = ANY_TAG.replace_all(raw, " ");
    let text = ANY_ENTITY.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    #[test]
    fn text_chunks_become_paragraphs() {
        let doc = parse("<body><h1>Title</h1><p>One.</p><p>Two.</p></body>");
        assert_eq!(render(&doc), "Title\n\nOne.\n\nTwo.");
    }

    #[test]
    fn no_markup_characters_in_output() {
        let doc = parse("<body><div><span>a</span> &amp; <b>b</b></div></body>");
        let text = render(&doc);
        assert!(!text.contains('<'));
        assert!(!text.contains('>'));
    }

    #[test]
    fn never_empty_for_visible_text() {
        let doc = parse("<body><p>something</p></body>");
        assert!(!render(&doc).trim().is_empty());
    }

    #[test]
    fn strip_markup_handles_malformed_fragments() {
        let out = strip_markup("<div><p>broken <b>markup with text</div>");
        assert_eq!(out, "broken markup with text");
        assert!(!out.contains('<'));
    }

    #[test]
    fn strip_markup_spaces_out_entities() {
        assert_eq!(strip_markup("a&nbsp;b &lt;c&gt;"), "a b c");
    }
}
