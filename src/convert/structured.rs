//! Structured conversion strategy: per-element-type extraction.
//!
//! A flatter fallback than the structural walk. Recognized block elements
//! are rendered one by one in document order, everything else is ignored,
//! which makes the output immune to markup the walker mishandles. Inline
//! formatting inside blocks is deliberately dropped; only text, structure
//! and link targets survive.

use crate::dom::{self, Document, NodeId, NodeRef, Selection};
use crate::markdown;

/// Blocks handled directly, in document order.
const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, ul, ol, table, blockquote, pre, img";

/// Containers mined for loose text after the block pass.
const CONTAINER_SELECTOR: &str = "div, article, section, main";

/// Minimum loose text length (characters) for a container to be emitted.
const LOOSE_TEXT_MIN: usize = 100;

pub fn render(doc: &Document) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut handled: Vec<NodeId> = Vec::new();

    for node in doc.select(BLOCK_SELECTOR).nodes().to_vec() {
        if handled.iter().any(|id| dom::is_within(&node, *id)) {
            continue;
        }
        if let Some(rendered) = render_block(&node) {
            parts.push(rendered);
            handled.push(node.id);
        }
    }

    // Containers holding bare text with no block structure at all.
    for node in doc.select(CONTAINER_SELECTOR).nodes().to_vec() {
        if handled.iter().any(|id| dom::is_within(&node, *id)) {
            continue;
        }
        let sel = Selection::from(node);
        if sel.select("h1, h2, h3, h4, h5, h6, p, ul, ol, table").exists() {
            continue;
        }
        let text = dom::text_content(&sel);
        let text = text.trim();
        if text.chars().count() > LOOSE_TEXT_MIN {
            parts.push(markdown::escape_markdown(&collapse(text), false));
            handled.push(node.id);
        }
    }

    parts.join("\n\n")
}

fn render_block(node: &NodeRef) -> Option<String> {
    let sel = Selection::from(*node);
    let name = node.node_name()?.to_lowercase();

    let rendered = match name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = usize::from(name.as_bytes().get(1).copied().unwrap_or(b'1') - b'0');
            let text = plain_text(&sel)?;
            format!("{} {}", "#".repeat(level), text)
        }
        "p" => paragraph(&sel)?,
        "ul" => list(&sel, false)?,
        "ol" => list(&sel, true)?,
        "table" => {
            let table = markdown::html_table_to_markdown(&dom::outer_html(&sel));
            if table.is_empty() {
                return None;
            }
            table.trim_end().to_string()
        }
        "blockquote" => {
            let text = plain_text(&sel)?;
            format!("> {text}")
        }
        "pre" => {
            let text = dom::text_content(&sel);
            let text = text.trim_matches('\n');
            if text.trim().is_empty() {
                return None;
            }
            format!("```\n{text}\n```")
        }
        "img" => {
            let src = dom::get_attribute(&sel, "src")?;
            let alt = dom::get_attribute(&sel, "alt").unwrap_or_default();
            format!("![{}]({src})", markdown::escape_markdown(alt.trim(), false))
        }
        _ => return None,
    };

    Some(rendered)
}

/// A paragraph keeps its link targets but no other inline formatting.
fn paragraph(sel: &Selection) -> Option<String> {
    let mut out = String::new();
    for node in sel.nodes() {
        render_flat(node, &mut out);
    }
    let out = collapse(out.trim());
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn render_flat(node: &NodeRef, out: &mut String) {
    for child in dom::child_nodes(node) {
        if child.is_text() {
            out.push_str(&markdown::escape_markdown(
                &Selection::from(child).text(),
                false,
            ));
            continue;
        }
        if !child.is_element() {
            continue;
        }
        let sel = Selection::from(child);
        let is_anchor = child
            .node_name()
            .is_some_and(|n| n.eq_ignore_ascii_case("a"));
        if is_anchor {
            let label = dom::text_content(&sel);
            let label = collapse(label.trim());
            match dom::get_attribute(&sel, "href") {
                Some(href) if !label.is_empty() => {
                    out.push_str(&format!("[{label}]({href})"));
                }
                _ => out.push_str(&label),
            }
            continue;
        }
        render_flat(&child, out);
    }
}

fn list(sel: &Selection, ordered: bool) -> Option<String> {
    let node = sel.nodes().first()?;
    let mut lines: Vec<String> = Vec::new();

    let mut ordinal = 1usize;
    for child in dom::child_elements(node) {
        if !child.node_name().is_some_and(|n| n.eq_ignore_ascii_case("li")) {
            continue;
        }
        let Some(text) = plain_text(&Selection::from(child)) else {
            continue;
        };
        if ordered {
            lines.push(format!("{ordinal}. {text}"));
            ordinal += 1;
        } else {
            lines.push(format!("* {text}"));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn plain_text(sel: &Selection) -> Option<String> {
    let text = dom::text_content(sel);
    let text = collapse(text.trim());
    if text.is_empty() {
        None
    } else {
        Some(markdown::escape_markdown(&text, false))
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
