//! Primary conversion strategy: a direct structural walk of the DOM.
//!
//! Produces the richest Markdown of the cascade. Unknown elements are
//! transparent containers, so novel markup degrades to its text rather than
//! leaking tags.

use crate::dom::{self, Document, NodeRef, Selection};
use crate::markdown;

/// Inline rendering context carried through the walk.
#[derive(Default)]
struct Ctx {
    /// Open lists, innermost last. `None` marks unordered, `Some` carries
    /// the next ordinal of an ordered list.
    lists: Vec<Option<usize>>,
}

pub fn render(doc: &Document) -> String {
    let body = doc.select("body");
    let Some(node) = body.nodes().first() else {
        return String::new();
    };

    let mut out = String::new();
    let mut ctx = Ctx::default();
    walk_children(node, &mut out, &mut ctx);
    finish(out)
}

fn walk_children(node: &NodeRef, out: &mut String, ctx: &mut Ctx) {
    for child in dom::child_nodes(node) {
        walk(&child, out, ctx);
    }
}

fn walk(node: &NodeRef, out: &mut String, ctx: &mut Ctx) {
    if node.is_text() {
        emit_text(&Selection::from(*node).text(), out);
        return;
    }
    if !node.is_element() {
        return;
    }

    let Some(name) = node.node_name() else {
        return;
    };

    match name.to_lowercase().as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name.as_bytes().get(1).map_or(1, |b| usize::from(b - b'0'));
            heading(node, level, out, ctx);
        }
        "p" => {
            block_break(out);
            walk_children(node, out, ctx);
            block_break(out);
        }
        "br" => out.push('\n'),
        // A thematic break as `---` would be eaten by the junk-line filter
        // downstream, so it degrades to a paragraph break.
        "hr" => block_break(out),
        "strong" | "b" => wrapped(node, "**", out, ctx),
        "em" | "i" => wrapped(node, "*", out, ctx),
        "code" => inline_code(node, out),
        "pre" => fenced_code(node, out),
        "a" => anchor(node, out, ctx),
        "img" => image(node, out),
        "ul" => list(node, None, out, ctx),
        "ol" => list(node, Some(1), out, ctx),
        "li" => list_item(node, out, ctx),
        "blockquote" => blockquote(node, out, ctx),
        "table" => table(node, out),
        // Dead weight that sanitizing may have missed in a re-parsed clone.
        "script" | "style" | "noscript" | "template" => {}
        _ => walk_children(node, out, ctx),
    }
}

fn emit_text(text: &str, out: &mut String) {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return;
    }
    if text.starts_with(char::is_whitespace) && needs_space(out) {
        out.push(' ');
    }
    out.push_str(&markdown::escape_markdown(&collapsed, false));
    if text.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn needs_space(out: &str) -> bool {
    out.chars().next_back().is_some_and(|c| !c.is_whitespace())
}

fn heading(node: &NodeRef, level: usize, out: &mut String, ctx: &mut Ctx) {
    let text = capture(node, ctx);
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    block_break(out);
    for _ in 0..level {
        out.push('#');
    }
    out.push(' ');
    out.push_str(text);
    block_break(out);
}

fn wrapped(node: &NodeRef, marker: &str, out: &mut String, ctx: &mut Ctx) {
    let inner = capture(node, ctx);
    let inner = inner.trim();
    if inner.is_empty() {
        return;
    }
    if needs_space(out) {
        out.push(' ');
    }
    out.push_str(marker);
    out.push_str(inner);
    out.push_str(marker);
}

// A `code` child of `pre` never reaches here: `pre` takes its whole text
// content for the fence without walking children.
fn inline_code(node: &NodeRef, out: &mut String) {
    let text = dom::text_content(&Selection::from(*node));
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    out.push('`');
    out.push_str(text);
    out.push('`');
}

fn fenced_code(node: &NodeRef, out: &mut String) {
    let text = dom::text_content(&Selection::from(*node));
    let text = text.trim_matches('\n');
    if text.trim().is_empty() {
        return;
    }
    block_break(out);
    out.push_str("```\n");
    out.push_str(text);
    out.push_str("\n```");
    block_break(out);
}

fn anchor(node: &NodeRef, out: &mut String, ctx: &mut Ctx) {
    let sel = Selection::from(*node);
    let label = capture(node, ctx);
    let label = label.trim();
    let href = dom::get_attribute(&sel, "href");

    match href {
        Some(href) if !label.is_empty() => {
            if needs_space(out) && !matches!(out.chars().next_back(), Some('(' | '[')) {
                out.push(' ');
            }
            out.push('[');
            out.push_str(label);
            out.push_str("](");
            out.push_str(&href);
            out.push(')');
        }
        _ => out.push_str(label),
    }
}

fn image(node: &NodeRef, out: &mut String) {
    let sel = Selection::from(*node);
    let Some(src) = dom::get_attribute(&sel, "src") else {
        return;
    };
    let alt = dom::get_attribute(&sel, "alt").unwrap_or_default();
    if needs_space(out) {
        out.push(' ');
    }
    out.push_str("![");
    out.push_str(&markdown::escape_markdown(alt.trim(), false));
    out.push_str("](");
    out.push_str(&src);
    out.push(')');
}

fn list(node: &NodeRef, ordered: Option<usize>, out: &mut String, ctx: &mut Ctx) {
    if ctx.lists.is_empty() {
        block_break(out);
    } else if !out.ends_with('\n') {
        out.push('\n');
    }
    ctx.lists.push(ordered);
    walk_children(node, out, ctx);
    ctx.lists.pop();
    if ctx.lists.is_empty() {
        block_break(out);
    }
}

fn list_item(node: &NodeRef, out: &mut String, ctx: &mut Ctx) {
    let depth = ctx.lists.len().saturating_sub(1);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    for _ in 0..depth {
        out.push_str("  ");
    }
    match ctx.lists.last_mut() {
        Some(Some(counter)) => {
            out.push_str(&format!("{counter}. "));
            *counter += 1;
        }
        _ => out.push_str("* "),
    }
    walk_children(node, out, ctx);
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

fn blockquote(node: &NodeRef, out: &mut String, ctx: &mut Ctx) {
    let inner = capture(node, ctx);
    let inner = inner.trim();
    if inner.is_empty() {
        return;
    }
    block_break(out);
    for line in inner.lines() {
        out.push_str("> ");
        out.push_str(line);
        out.push('\n');
    }
    block_break(out);
}

fn table(node: &NodeRef, out: &mut String) {
    let rendered = markdown::html_table_to_markdown(&dom::outer_html(&Selection::from(*node)));
    if rendered.is_empty() {
        return;
    }
    block_break(out);
    out.push_str(rendered.trim_end());
    block_break(out);
}

/// Render a node's children into a fresh buffer.
fn capture(node: &NodeRef, ctx: &mut Ctx) -> String {
    let mut buf = String::new();
    walk_children(node, &mut buf, ctx);
    buf
}

fn block_break(out: &mut String) {
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
    if out.is_empty() {
        return;
    }
    while out.ends_with("\n\n\n") {
        out.pop();
    }
    if out.ends_with("\n\n") {
        return;
    }
    if out.ends_with('\n') {
        out.push('\n');
    } else {
        out.push_str("\n\n");
    }
}

fn finish(out: String) -> String {
    out.trim().to_string()
}
