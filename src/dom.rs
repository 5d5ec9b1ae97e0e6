//! Thin adapter over `dom_query`.
//!
//! Collects the handful of DOM operations the pipeline needs behind stable
//! names, so the rest of the crate never touches `dom_query` internals
//! directly.

pub use dom_query::{Document, NodeId, NodeRef, Selection};
pub use tendril::StrTendril;

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Tag name of the first node in the selection, lowercase.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// All text content of the selection and its descendants.
///
/// Returns `StrTendril` for zero-copy passing; deref to `&str` for reading.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Trimmed text length in characters.
#[must_use]
pub fn text_len(sel: &Selection) -> usize {
    text_content(sel).trim().chars().count()
}

/// Outer HTML of the selection.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

/// Attribute value, if present.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

/// All attributes of the first node as name/value pairs.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Remove the selection's nodes (and their subtrees) from the tree.
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Child nodes of a node, in order, including text nodes.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().collect()
}

/// Element children of a node, in order.
#[must_use]
pub fn child_elements<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    child_nodes(node)
        .into_iter()
        .filter(dom_query::NodeRef::is_element)
        .collect()
}

/// Text belonging to the node itself: its direct text-node children only,
/// excluding descendant elements.
#[must_use]
pub fn own_text(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        for child in child_nodes(node) {
            if child.is_text() {
                out.push_str(&Selection::from(child).text());
            }
        }
    }
    out
}

/// Whether `node` is `ancestor_id` itself or one of its descendants.
#[must_use]
pub fn is_within(node: &NodeRef, ancestor_id: NodeId) -> bool {
    if node.id == ancestor_id {
        return true;
    }
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.id == ancestor_id {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Clone the subtree of a selection into a standalone document.
///
/// The fragment is re-parsed, so the clone's body contains the original
/// element with all descendants.
#[must_use]
pub fn clone_subtree(sel: &Selection) -> Document {
    Document::from(outer_html(sel).to_string())
}

/// Append an HTML fragment to the selection's content.
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_text_skips_descendant_elements() {
        let doc = parse("<div>own <span>nested</span> text</div>");
        let div = doc.select("div");

        let own = own_text(&div);
        assert!(own.contains("own"));
        assert!(own.contains("text"));
        assert!(!own.contains("nested"));
    }

    #[test]
    fn child_nodes_includes_text_nodes() {
        let doc = parse("<p>before <b>bold</b> after</p>");
        let p = doc.select("p");
        let Some(node) = p.nodes().first() else {
            panic!("p not found");
        };

        let children = child_nodes(node);
        assert_eq!(children.len(), 3);
        assert_eq!(child_elements(node).len(), 1);
    }

    #[test]
    fn is_within_tracks_ancestry() {
        let doc = parse(r#"<div id="outer"><section><p id="inner">x</p></section></div>"#);
        let outer = doc.select("#outer");
        let inner = doc.select("#inner");

        let Some(outer_node) = outer.nodes().first() else {
            panic!("outer not found");
        };
        let Some(inner_node) = inner.nodes().first() else {
            panic!("inner not found");
        };

        assert!(is_within(inner_node, outer_node.id));
        assert!(!is_within(outer_node, inner_node.id));
    }

    #[test]
    fn clone_subtree_is_independent() {
        let doc = parse(r#"<div id="src"><p>content</p></div>"#);
        let cloned = clone_subtree(&doc.select("#src"));

        cloned.select("p").remove();
        assert!(doc.select("p").exists());
        assert!(!cloned.select("p").exists());
    }

    #[test]
    fn text_len_counts_trimmed_chars() {
        let doc = parse("<p>  héllo  </p>");
        assert_eq!(text_len(&doc.select("p")), 5);
    }
}
