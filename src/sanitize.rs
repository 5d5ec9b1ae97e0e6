//! DOM sanitizer.
//!
//! Strips non-content markup before any heuristic runs, so script and style
//! text never pollutes link-density or text-length metrics. Pure and
//! idempotent: absence of a matching node is a no-op, never a failure.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{self, Document, Selection};

/// Subtrees that never contain article content.
const NON_CONTENT_TAGS: &str = "script, style, noscript, iframe, object, embed, form";

#[allow(clippy::expect_used)]
static CDATA_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>").expect("CDATA_SECTION regex"));

#[allow(clippy::expect_used)]
static STYLE_WIDTH_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)width\s*:\s*(\d{1,3})%").expect("STYLE_WIDTH_PERCENT regex"));

/// Remove CDATA sections from raw markup before parsing.
///
/// The HTML parser would otherwise turn them into bogus comment nodes whose
/// payload (usually script or style text) is unreachable for tree-level
/// removal.
#[must_use]
pub fn strip_cdata(html: &str) -> Cow<'_, str> {
    CDATA_SECTION.replace_all(html, "")
}

/// Sanitize a parsed document in place.
///
/// Removes script/style/noscript/iframe/object/embed/form subtrees, every
/// inline `style` attribute and every `on*` event-handler attribute. When a
/// stripped `style` declared a percentage width, that value survives as a
/// plain `width` attribute so the sidebar-width heuristic keeps its input.
pub fn sanitize(doc: &Document) {
    dom::remove(&doc.select(NON_CONTENT_TAGS));

    let nodes = doc.select("*").nodes().to_vec();
    for node in nodes {
        let sel = Selection::from(node);
        for (name, value) in dom::get_all_attributes(&sel) {
            if name == "style" {
                if let Some(width) = percent_width(&value) {
                    if dom::get_attribute(&sel, "width").is_none() {
                        dom::set_attribute(&sel, "width", &format!("{width}%"));
                    }
                }
                dom::remove_attribute(&sel, "style");
            } else if name.starts_with("on") {
                dom::remove_attribute(&sel, &name);
            }
        }
    }
}

/// Parse a percentage width declaration out of an inline style value.
#[must_use]
pub fn percent_width(style: &str) -> Option<u32> {
    STYLE_WIDTH_PERCENT
        .captures(style)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_non_content_subtrees() {
        let doc = dom::parse(
            r#"<body><script>var x = 1;</script><style>p{color:red}</style>
            <iframe src="/ad"></iframe><form><input></form><p>keep</p></body>"#,
        );
        sanitize(&doc);

        assert!(!doc.select("script").exists());
        assert!(!doc.select("style").exists());
        assert!(!doc.select("iframe").exists());
        assert!(!doc.select("form").exists());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn strips_event_handlers_and_inline_style() {
        let doc = dom::parse(r#"<div onclick="evil()" onmouseover="x()" style="color:red">t</div>"#);
        sanitize(&doc);

        let div = doc.select("div");
        assert!(dom::get_attribute(&div, "onclick").is_none());
        assert!(dom::get_attribute(&div, "onmouseover").is_none());
        assert!(dom::get_attribute(&div, "style").is_none());
    }

    #[test]
    fn preserves_percentage_width_from_style() {
        let doc = dom::parse(r#"<div style="width: 20%; float: left">side</div>"#);
        sanitize(&doc);

        let div = doc.select("div");
        assert_eq!(dom::get_attribute(&div, "width").as_deref(), Some("20%"));
        assert!(dom::get_attribute(&div, "style").is_none());
    }

    #[test]
    fn script_text_no_longer_counts_as_content() {
        let doc = dom::parse("<body><script>var lots_of_code = 'xxxxxxxxxx';</script><p>hi</p></body>");
        sanitize(&doc);
        assert_eq!(doc.select("body").text().trim(), "hi");
    }

    #[test]
    fn strip_cdata_removes_sections() {
        let html = "before <![CDATA[ var hidden = 1; ]]> after";
        assert_eq!(strip_cdata(html), "before  after");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let doc = dom::parse(r#"<div style="width:30%" onclick="x()"><script>a</script><p>t</p></div>"#);
        sanitize(&doc);
        let once = doc.html().to_string();
        sanitize(&doc);
        assert_eq!(doc.html().to_string(), once);
    }

    #[test]
    fn no_matching_nodes_is_a_noop() {
        let doc = dom::parse("<article><p>clean already</p></article>");
        sanitize(&doc);
        assert!(doc.select("p").exists());
    }
}
