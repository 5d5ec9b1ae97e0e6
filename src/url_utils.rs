//! Link and image URL absolutization.

use url::Url;

use crate::dom::{self, Document, Selection};

/// Schemes and prefixes that are never rewritten.
const SKIP_PREFIXES: &[&str] = &[
    "http://", "https://", "mailto:", "tel:", "data:", "javascript:", "#",
];

/// Rewrite relative `a[href]` and `img[src]` values against a base URL.
///
/// Returns the number of attributes rewritten. Values that fail to join
/// against the base are left untouched.
pub fn absolutize(doc: &Document, base: &Url) -> usize {
    let mut rewritten = 0;
    rewritten += rewrite(doc, base, "a[href]", "href");
    rewritten += rewrite(doc, base, "img[src]", "src");
    if rewritten > 0 {
        log::debug!("absolutized {rewritten} URLs against {base}");
    }
    rewritten
}

fn rewrite(doc: &Document, base: &Url, selector: &str, attribute: &str) -> usize {
    let mut rewritten = 0;
    for node in doc.select(selector).nodes().to_vec() {
        let sel = Selection::from(node);
        let Some(value) = dom::get_attribute(&sel, attribute) else {
            continue;
        };
        let trimmed = value.trim();
        if trimmed.is_empty() || SKIP_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            continue;
        }
        if let Ok(resolved) = base.join(trimmed) {
            dom::set_attribute(&sel, attribute, resolved.as_str());
            rewritten += 1;
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        match Url::parse("https://example.com/articles/post.html") {
            Ok(url) => url,
            Err(err) => panic!("base url: {err}"),
        }
    }

    #[test]
    fn relative_paths_are_resolved() {
        let doc = dom::parse(r#"<p><a href="/about">about</a> <img src="img/x.png"></p>"#);
        absolutize(&doc, &base());

        assert_eq!(
            dom::get_attribute(&doc.select("a"), "href").as_deref(),
            Some("https://example.com/about")
        );
        assert_eq!(
            dom::get_attribute(&doc.select("img"), "src").as_deref(),
            Some("https://example.com/articles/img/x.png")
        );
    }

    #[test]
    fn absolute_and_special_urls_are_untouched() {
        let doc = dom::parse(
            r##"<p><a href="https://other.org/x">a</a>
            <a href="mailto:hi@example.com">b</a>
            <a href="#section">c</a></p>"##,
        );
        let rewritten = absolutize(&doc, &base());
        assert_eq!(rewritten, 0);
        assert!(doc.select("a[href='https://other.org/x']").exists());
    }

    #[test]
    fn protocol_relative_urls_inherit_the_base_scheme() {
        let doc = dom::parse(r#"<a href="//cdn.example.com/lib.js">lib</a>"#);
        absolutize(&doc, &base());
        assert_eq!(
            dom::get_attribute(&doc.select("a"), "href").as_deref(),
            Some("https://cdn.example.com/lib.js")
        );
    }
}
