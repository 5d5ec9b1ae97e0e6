//! Boilerplate detection and removal.
//!
//! Two cooperating passes: a fixed selector catalogue for structurally
//! declared chrome, and content heuristics for pages that declare nothing.
//! The detector runs at two checkpoints, once on the sanitized document and
//! once on the extracted candidate, and both passes honor the rich-content
//! protection threshold.

pub mod catalogue;
pub mod heuristics;

use crate::dom::{self, Document, Selection};
use crate::metrics::MetricsCache;
use crate::options::Options;

pub use catalogue::{RuleGroup, SelectorRule, SELECTOR_RULES};
pub use heuristics::detect_nav_by_content;

/// Apply the selector catalogue to the document.
///
/// Matches above the rich-content threshold are kept unless the rule is
/// marked `removes_rich`. Returns the number of nodes removed.
pub fn remove_by_selectors(doc: &Document, opts: &Options, cache: &mut MetricsCache) -> usize {
    let mut removed = 0;

    for rule in SELECTOR_RULES {
        let matches = doc.select(rule.css).nodes().to_vec();
        for node in matches {
            let sel = Selection::from(node);
            if !rule.removes_rich {
                let text_len = cache.text_len(&sel, opts);
                if text_len > opts.rich_content_threshold {
                    log::debug!(
                        "kept rich match of `{}` ({:?}, {} chars)",
                        rule.css,
                        rule.group,
                        text_len
                    );
                    continue;
                }
            }
            dom::remove(&sel);
            removed += 1;
        }
    }

    if removed > 0 {
        log::debug!("selector catalogue removed {removed} nodes");
    }
    removed
}

/// First checkpoint, run on the freshly sanitized document.
///
/// The selector pass always runs. The content heuristics only run when the
/// selector pass kept most of the page text; once the page has already lost
/// more than the configured fraction, further aggressive removal risks
/// eating the article itself.
pub fn first_checkpoint(
    doc: &Document,
    opts: &Options,
    cache: &mut MetricsCache,
    original_text_len: usize,
) {
    remove_by_selectors(doc, opts, cache);

    let remaining = dom::text_len(&doc.select("body"));
    let floor = original_text_len as f64 * (1.0 - opts.first_pass_loss_ratio);
    if (remaining as f64) < floor {
        log::warn!(
            "selector pass dropped text {original_text_len} -> {remaining}, skipping content heuristics"
        );
        return;
    }

    let removed = detect_nav_by_content(doc, opts, cache);
    if removed > 0 {
        log::debug!("content heuristics removed {removed} nodes at first checkpoint");
    }
}

/// Second checkpoint, run on the extracted candidate subtree.
///
/// Re-applies the selector catalogue (extraction can surface regions that
/// were nested out of reach), then runs the content heuristics only when the
/// candidate is large enough that losing a misjudged node cannot hollow it
/// out.
pub fn second_checkpoint(doc: &Document, opts: &Options, cache: &mut MetricsCache) {
    remove_by_selectors(doc, opts, cache);

    let text_len = dom::text_len(&doc.select("body"));
    if text_len <= opts.advanced_detection_min_chars {
        log::debug!("candidate too small ({text_len} chars) for advanced detection");
        return;
    }

    let removed = detect_nav_by_content(doc, opts, cache);
    if removed > 0 {
        log::debug!("content heuristics removed {removed} nodes at second checkpoint");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_pass_removes_declared_chrome() {
        let doc = dom::parse(
            r#"<body><header>site</header><nav>menu</nav>
            <article><p>the story</p></article>
            <aside>related</aside><footer>c</footer></body>"#,
        );
        remove_by_selectors(&doc, &Options::default(), &mut MetricsCache::new());

        assert!(!doc.select("header").exists());
        assert!(!doc.select("nav").exists());
        assert!(!doc.select("aside").exists());
        assert!(!doc.select("footer").exists());
        assert!(doc.select("article p").exists());
    }

    #[test]
    fn rich_aside_is_protected() {
        let essay = "substantial sidebar essay text ".repeat(50); // ~1550 chars
        let html = format!("<body><aside>{essay}</aside><p>main</p></body>");
        let doc = dom::parse(&html);
        remove_by_selectors(&doc, &Options::default(), &mut MetricsCache::new());

        assert!(doc.select("aside").exists());
    }

    #[test]
    fn rich_advertisement_is_still_removed() {
        let filler = "sponsored filler text ".repeat(80); // well above the threshold
        let html = format!(r#"<body><div class="advertisement">{filler}</div><p>m</p></body>"#);
        let doc = dom::parse(&html);
        remove_by_selectors(&doc, &Options::default(), &mut MetricsCache::new());

        assert!(!doc.select(".advertisement").exists());
    }

    #[test]
    fn heavy_first_pass_loss_skips_heuristics() {
        // Almost all text sits in an ad block removed despite its bulk, so
        // the selector pass alone exceeds the loss ratio. The link-heavy div
        // carries an id no catalogue rule matches, so only the (skipped)
        // heuristics could have removed it.
        let bulk = "sponsored resident text ".repeat(60);
        let anchors: String = (0..10).map(|i| format!("<a href=\"/{i}\">x</a>")).collect();
        let html = format!(
            "<body><div class=\"advertisement\">{bulk}</div><div id=\"quicklinks\">{anchors}</div><p>tiny</p></body>"
        );
        let doc = dom::parse(&html);
        let opts = Options::default();
        let mut cache = MetricsCache::new();

        let original = dom::text_len(&doc.select("body"));
        first_checkpoint(&doc, &opts, &mut cache, original);

        assert!(!doc.select(".advertisement").exists());
        assert!(doc.select("#quicklinks").exists());
    }

    #[test]
    fn first_checkpoint_runs_heuristics_on_modest_loss() {
        let prose = "article paragraph prose ".repeat(40);
        let anchors: String = (0..10).map(|i| format!("<a href=\"/{i}\">x</a>")).collect();
        let html = format!(
            "<body><div id=\"quicklinks\">{anchors}</div><article><p>{prose}</p></article></body>"
        );
        let doc = dom::parse(&html);
        let opts = Options::default();
        let mut cache = MetricsCache::new();

        let original = dom::text_len(&doc.select("body"));
        first_checkpoint(&doc, &opts, &mut cache, original);

        assert!(!doc.select("#quicklinks").exists());
        assert!(doc.select("article p").exists());
    }

    #[test]
    fn second_checkpoint_skips_small_candidates() {
        let anchors: String = (0..10).map(|i| format!("<a href=\"/{i}\">x</a>")).collect();
        let html = format!("<body><div id=\"m\">{anchors}</div><p>short candidate</p></body>");
        let doc = dom::parse(&html);

        second_checkpoint(&doc, &Options::default(), &mut MetricsCache::new());
        // Under the advanced-detection floor, only the catalogue applies and
        // nothing here matches it.
        assert!(doc.select("#m").exists());
    }

    #[test]
    fn second_checkpoint_cleans_large_candidates() {
        let prose = "long extracted article text ".repeat(60); // ~1700 chars
        let anchors: String = (0..10).map(|i| format!("<a href=\"/{i}\">x</a>")).collect();
        let html = format!("<body><div id=\"m\">{anchors}</div><p>{prose}</p></body>");
        let doc = dom::parse(&html);

        second_checkpoint(&doc, &Options::default(), &mut MetricsCache::new());
        assert!(!doc.select("#m").exists());
        assert!(doc.select("p").exists());
    }
}
