//! Primary content extraction.
//!
//! Scores candidate containers by the text mass of their direct block
//! children, discounted by link density, and clones the winner into a
//! standalone document. When the winner is thin, a supplemental pass pulls
//! in likely-content regions the scorer missed.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{self, Document, NodeId, Selection};
use crate::metrics::MetricsCache;
use crate::options::Options;

/// Containers considered as extraction candidates.
const CANDIDATE_TAGS: &str = "article, main, section, div, td";

/// Block elements whose text counts toward a candidate's score.
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote", "ul", "ol", "table",
];

/// Likely-content regions scanned by the supplemental pass.
const SUPPLEMENTAL_SELECTORS: &str = "article, .article, .post, .content, .main-content, main, \
     #main, #content, .entry-content, [role='main'], [itemprop='articleBody'], .story, .text";

/// Score multiplier for candidates whose class or id names content.
const CONTENT_HINT_BONUS: f64 = 1.25;

#[allow(clippy::expect_used)]
static CONTENT_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|content|entry|main|post|story|text|body").expect("CONTENT_HINT regex")
});

/// Outcome of the extraction stage.
pub struct Extraction {
    /// Standalone document holding the extracted content.
    pub doc: Document,

    /// Whether the supplemental pass contributed additional regions.
    pub supplemented: bool,
}

/// Extract the primary content region of a cleaned document.
///
/// Falls back to the whole body when no candidate scores above zero, so the
/// stage never returns an empty tree for a page that has any text at all.
pub fn extract(doc: &Document, opts: &Options, cache: &mut MetricsCache) -> Extraction {
    let (candidate, candidate_score) = best_candidate(doc, opts, cache);

    let (candidate_sel, candidate_id) = match candidate {
        Some(id) if candidate_score > 0.0 => {
            let Some(node) = doc.select(CANDIDATE_TAGS).nodes().iter().find(|n| n.id == id).copied()
            else {
                return body_fallback(doc);
            };
            (Selection::from(node), id)
        }
        _ => {
            log::debug!("no candidate scored above zero, keeping whole body");
            return body_fallback(doc);
        }
    };

    let extracted = dom::clone_subtree(&candidate_sel);
    let mut supplemented = false;

    if dom::text_len(&extracted.select("body")) < opts.supplemental_min_chars {
        supplemented = supplement(doc, candidate_id, &extracted, opts);
    }

    Extraction { doc: extracted, supplemented }
}

fn body_fallback(doc: &Document) -> Extraction {
    Extraction {
        doc: dom::clone_subtree(&doc.select("body")),
        supplemented: false,
    }
}

/// Pick the highest-scoring candidate container, if any.
fn best_candidate(
    doc: &Document,
    opts: &Options,
    cache: &mut MetricsCache,
) -> (Option<NodeId>, f64) {
    let mut best: Option<NodeId> = None;
    let mut best_score = 0.0_f64;

    for node in doc.select(CANDIDATE_TAGS).nodes().to_vec() {
        let sel = Selection::from(node);
        let candidate_score = score(&sel, &node, opts, cache);
        if candidate_score > best_score {
            best = Some(node.id);
            best_score = candidate_score;
        }
    }

    (best, best_score)
}

/// Text mass of direct block children, discounted by the candidate's link
/// density, with a bonus for content-suggestive class or id names.
fn score(
    sel: &Selection,
    node: &dom::NodeRef,
    opts: &Options,
    cache: &mut MetricsCache,
) -> f64 {
    let mut block_text = 0usize;
    for child in dom::child_elements(node) {
        let Some(name) = child.node_name() else {
            continue;
        };
        if BLOCK_TAGS.contains(&name.to_lowercase().as_str()) {
            block_text += dom::text_len(&Selection::from(child));
        }
    }
    if block_text == 0 {
        return 0.0;
    }

    let density = cache.metrics(sel, opts).link_density();
    let mut value = block_text as f64 * (1.0 - density);

    if has_content_hint(sel) {
        value *= CONTENT_HINT_BONUS;
    }
    value
}

fn has_content_hint(sel: &Selection) -> bool {
    for attr in ["class", "id"] {
        if let Some(value) = dom::get_attribute(sel, attr) {
            if CONTENT_HINT.is_match(&value) {
                return true;
            }
        }
    }
    false
}

/// Pull likely-content regions outside the candidate into the extracted
/// document. Regions nested inside the candidate or inside an already
/// appended region are skipped so no text is duplicated.
fn supplement(
    source: &Document,
    candidate_id: NodeId,
    extracted: &Document,
    opts: &Options,
) -> bool {
    let target = extracted.select("body");
    let mut appended: Vec<NodeId> = Vec::new();

    for node in source.select(SUPPLEMENTAL_SELECTORS).nodes().to_vec() {
        if dom::is_within(&node, candidate_id) {
            continue;
        }
        if appended.iter().any(|id| dom::is_within(&node, *id)) {
            continue;
        }
        let sel = Selection::from(node);
        if dom::text_len(&sel) == 0 {
            continue;
        }
        dom::append_html(&target, &dom::outer_html(&sel));
        appended.push(node.id);
    }

    // Last resort: individual paragraphs of article length.
    if appended.is_empty() {
        for node in source.select("p").nodes().to_vec() {
            if dom::is_within(&node, candidate_id) {
                continue;
            }
            let sel = Selection::from(node);
            if dom::text_len(&sel) > opts.per_paragraph_min {
                dom::append_html(&target, &dom::outer_html(&sel));
                appended.push(node.id);
            }
        }
    }

    if appended.is_empty() {
        false
    } else {
        log::debug!("supplemental pass appended {} regions", appended.len());
        true
    }
}
