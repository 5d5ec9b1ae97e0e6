//! Content-driven boilerplate detection.
//!
//! Four independent signals, each sufficient on its own to flag a node as
//! boilerplate. Missing preconditions (no links, no width attribute) mean
//! "signal does not apply", never an error. Every removal is subject to the
//! rich-content protection in the caller.

use std::collections::HashSet;

use crate::dom::{self, Document, NodeId, Selection};
use crate::metrics::MetricsCache;
use crate::options::Options;
use crate::sanitize::percent_width;

/// High-signal terms whose presence in a node's own text marks navigation.
const NAV_TERMS: &[&str] = &["menu", "navigation", "links", "liens"];

/// Upper text bound for the positional first-child (header) check.
const POSITIONAL_HEAD_MAX_CHARS: usize = 200;

/// Upper text bound for the positional last-child (footer) check.
const POSITIONAL_FOOT_MAX_CHARS: usize = 150;

/// Which nodes the link-density and textual-term signals scan.
const CONTAINER_TAGS: &str = "div, section, ul, ol";

/// Why a node was flagged. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    LinkDensity,
    TextualTerm,
    Positional,
    StructuralWidth,
}

/// Detect and remove navigation, footer and sidebar regions by content.
///
/// Returns the number of nodes removed. A node removed by one signal is
/// never re-evaluated by a later signal, and nodes protected by the
/// rich-content threshold are left in place.
pub fn detect_nav_by_content(doc: &Document, opts: &Options, cache: &mut MetricsCache) -> usize {
    let mut removed: HashSet<NodeId> = HashSet::new();

    // Signals 1 and 2 scan the container elements.
    let containers = doc.select(CONTAINER_TAGS).nodes().to_vec();
    for node in containers {
        if gone(&removed, &node) {
            continue;
        }
        let sel = Selection::from(node);

        let flagged = if link_density_signal(&sel, opts, cache) {
            Some(Signal::LinkDensity)
        } else if textual_term_signal(&sel, cache, opts) {
            Some(Signal::TextualTerm)
        } else {
            None
        };

        if let Some(signal) = flagged {
            try_remove(&sel, signal, opts, cache, &mut removed);
        }
    }

    // Signal 3 examines only the first and last top-level body children;
    // headers and footers are structurally first/last.
    if let Some(body_node) = doc.select("body").nodes().first() {
        let children = dom::child_elements(body_node);
        if let Some(first) = children.first() {
            if !gone(&removed, first) {
                let sel = Selection::from(*first);
                if positional_head_signal(&sel, cache, opts) {
                    try_remove(&sel, Signal::Positional, opts, cache, &mut removed);
                }
            }
        }
        if let Some(last) = children.last() {
            if !gone(&removed, last) {
                let sel = Selection::from(*last);
                if positional_foot_signal(&sel, cache, opts) {
                    try_remove(&sel, Signal::Positional, opts, cache, &mut removed);
                }
            }
        }
    }

    // Signal 4: declared narrow widths mark probable sidebars.
    let sized = doc.select("[width]").nodes().to_vec();
    for node in sized {
        if gone(&removed, &node) {
            continue;
        }
        let sel = Selection::from(node);
        if structural_width_signal(&sel, opts) {
            try_remove(&sel, Signal::StructuralWidth, opts, cache, &mut removed);
        }
    }

    removed.len()
}

/// Signal 1: many anchors, most of them short.
///
/// Both conditions must hold; the minimum count alone never flags a node,
/// which keeps legitimate link-rich prose alive.
pub fn link_density_signal(sel: &Selection, opts: &Options, cache: &mut MetricsCache) -> bool {
    let metrics = cache.metrics(sel, opts);
    if metrics.link_count < opts.min_link_count {
        return false;
    }
    let short_fraction = metrics.short_link_count as f64 / metrics.link_count as f64;
    short_fraction >= opts.short_link_fraction
}

/// Signal 2: the node's own text names navigation and the node links out.
///
/// Text alone is not sufficient; prose that merely mentions "menu" carries
/// no links of its own container.
pub fn textual_term_signal(sel: &Selection, cache: &mut MetricsCache, opts: &Options) -> bool {
    let own = dom::own_text(sel).to_lowercase();
    if !NAV_TERMS.iter().any(|term| own.contains(term)) {
        return false;
    }
    cache.metrics(sel, opts).link_count >= 1
}

/// Signal 3, first body child: a link bundle with no article structure.
fn positional_head_signal(sel: &Selection, cache: &mut MetricsCache, opts: &Options) -> bool {
    if !matches!(dom::tag_name(sel).as_deref(), Some("div" | "nav")) {
        return false;
    }
    if sel.select("h1, h2, article, p").exists() {
        return false;
    }
    let metrics = cache.metrics(sel, opts);
    metrics.link_count >= 1 && metrics.text_len < POSITIONAL_HEAD_MAX_CHARS
}

/// Signal 3, last body child: copyright text or a small link bundle.
fn positional_foot_signal(sel: &Selection, cache: &mut MetricsCache, opts: &Options) -> bool {
    if !matches!(dom::tag_name(sel).as_deref(), Some("div" | "footer")) {
        return false;
    }
    if sel.select("h1, h2, article").exists() {
        return false;
    }
    if dom::text_content(sel).to_lowercase().contains("copyright") {
        return true;
    }
    let metrics = cache.metrics(sel, opts);
    metrics.link_count >= 1 && metrics.text_len < POSITIONAL_FOOT_MAX_CHARS
}

/// Signal 4: a declared percentage width marks a probable sidebar.
fn structural_width_signal(sel: &Selection, opts: &Options) -> bool {
    let Some(width) = dom::get_attribute(sel, "width") else {
        return false;
    };
    // Only percentage widths are a recognizable fraction of the page.
    let Some(percent) = percent_width(&format!("width:{width}")) else {
        return false;
    };
    f64::from(percent) / 100.0 < opts.sidebar_width_fraction
}

/// Remove a flagged node unless the rich-content invariant protects it.
fn try_remove(
    sel: &Selection,
    signal: Signal,
    opts: &Options,
    cache: &mut MetricsCache,
    removed: &mut HashSet<NodeId>,
) {
    let text_len = cache.text_len(sel, opts);
    if text_len > opts.rich_content_threshold {
        log::debug!("kept rich node ({text_len} chars) despite {signal:?}");
        return;
    }
    if let Some(node) = sel.nodes().first() {
        removed.insert(node.id);
    }
    log::debug!("removing node flagged by {signal:?} ({text_len} chars)");
    dom::remove(sel);
}

/// Whether the node or one of its ancestors was already removed this pass.
fn gone(removed: &HashSet<NodeId>, node: &dom::NodeRef) -> bool {
    removed.iter().any(|id| dom::is_within(node, *id))
}
