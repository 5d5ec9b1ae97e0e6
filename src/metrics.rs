//! Per-run derived metrics for DOM nodes.
//!
//! Text length and link counts are computed once per node into an explicit
//! side table keyed by node identity, for the duration of one pipeline run.
//! The document tree itself stays untouched and nothing leaks across runs.

use std::collections::HashMap;

use crate::dom::{self, NodeId, Selection};
use crate::options::Options;

/// Derived metrics for one node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeMetrics {
    /// Trimmed text length of the node and its descendants, in characters.
    pub text_len: usize,

    /// Number of anchor descendants with non-empty visible text.
    pub link_count: usize,

    /// Anchors whose visible text is below the configured short-link length.
    pub short_link_count: usize,

    /// Total visible text covered by anchors, in characters.
    pub link_text_len: usize,
}

impl NodeMetrics {
    /// Ratio of anchor-covered text to total text. Zero for empty nodes.
    #[must_use]
    pub fn link_density(&self) -> f64 {
        if self.text_len == 0 {
            return 0.0;
        }
        self.link_text_len as f64 / self.text_len as f64
    }
}

/// Side table of per-node metrics, private to one pipeline invocation.
#[derive(Debug, Default)]
pub struct MetricsCache {
    table: HashMap<NodeId, NodeMetrics>,
}

impl MetricsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics for the first node of `sel`, computing and caching on first
    /// access. An empty selection yields zeroed metrics.
    pub fn metrics(&mut self, sel: &Selection, opts: &Options) -> NodeMetrics {
        let Some(node) = sel.nodes().first() else {
            return NodeMetrics::default();
        };

        if let Some(cached) = self.table.get(&node.id) {
            return *cached;
        }

        let computed = compute(sel, opts);
        self.table.insert(node.id, computed);
        computed
    }

    /// Shorthand for the cached text length of a node.
    pub fn text_len(&mut self, sel: &Selection, opts: &Options) -> usize {
        self.metrics(sel, opts).text_len
    }
}

fn compute(sel: &Selection, opts: &Options) -> NodeMetrics {
    let mut metrics = NodeMetrics {
        text_len: dom::text_len(sel),
        ..NodeMetrics::default()
    };

    for link in sel.select("a").iter() {
        let text = link.text();
        let len = text.trim().chars().count();
        if len == 0 {
            continue;
        }
        metrics.link_count += 1;
        metrics.link_text_len += len;
        if len < opts.short_link_length {
            metrics.short_link_count += 1;
        }
    }

    metrics
}
