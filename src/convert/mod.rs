//! Markdown conversion cascade.
//!
//! Three strategies with disjoint failure modes, compared on measurable
//! output quality. The primary structural walk is accepted outright when it
//! leaves no residual markup; otherwise every strategy runs and the best
//! result wins: fewest residual tags first, most non-empty lines second,
//! earliest strategy on a full tie.

pub mod plaintext;
pub mod primary;
pub mod structured;

use crate::dom::Document;
use crate::options::Options;
use crate::postclean;
use crate::result::Strategy;

/// One strategy's output together with its quality measurements.
#[derive(Debug, Clone, Default)]
pub struct ConversionResult {
    pub strategy: Strategy,
    pub markdown: String,
    pub residual_tags: usize,
    pub non_empty_lines: usize,
}

/// Measure a strategy's raw output.
#[must_use]
pub fn assess(strategy: Strategy, markdown: String) -> ConversionResult {
    let residual_tags = postclean::residual_tag_count(&markdown);
    let non_empty_lines = markdown.lines().filter(|l| !l.trim().is_empty()).count();
    ConversionResult { strategy, markdown, residual_tags, non_empty_lines }
}

/// Run the cascade over an extracted content document.
#[must_use]
pub fn cascade(doc: &Document, opts: &Options) -> ConversionResult {
    let first = assess(Strategy::Primary, primary::render(doc));
    if first.residual_tags <= opts.residual_tag_acceptance && first.non_empty_lines > 0 {
        log::debug!(
            "primary conversion accepted outright ({} lines)",
            first.non_empty_lines
        );
        return first;
    }
    log::debug!(
        "primary conversion left {} residual tags, running full cascade",
        first.residual_tags
    );

    let second = assess(Strategy::Structured, structured::render(doc));
    let third = assess(Strategy::PlainText, plaintext::render(doc));
    select_best(vec![first, second, third])
}

/// Pick the best result: fewest residual tags, then most non-empty lines.
/// `min_by` keeps the earliest element on ties, which encodes the strategy
/// preference order.
#[must_use]
pub fn select_best(results: Vec<ConversionResult>) -> ConversionResult {
    results
        .into_iter()
        .min_by(|a, b| {
            a.residual_tags
                .cmp(&b.residual_tags)
                .then(b.non_empty_lines.cmp(&a.non_empty_lines))
        })
        .unwrap_or_default()
}
