//! Result types for conversion output.
//!
//! The pipeline reports enough diagnostic metadata for the caller to decide
//! whether to also persist the intermediate raw HTML as a recovery artifact.

use serde::{Deserialize, Serialize};

/// Which cascade strategy produced the final Markdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Direct structural HTML-to-Markdown conversion.
    Primary,
    /// Manual per-element-type extraction.
    Structured,
    /// Visible text with paragraph breaks, no structural formatting.
    #[default]
    PlainText,
}

/// Quality metadata about the final Markdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    /// Residual tag-like substrings left after post-cleaning.
    pub residual_tags: usize,

    /// Non-empty lines in the final output.
    pub non_empty_lines: usize,

    /// Total character count of the final output.
    pub chars: usize,

    /// Set when the output exceeds the residual-markup acceptance threshold
    /// or falls below the minimum length. The caller should keep the raw
    /// HTML as a recovery artifact.
    pub low_confidence: bool,
}

/// Result of converting one HTML document to Markdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertResult {
    /// The cleaned Markdown rendering.
    pub markdown: String,

    /// Page title, when one was found.
    pub title: Option<String>,

    /// Cascade strategy that won the quality comparison.
    pub strategy: Strategy,

    /// Quality metadata for the caller's persistence decision.
    pub quality: QualityReport,

    /// Non-fatal issues encountered during the run.
    pub warnings: Vec<String>,
}
