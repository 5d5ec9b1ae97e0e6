//! Configuration options for the conversion pipeline.
//!
//! All thresholds are named numeric knobs with documented defaults. They were
//! tuned empirically; treat the defaults as a starting point, not as truth.
//! The struct derives serde traits so an external config loader can populate
//! it from JSON or any other format.

use serde::{Deserialize, Serialize};

/// Configuration options for HTML-to-Markdown conversion.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use pagemill::Options;
///
/// let options = Options {
///     rich_content_threshold: 1500,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Nodes whose own text exceeds this length (characters) are never
    /// removed by a heuristic signal, and only by selector rules explicitly
    /// marked as allowed to remove rich content (ads, cookie notices,
    /// modals).
    ///
    /// Default: `1000`
    pub rich_content_threshold: usize,

    /// Minimum number of anchor descendants before the link-density signal
    /// can flag a node. Below this count the signal never fires, regardless
    /// of the short-link fraction.
    ///
    /// Default: `8`
    pub min_link_count: usize,

    /// Fraction of anchors that must be "short" for the link-density signal
    /// to fire. Menus are characterized by many short links, not by absolute
    /// count alone.
    ///
    /// Default: `0.85`
    pub short_link_fraction: f64,

    /// An anchor counts as "short" when its visible text is below this
    /// length (characters).
    ///
    /// Default: `50`
    pub short_link_length: usize,

    /// When the primary extraction candidate's text is below this length
    /// (characters), a supplemental extraction pass scans the cleaned tree
    /// with a broader set of likely-content selectors.
    ///
    /// Default: `500`
    pub supplemental_min_chars: usize,

    /// Minimum paragraph text length (characters) for a block to qualify
    /// during the supplemental extraction pass.
    ///
    /// Default: `50`
    pub per_paragraph_min: usize,

    /// A node with a declared percentage width below this fraction of the
    /// page width is flagged as a probable sidebar.
    ///
    /// Default: `0.25`
    pub sidebar_width_fraction: f64,

    /// Content-driven boilerplate detection is skipped at the pre-extraction
    /// checkpoint when the selector pass already discarded more than this
    /// fraction of the original text, to avoid compounding over-aggressive
    /// removal.
    ///
    /// Default: `0.30`
    pub first_pass_loss_ratio: f64,

    /// Content-driven detection is skipped at the post-extraction checkpoint
    /// when the candidate text is below this length (characters).
    ///
    /// Default: `1000`
    pub advanced_detection_min_chars: usize,

    /// The primary conversion strategy is accepted outright when its result
    /// contains at most this many residual tag-like substrings; otherwise
    /// the remaining cascade strategies run and all results are compared.
    ///
    /// Default: `0`
    pub residual_tag_acceptance: usize,

    /// Final Markdown shorter than this (characters) is reported as low
    /// confidence, signalling the caller to persist the raw-HTML recovery
    /// artifact.
    ///
    /// Default: `500`
    pub low_confidence_min_chars: usize,

    /// Emit the page title as a leading level-1 heading when one was found
    /// and the output does not already start with a heading.
    ///
    /// Default: `true`
    pub include_title: bool,

    /// Base URL used to rewrite relative links and image sources to absolute
    /// ones before conversion.
    ///
    /// Default: `None`
    pub base_url: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rich_content_threshold: 1000,
            min_link_count: 8,
            short_link_fraction: 0.85,
            short_link_length: 50,
            supplemental_min_chars: 500,
            per_paragraph_min: 50,
            sidebar_width_fraction: 0.25,
            first_pass_loss_ratio: 0.30,
            advanced_detection_min_chars: 1000,
            residual_tag_acceptance: 0,
            low_confidence_min_chars: 500,
            include_title: true,
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let opts = Options::default();

        assert_eq!(opts.rich_content_threshold, 1000);
        assert_eq!(opts.min_link_count, 8);
        assert!((opts.short_link_fraction - 0.85).abs() < f64::EPSILON);
        assert_eq!(opts.short_link_length, 50);
        assert_eq!(opts.supplemental_min_chars, 500);
        assert_eq!(opts.per_paragraph_min, 50);
        assert!((opts.sidebar_width_fraction - 0.25).abs() < f64::EPSILON);
        assert!((opts.first_pass_loss_ratio - 0.30).abs() < f64::EPSILON);
        assert_eq!(opts.advanced_detection_min_chars, 1000);
        assert_eq!(opts.residual_tag_acceptance, 0);
        assert_eq!(opts.low_confidence_min_chars, 500);
        assert!(opts.include_title);
        assert!(opts.base_url.is_none());
    }

    #[test]
    fn partial_json_config_fills_in_defaults() {
        let opts: Options =
            serde_json::from_str(r#"{"min_link_count": 5, "include_title": false}"#)
                .unwrap_or_default();

        assert_eq!(opts.min_link_count, 5);
        assert!(!opts.include_title);
        // Untouched knobs keep their defaults
        assert_eq!(opts.rich_content_threshold, 1000);
        assert_eq!(opts.supplemental_min_chars, 500);
    }

    #[test]
    fn options_round_trip_through_json() {
        let opts = Options {
            base_url: Some("https://example.com/a/b".to_string()),
            sidebar_width_fraction: 0.4,
            ..Options::default()
        };

        let json = serde_json::to_string(&opts).unwrap_or_default();
        let back: Options = serde_json::from_str(&json).unwrap_or_default();

        assert_eq!(back.base_url.as_deref(), Some("https://example.com/a/b"));
        assert!((back.sidebar_width_fraction - 0.4).abs() < f64::EPSILON);
    }
}
