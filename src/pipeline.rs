//! The end-to-end HTML-to-Markdown pipeline.
//!
//! Stages run in a fixed order: CDATA strip, parse, sanitize, boilerplate
//! checkpoint, extraction, second checkpoint, URL absolutization, the
//! conversion cascade and post-cleaning. Each stage takes the previous
//! stage's output and never reaches back, so a misbehaving page degrades
//! stage by stage instead of failing outright.

use url::Url;

use crate::dom;
use crate::encoding;
use crate::error::{Error, Result};
use crate::extract;
use crate::markdown;
use crate::metrics::MetricsCache;
use crate::options::Options;
use crate::postclean;
use crate::result::{ConvertResult, QualityReport, Strategy};
use crate::sanitize;
use crate::url_utils;
use crate::{boilerplate, convert::plaintext};

/// Convert an HTML string to cleaned Markdown.
///
/// # Errors
///
/// Returns [`Error::NoContent`] only when the input yields no visible text
/// at all; every structural failure before that point degrades to a simpler
/// strategy instead.
pub fn convert(html: &str, opts: &Options) -> Result<ConvertResult> {
    let mut warnings: Vec<String> = Vec::new();

    let stripped = sanitize::strip_cdata(html);
    let doc = dom::parse(&stripped);
    let mut title = markdown::page_title(&doc);

    sanitize::sanitize(&doc);

    let mut cache = MetricsCache::new();
    let original_len = dom::text_len(&doc.select("body"));
    log::debug!("sanitized document carries {original_len} chars of text");

    boilerplate::first_checkpoint(&doc, opts, &mut cache, original_len);

    let extraction = extract::extract(&doc, opts, &mut cache);
    if extraction.supplemented {
        warnings.push("primary candidate was thin, supplemental pass contributed content".into());
    }
    let candidate = extraction.doc;

    // The clone has fresh node identities, so the candidate gets its own
    // metrics table.
    boilerplate::second_checkpoint(&candidate, opts, &mut MetricsCache::new());

    // The article's own headline is usually fuller than the <title> text.
    if let Some(node) = candidate.select("h1").nodes().first() {
        let heading = dom::text_content(&dom::Selection::from(*node));
        let heading = heading.trim();
        if heading.chars().count() > title.as_deref().map_or(0, |t| t.chars().count()) {
            title = Some(heading.to_string());
        }
    }

    if let Some(base) = &opts.base_url {
        match Url::parse(base) {
            Ok(base) => {
                url_utils::absolutize(&candidate, &base);
            }
            Err(err) => warnings.push(format!("base_url `{base}` is not a valid URL: {err}")),
        }
    }

    let chosen = crate::convert::cascade(&candidate, opts);
    let mut strategy = chosen.strategy;
    log::debug!("cascade selected {strategy:?}");

    let mut output = postclean::clean(&chosen.markdown);

    if output.is_empty() {
        // The tree-based strategies all came up empty; recover whatever
        // text the raw markup holds.
        let recovered = postclean::clean(&plaintext::strip_markup(html));
        if recovered.is_empty() {
            return Err(Error::NoContent);
        }
        log::warn!("all tree strategies produced no output, using raw text recovery");
        warnings.push("conversion produced no output, recovered text from raw markup".into());
        strategy = Strategy::PlainText;
        output = recovered;
    }

    if opts.include_title {
        if let Some(title) = &title {
            if !output.starts_with('#') {
                output = format!("# {}\n\n{output}", markdown::escape_markdown(title, false));
            }
        }
    }

    let residual_tags = postclean::residual_tag_count(&output);
    let chars = output.chars().count();
    let quality = QualityReport {
        residual_tags,
        non_empty_lines: output.lines().filter(|l| !l.trim().is_empty()).count(),
        chars,
        low_confidence: residual_tags > opts.residual_tag_acceptance
            || chars < opts.low_confidence_min_chars,
    };
    if quality.low_confidence {
        log::debug!(
            "low confidence output: {residual_tags} residual tags, {chars} chars"
        );
    }

    Ok(ConvertResult { markdown: output, title, strategy, quality, warnings })
}

/// Convert raw HTML bytes, sniffing the character encoding first.
///
/// `charset_hint` comes from the transport layer (an HTTP `Content-Type`
/// header, typically) and takes precedence over in-document declarations.
///
/// # Errors
///
/// Same contract as [`convert`].
pub fn convert_bytes(
    html: &[u8],
    charset_hint: Option<&str>,
    opts: &Options,
) -> Result<ConvertResult> {
    let text = encoding::to_utf8(html, charset_hint);
    convert(&text, opts)
}
