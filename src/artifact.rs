//! Output artifact naming and persistence.
//!
//! Derives stable, filesystem-safe names from the page title or URL and
//! writes the Markdown next to an optional raw-HTML recovery copy when the
//! pipeline reports low confidence.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::Result;
use crate::result::ConvertResult;

/// Maximum length of a derived file stem, in characters.
const MAX_STEM_CHARS: usize = 100;

/// Derive a filesystem-safe file stem from a page title or source URL.
///
/// The title wins when present; otherwise the URL's host and path are
/// flattened. Falls back to `page` when neither yields a usable name.
#[must_use]
pub fn derive_stem(url: Option<&str>, title: Option<&str>) -> String {
    if let Some(stem) = title.map(slugify).filter(|s| !s.is_empty()) {
        return stem;
    }
    if let Some(stem) = url.and_then(url_stem).filter(|s| !s.is_empty()) {
        return stem;
    }
    "page".to_string()
}

fn slugify(text: &str) -> String {
    let mut out = String::new();
    let mut last_dash = true;
    for ch in text.chars() {
        if out.chars().count() >= MAX_STEM_CHARS {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

fn url_stem(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let mut name = url.host_str().unwrap_or_default().to_string();
    let path = url.path().trim_matches('/');
    if !path.is_empty() {
        name.push('-');
        name.push_str(path);
    }
    Some(slugify(&name))
}

/// Write the Markdown artifact, plus the raw HTML when the quality report
/// flagged the run as low confidence. Returns the Markdown path.
///
/// # Errors
///
/// Propagates filesystem errors from directory creation or writing.
pub fn persist(
    dir: &Path,
    stem: &str,
    result: &ConvertResult,
    raw_html: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let markdown_path = dir.join(format!("{stem}.md"));
    fs::write(&markdown_path, &result.markdown)?;
    log::info!("wrote {}", markdown_path.display());

    if result.quality.low_confidence {
        let html_path = dir.join(format!("{stem}.html"));
        fs::write(&html_path, raw_html)?;
        log::info!(
            "low confidence output, kept raw HTML at {}",
            html_path.display()
        );
    }

    Ok(markdown_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::QualityReport;

    #[test]
    fn title_wins_over_url() {
        let stem = derive_stem(
            Some("https://example.com/a/b"),
            Some("A Study of Parsers: Part 2!"),
        );
        assert_eq!(stem, "a-study-of-parsers-part-2");
    }

    #[test]
    fn url_fallback_flattens_host_and_path() {
        let stem = derive_stem(Some("https://news.example.com/2024/review.html"), None);
        assert_eq!(stem, "news-example-com-2024-review-html");
    }

    #[test]
    fn no_inputs_yields_the_default_stem() {
        assert_eq!(derive_stem(None, None), "page");
        assert_eq!(derive_stem(Some("::not a url::"), Some("!!!")), "page");
    }

    #[test]
    fn long_titles_are_truncated() {
        let title = "word ".repeat(100);
        assert!(derive_stem(None, Some(&title)).chars().count() <= MAX_STEM_CHARS);
    }

    #[test]
    fn persist_writes_raw_html_only_on_low_confidence() {
        let dir = std::env::temp_dir().join(format!("artifact-test-{}", std::process::id()));

        let mut result = ConvertResult {
            markdown: "# ok".to_string(),
            ..ConvertResult::default()
        };
        result.quality = QualityReport { low_confidence: false, ..QualityReport::default() };
        let Ok(path) = persist(&dir, "confident", &result, "<html>raw</html>") else {
            panic!("persist failed");
        };
        assert!(path.ends_with("confident.md"));
        assert!(!dir.join("confident.html").exists());

        result.quality.low_confidence = true;
        if persist(&dir, "shaky", &result, "<html>raw</html>").is_err() {
            panic!("persist failed");
        }
        assert!(dir.join("shaky.html").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
