//! Markdown post-cleaning.
//!
//! A battery of regex passes that scrubs script/style leakage, residual HTML
//! tags and junk lines out of converted Markdown. The battery runs to a
//! fixpoint, so cleaning already-clean text changes nothing.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("SCRIPT_BLOCK regex"));

#[allow(clippy::expect_used)]
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("STYLE_BLOCK regex"));

#[allow(clippy::expect_used)]
static CDATA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>").expect("CDATA_BLOCK regex"));

#[allow(clippy::expect_used)]
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));

#[allow(clippy::expect_used)]
static BR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("BR_TAG regex"));

// Backslash-escaped angle brackets are intentional Markdown output, so a tag
// only counts when not preceded by a backslash. The escape check lives in
// [`strip_residual_tags`] rather than the pattern, so runs of adjacent tags
// come out in a single pass.
#[allow(clippy::expect_used)]
static RESIDUAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("RESIDUAL_TAG regex"));

#[allow(clippy::expect_used)]
static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[a-zA-Z]{2,8};|&#\d{1,7};").expect("HTML_ENTITY regex"));

#[allow(clippy::expect_used)]
static CSS_PROPERTY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[a-z-]+\s*:\s*[^;:{}]+;\s*$").expect("CSS_PROPERTY_LINE regex")
});

#[allow(clippy::expect_used)]
static JS_STATEMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:(?:var|let|const)\s+\w+\s*=.*|function\s*\w*\s*\(.*)$")
        .expect("JS_STATEMENT_LINE regex")
});

#[allow(clippy::expect_used)]
static BRACE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[{}();]+\s*$").expect("BRACE_LINE regex"));

#[allow(clippy::expect_used)]
static JUNK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[;:.,_*+#-]+[ \t]*$").expect("JUNK_LINE regex"));

#[allow(clippy::expect_used)]
static MID_LINE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S)[ \t]{2,}").expect("MID_LINE_SPACES regex"));

#[allow(clippy::expect_used)]
static TRAILING_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("TRAILING_SPACES regex"));

#[allow(clippy::expect_used)]
static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("EXCESS_BLANK_LINES regex"));

/// Clean converted Markdown until the battery reaches a fixpoint.
///
/// Every pass in the battery either leaves its input alone or shortens it,
/// so the loop terminates.
#[must_use]
pub fn clean(markdown: &str) -> String {
    let mut current = markdown.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Count residual (unescaped) HTML tags in a Markdown string.
#[must_use]
pub fn residual_tag_count(markdown: &str) -> usize {
    RESIDUAL_TAG
        .find_iter(markdown)
        .filter(|m| !markdown[..m.start()].ends_with('\\'))
        .count()
}

/// Remove every unescaped tag, keeping backslash-escaped angle brackets.
fn strip_residual_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for found in RESIDUAL_TAG.find_iter(text) {
        if text[..found.start()].ends_with('\\') {
            continue;
        }
        out.push_str(&text[copied..found.start()]);
        copied = found.end();
    }
    out.push_str(&text[copied..]);
    out
}

fn clean_once(markdown: &str) -> String {
    let mut text = SCRIPT_BLOCK.replace_all(markdown, "").into_owned();
    text = STYLE_BLOCK.replace_all(&text, "").into_owned();
    text = CDATA_BLOCK.replace_all(&text, "").into_owned();
    text = HTML_COMMENT.replace_all(&text, "").into_owned();
    text = BR_TAG.replace_all(&text, "\n").into_owned();
    text = strip_residual_tags(&text);
    // Entities become spaces rather than decoded characters, so a literal
    // `&lt;` can never round back into markup.
    text = HTML_ENTITY.replace_all(&text, " ").into_owned();

    text = filter_lines(&text);

    text = MID_LINE_SPACES.replace_all(&text, "$1 ").into_owned();
    text = TRAILING_SPACES.replace_all(&text, "").into_owned();
    text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n").into_owned();
    text.trim().to_string()
}

/// Drop code-debris lines outside fenced blocks, and whole fenced blocks
/// that contain nothing but debris.
fn filter_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut fence: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            if in_fence {
                fence.push(line);
                if fenced_block_is_debris(&fence) {
                    fence.clear();
                } else {
                    out.append(&mut fence);
                }
                in_fence = false;
            } else {
                in_fence = true;
                fence.push(line);
            }
            continue;
        }

        if in_fence {
            fence.push(line);
            continue;
        }

        if is_debris_line(line) {
            continue;
        }
        out.push(line);
    }

    // Unterminated fence: keep the lines, dropping content would lose text.
    out.append(&mut fence);
    out.join("\n")
}

fn is_debris_line(line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    CSS_PROPERTY_LINE.is_match(line)
        || JS_STATEMENT_LINE.is_match(line)
        || BRACE_LINE.is_match(line)
        || JUNK_LINE.is_match(line)
}

/// A fence is debris when tagged `javascript`/`css` and mostly code-like, or
/// untagged and nothing but code-like lines. A named language other than
/// those is someone's intentional code sample and always survives.
fn fenced_block_is_debris(block: &[&str]) -> bool {
    let lang = block
        .first()
        .map(|l| l.trim().trim_start_matches('`').trim().to_lowercase())
        .unwrap_or_default();

    let body: Vec<&&str> = block
        .iter()
        .filter(|l| !l.trim_start().starts_with("```") && !l.trim().is_empty())
        .collect();
    if body.is_empty() {
        return true;
    }
    let debris = body.iter().filter(|l| is_debris_line(l)).count();

    match lang.as_str() {
        "javascript" | "js" | "css" => debris * 2 >= body.len(),
        "" => debris == body.len(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_residual_tags_but_keeps_text() {
        let cleaned = clean("before <div class=\"x\">middle</div> after");
        assert_eq!(cleaned, "before middle after");
    }

    #[test]
    fn escaped_angle_brackets_survive() {
        let input = r"the type \<T\> is generic";
        assert_eq!(clean(input), input);
        assert_eq!(residual_tag_count(input), 0);
    }

    #[test]
    fn adjacent_tags_are_all_removed() {
        let cleaned = clean("<span><b>x</b></span>");
        assert_eq!(cleaned, "x");
    }

    #[test]
    fn long_runs_of_adjacent_tags_clean_fully() {
        let input = "<i>".repeat(600);
        let cleaned = clean(&input);
        assert_eq!(cleaned, "");
        assert_eq!(clean(&cleaned), cleaned);
        assert_eq!(residual_tag_count("<p><p><p>"), 3);
    }

    #[test]
    fn script_and_style_blocks_vanish_with_contents() {
        let input = "keep\n<script>var x = 1;</script>\n<style>p { color: red; }</style>\nalso keep";
        let cleaned = clean(input);
        assert!(cleaned.contains("keep"));
        assert!(cleaned.contains("also keep"));
        assert!(!cleaned.contains("var x"));
        assert!(!cleaned.contains("color"));
    }

    #[test]
    fn entities_become_spaces_not_markup() {
        let cleaned = clean("a &lt;div&gt; b &amp; c &#8212; d");
        assert!(!cleaned.contains('<'));
        assert!(!cleaned.contains('&'));
        assert_eq!(cleaned, "a div b c d");
    }

    #[test]
    fn css_debris_lines_are_dropped() {
        let input = "Real paragraph text here.\nfont-size: 14px;\nmargin: 0 auto;\nMore prose.";
        let cleaned = clean(input);
        assert!(cleaned.contains("Real paragraph"));
        assert!(cleaned.contains("More prose"));
        assert!(!cleaned.contains("font-size"));
    }

    #[test]
    fn js_debris_lines_are_dropped() {
        let input = "Intro.\nvar tracker = init();\nfunction gtag() {\n}\nOutro.";
        let cleaned = clean(input);
        assert!(!cleaned.contains("tracker"));
        assert!(!cleaned.contains("gtag"));
        assert!(cleaned.contains("Intro."));
        assert!(cleaned.contains("Outro."));
    }

    #[test]
    fn legitimate_code_fences_survive() {
        let input = "Usage:\n\n```rust\nlet x = compute();\nprintln!(\"{x}\");\n```\n\nDone.";
        let cleaned = clean(input);
        assert!(cleaned.contains("```rust"));
        assert!(cleaned.contains("let x = compute();"));
    }

    #[test]
    fn javascript_tagged_fences_with_code_debris_are_dropped() {
        let input = "Text.\n\n```javascript\nvar q = sel();\nq.init();\n```\n\nMore.";
        let cleaned = clean(input);
        assert!(!cleaned.contains("var q"));
        assert!(cleaned.contains("More."));
    }

    #[test]
    fn debris_only_fences_are_dropped_whole() {
        let input = "Text.\n\n```\nvar a = 1;\nconst b = 2;\n```\n\nMore text.";
        let cleaned = clean(input);
        assert!(!cleaned.contains("var a"));
        assert!(!cleaned.contains("```"));
        assert!(cleaned.contains("More text."));
    }

    #[test]
    fn junk_only_lines_are_dropped() {
        let input = "Heading text\n....\n;;;\nBody text";
        let cleaned = clean(input);
        assert!(!cleaned.contains("...."));
        assert!(!cleaned.contains(";;;"));
        assert!(cleaned.contains("Body text"));
    }

    #[test]
    fn table_separator_rows_survive_junk_filter() {
        let input = "| Name | Age |\n| ---- | --- |\n| Ada  | 36  |";
        let cleaned = clean(input);
        assert!(cleaned.contains("| ---- | --- |"));
    }

    #[test]
    fn whitespace_is_normalized() {
        let input = "a    b   \n\n\n\n\nc";
        assert_eq!(clean(input), "a b\n\nc");
    }

    #[test]
    fn clean_is_idempotent() {
        let inputs = [
            "# Title\n\nParagraph with \\<escaped\\> text.\n\n* item one\n* item two",
            "before <div>mid</div> after &amp; more",
            "| a | b |\n| - | - |\n| 1 | 2 |",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(clean(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn counts_unescaped_tags_only() {
        assert_eq!(residual_tag_count("plain text"), 0);
        assert_eq!(residual_tag_count("<p>x</p>"), 2);
        assert_eq!(residual_tag_count(r"\<p\> only escaped"), 0);
    }
}
