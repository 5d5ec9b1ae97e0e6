//! Markdown output utilities.
//!
//! Escaping for text content and GFM table rendering, shared by the cascade
//! strategies.

use crate::dom::{self, Document};

/// Characters with Markdown meaning that need escaping in plain text.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '<', '>'];

/// Escape Markdown special characters in text content.
///
/// Code spans and blocks preserve literal content, so escaping is skipped
/// when `in_code` is set.
///
/// # Examples
///
/// ```
/// use pagemill::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*", false), r"\*not italic\*");
/// assert_eq!(escape_markdown("a < b", false), r"a \< b");
/// assert_eq!(escape_markdown("*text*", true), "*text*");
/// ```
#[must_use]
pub fn escape_markdown(text: &str, in_code: bool) -> String {
    if in_code || text.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Convert an HTML table fragment to a GFM pipe table.
///
/// The first row (from `thead` when present, otherwise the first `tr`)
/// becomes the header; a separator row follows it. Returns an empty string
/// for tables with no cells.
#[must_use]
pub fn html_table_to_markdown(table_html: &str) -> String {
    let doc = Document::from(table_html);
    let mut rows: Vec<Vec<String>> = Vec::new();

    for tr in doc.select("tr").iter() {
        let mut row = Vec::new();
        for cell in tr.select("th, td").iter() {
            row.push(cell.text().trim().replace('\n', " ").replace('|', "\\|"));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return String::new();
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![3usize; col_count];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (row_idx, row) in rows.iter().enumerate() {
        out.push('|');
        for (col, width) in widths.iter().enumerate() {
            let cell = row.get(col).map_or("", String::as_str);
            out.push(' ');
            out.push_str(cell);
            for _ in cell.chars().count()..*width {
                out.push(' ');
            }
            out.push_str(" |");
        }
        out.push('\n');

        if row_idx == 0 {
            out.push('|');
            for width in &widths {
                out.push(' ');
                for _ in 0..*width {
                    out.push('-');
                }
                out.push_str(" |");
            }
            out.push('\n');
        }
    }
    out
}

/// Extract the trimmed `<title>` text of a document, if non-empty.
#[must_use]
pub fn page_title(doc: &Document) -> Option<String> {
    let title = doc.select("head title");
    if !title.exists() {
        return None;
    }
    let text = dom::text_content(&title).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
