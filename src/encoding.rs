//! Character encoding detection and transcoding.
//!
//! The fetch collaborator hands the pipeline raw bytes; this module sniffs
//! the charset from meta declarations and converts to UTF-8 before parsing.
//! Invalid sequences are replaced with U+FFFD rather than failing.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("META_CHARSET regex")
});

#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("HTTP_EQUIV_CHARSET regex")
});

/// How many leading bytes are scanned for a charset declaration.
const SNIFF_WINDOW: usize = 1024;

/// Detect the character encoding declared by an HTML byte stream.
///
/// Checks `<meta charset>` first, then the `http-equiv` form, then falls
/// back to UTF-8. A hint from the transport layer (e.g. the HTTP
/// `Content-Type` header) takes precedence over document sniffing.
#[must_use]
pub fn detect_encoding(html: &[u8], hint: Option<&str>) -> &'static Encoding {
    if let Some(label) = hint {
        if let Some(encoding) = Encoding::for_label(label.trim().as_bytes()) {
            return encoding;
        }
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_WINDOW)]);

    for pattern in [&META_CHARSET, &HTTP_EQUIV_CHARSET] {
        if let Some(label) = pattern.captures(&head).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Transcode HTML bytes to a UTF-8 string, lossily.
#[must_use]
pub fn to_utf8(html: &[u8], hint: Option<&str>) -> String {
    let encoding = detect_encoding(html, hint);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
