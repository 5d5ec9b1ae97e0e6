//! Extract the primary content of web pages and render it as clean Markdown.
//!
//! The pipeline takes raw HTML (string or bytes), strips scripts, styles and
//! page chrome, locates the main content region, and converts it through a
//! cascade of three strategies whose results are compared on measurable
//! quality. The output is post-cleaned Markdown plus a quality report the
//! caller can use to decide whether to keep the raw HTML as a recovery
//! artifact.
//!
//! # Example
//!
//! ```
//! use pagemill::{convert, Options};
//!
//! let html = r#"<html><head><title>Hello</title></head>
//!     <body><nav><a href="/">Home</a></nav>
//!     <article><p>The actual story text.</p></article>
//!     <footer>Copyright 2024</footer></body></html>"#;
//!
//! let result = convert(html, &Options::default())?;
//! assert!(result.markdown.contains("The actual story text."));
//! assert!(!result.markdown.contains("Copyright"));
//! # Ok::<(), pagemill::Error>(())
//! ```

pub mod artifact;
pub mod boilerplate;
pub mod convert;
pub mod dom;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod markdown;
pub mod metrics;
pub mod options;
pub mod pipeline;
pub mod postclean;
pub mod result;
pub mod sanitize;
pub mod url_utils;

pub use error::{Error, Result};
pub use options::Options;
pub use pipeline::{convert, convert_bytes};
pub use result::{ConvertResult, QualityReport, Strategy};
