//! Error types for the conversion pipeline.
//!
//! Nothing in the core is fatal to the calling process: every stage has a
//! safe minimal fallback, so errors only surface when even the plain-text
//! fallback produced nothing.

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input yielded no text at all, even through the plain-text fallback.
    #[error("no extractable content found")]
    NoContent,

    /// Character encoding detection or conversion failed.
    #[error("encoding detection failed: {0}")]
    Encoding(String),

    /// Writing an output artifact failed.
    #[error("artifact write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
