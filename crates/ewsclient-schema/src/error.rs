//! Error types for reading XML documents.

use std::str::Utf8Error;

/// Result type alias for document reading.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a document into an element tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Document bytes are not UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    /// Malformed markup.
    #[error("malformed XML: {0}")]
    Syntax(String),

    /// A prefix was used without a namespace declaration.
    #[error("undeclared namespace prefix '{0}'")]
    UnknownPrefix(String),

    /// The document ended inside an element.
    #[error("element <{0}> is never closed")]
    Unclosed(String),

    /// Character data outside the root element.
    #[error("text content outside the root element")]
    TextOutsideRoot,

    /// A second top-level element.
    #[error("more than one root element (found <{0}>)")]
    MultipleRoots(String),

    /// No element at all.
    #[error("document has no root element")]
    Empty,
}

impl Error {
    pub(crate) fn syntax(err: impl std::fmt::Display) -> Self {
        Self::Syntax(err.to_string())
    }
}
