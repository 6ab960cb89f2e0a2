//! Error types for building requests and reading responses.

use std::path::PathBuf;

use ewsclient_schema::Diagnostic;

/// Result type alias for SOAP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SOAP builder and parser errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML serialization failed.
    #[error("XML write error: {0}")]
    Xml(String),

    /// Response document could not be read.
    #[error("XML read error: {0}")]
    Document(#[from] ewsclient_schema::Error),

    /// `CreateAttachment` requested without any attachment.
    #[error("No attachments")]
    NoAttachments,

    /// A value was rejected for a field.
    #[error("Invalid {field}: '{value}'")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Pre-encoded attachment content is not base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Attachment file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The built request does not satisfy the messages schema.
    #[error("Request failed schema validation ({} error(s))", diagnostics.len())]
    InvalidRequest {
        /// Validator output.
        diagnostics: Vec<Diagnostic>,
    },
}

impl Error {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}
