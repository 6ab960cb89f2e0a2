//! Error types for session operations.

use ewsclient_schema::Diagnostic;
use ewsclient_soap::Stage;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Request building or response parsing error.
    #[error(transparent)]
    Soap(#[from] ewsclient_soap::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Endpoint autodiscovery failed.
    #[error("Autodiscovery failed: {0}")]
    Discovery(String),

    /// A document failed schema validation.
    #[error("Invalid {context}: {} schema error(s)", diagnostics.len())]
    InvalidDocument {
        /// Which document was checked.
        context: &'static str,
        /// Validator output.
        diagnostics: Vec<Diagnostic>,
    },

    /// Response body below the minimum length.
    #[error("Response from {url} is too short ({length} < {minimum} bytes)")]
    ResponseTooShort {
        /// Responding URL.
        url: String,
        /// Body length.
        length: usize,
        /// Configured minimum.
        minimum: usize,
    },

    /// Response body is not text.
    #[error("Response from {url} is not text")]
    NonTextResponse {
        /// Responding URL.
        url: String,
    },

    /// The stage needs an item captured by an earlier draft submission.
    #[error("No item id available for the {0} stage")]
    MissingItemId(Stage),

    /// No endpoint is configured or discovered.
    #[error("Not connected: no EWS endpoint")]
    NotConnected,
}

impl Error {
    /// Validator diagnostics carried by the error, if any.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::InvalidDocument { diagnostics, .. }
            | Self::Soap(ewsclient_soap::Error::InvalidRequest { diagnostics }) => diagnostics,
            _ => &[],
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
