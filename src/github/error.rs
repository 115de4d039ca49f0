//! Error types exposed by the relay and its GitHub transport.

use thiserror::Error;

/// Errors surfaced while reading an analysis event or talking to GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// A required key was absent from the inbound event.
    #[error("event is missing required field `{field}`")]
    MissingField {
        /// Name of the absent key.
        field: &'static str,
    },

    /// A required key was present but its value cannot be used.
    #[error("event field `{field}` is invalid: {message}")]
    InvalidField {
        /// Name of the offending key.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// The OAuth token was blank or absent.
    #[error("OAuth token is required")]
    MissingToken,

    /// A configured URL could not be parsed.
    #[error("API base URL is invalid: {0}")]
    InvalidUrl(String),

    /// GitHub answered with a non-success status.
    #[error("{message}")]
    Remote {
        /// HTTP status code returned by GitHub.
        status: u16,
        /// Operation name plus GitHub's error detail.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A success response carried a body that could not be decoded.
    #[error("unexpected GitHub response: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl RelayError {
    /// HTTP status carried by a [`RelayError::Remote`] error.
    #[must_use]
    pub const fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error invalidates the event itself rather than one
    /// remote operation.
    #[must_use]
    pub const fn is_payload_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::InvalidField { .. })
    }
}
