//! Error types for the ticketdesk console

use thiserror::Error;

/// Main error type shared by the core, client and UI crates
#[derive(Error, Debug)]
pub enum Error {
    /// The API answered with a non-2xx status
    ///
    /// 400 and 500 are deliberately not told apart: every non-2xx response is
    /// a failure of the request that produced it.
    #[error("API Error {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response
    #[error("Transport error: {message}")]
    Transport {
        /// Error message
        message: String,
    },

    /// A 2xx response whose body was not the expected JSON shape
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Error message
        message: String,
    },

    /// Client-side validation failure; no request was issued
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error was detected locally, before any network call
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status of a rejected request, if the server answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, failures)) = fields.into_iter().next() else {
            return Self::validation("payload", "invalid payload");
        };

        let message = failures
            .iter()
            .find_map(|failure| failure.message.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "is invalid".to_string());

        Self::validation(field.to_string(), message)
    }
}
