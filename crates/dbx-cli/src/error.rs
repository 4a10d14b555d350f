//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The token endpoint did not hand out an access token.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The API answered with a status other than 200.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// The API answered 200 but the body could not be decoded.
    #[error("could not decode response (status {status}): {reason}\nRaw response: {body}")]
    Decode {
        /// HTTP status code.
        status: u16,
        /// Decoder message.
        reason: String,
        /// Raw response body.
        body: String,
    },

    /// The body is JSON but not shaped like the expected payload.
    #[error("unexpected response shape (status {status}): {reason}\nRaw response: {body}")]
    Shape {
        /// HTTP status code.
        status: u16,
        /// Decoder message.
        reason: String,
        /// Raw response body.
        body: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Checks whether the workflow may carry on past this error.
    ///
    /// Only answers the server actually sent qualify; transport faults,
    /// authentication and configuration problems end the run.
    #[must_use]
    pub const fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Decode { .. } | Self::Shape { .. }
        )
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Decode { status, .. } | Self::Shape { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
