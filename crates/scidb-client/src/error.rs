//! Error types for backend transports.

use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum TransportError {
    // === Connection errors ===
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: &'static str },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    // === Query errors ===
    #[error("Invalid array name: '{0}'")]
    InvalidArrayName(String),

    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse {
        endpoint: &'static str,
        message: String,
    },

    #[error("Result is missing column '{0}'")]
    MissingColumn(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TransportError {
    pub(crate) fn from_reqwest(endpoint: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout { endpoint }
        } else {
            TransportError::Http {
                endpoint,
                source: err,
            }
        }
    }

    /// Whether the backend rejected the credentials or token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, TransportError::Status { status: 401 | 403, .. })
    }
}
