//! Error types for the management API client.

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("Request to {url} failed: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying error.
        message: String,
    },

    /// The resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("API returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or the canonical reason when empty.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {url}: {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying error.
        message: String,
    },

    /// The client could not be constructed.
    #[error("Invalid API client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether the error is a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
