//! Error types for CLI operations

use crate::api::ApiError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur during CLI command execution
#[derive(Error, Debug)]
pub enum CliError {
    /// Error executing a command or operation
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// Management API request failed
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),

    /// Command tree could not be compiled or parsed
    #[error("{0}")]
    Declarative(#[from] super::declarative::DeclarativeError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(String),

    /// Invalid argument or input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// Conversions from common error types
impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::SerdeError(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::ExecutionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_converts() {
        let err: CliError = ApiError::NotFound("deployment 'test'".to_string()).into();
        assert!(matches!(err, CliError::ApiError(ApiError::NotFound(_))));
        assert_eq!(err.to_string(), "API error: Not found: deployment 'test'");
    }

    #[test]
    fn test_serde_error_converts() {
        let err: CliError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CliError::SerdeError(_)));
    }
}
