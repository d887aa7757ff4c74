//! Error types for the dashboard client.
//!
//! `ClientError` is `Clone` so one failed fetch can be handed to every caller
//! that was waiting on it.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response without a readable envelope.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered with `success: false`.
    #[error("{error}{}", .details.as_ref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Api {
        error: String,
        details: Option<String>,
    },

    /// The body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal input or output failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if e.is_builder() {
            ClientError::Config(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_with_details() {
        let err = ClientError::Api {
            error: "Failed to fetch jobs".to_string(),
            details: Some("connection refused".to_string()),
        };
        assert_eq!(err.to_string(), "Failed to fetch jobs (connection refused)");
    }

    #[test]
    fn test_api_error_without_details() {
        let err = ClientError::Api {
            error: "Failed to fetch stats".to_string(),
            details: None,
        };
        assert_eq!(err.to_string(), "Failed to fetch stats");
    }
}
