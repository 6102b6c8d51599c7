//! Error types for the resolver client.

use reliva_playback::ResolveError;
use thiserror::Error;

/// Errors that can occur when querying a search endpoint.
#[derive(Error, Debug)]
pub enum ResolverClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Endpoint is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Platform segment is empty or not URL safe
    #[error("Invalid platform: {0:?}")]
    InvalidPlatform(String),

    /// Failed to parse endpoint response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Endpoint answered but reported nothing playable
    #[error("No result found{}", .reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default())]
    NoResult { reason: Option<String> },
}

/// Result type for resolver client operations.
pub type Result<T> = std::result::Result<T, ResolverClientError>;

impl From<ResolverClientError> for ResolveError {
    fn from(error: ResolverClientError) -> Self {
        match error {
            ResolverClientError::Request(e) if e.is_timeout() => {
                ResolveError::Transport(format!("request timed out: {}", e))
            }
            ResolverClientError::Request(e) => ResolveError::Transport(e.to_string()),
            ResolverClientError::ServerUnreachable(message) => ResolveError::Transport(message),
            ResolverClientError::ServerError { status, message } => {
                ResolveError::Status { status, message }
            }
            ResolverClientError::ParseError(message) => ResolveError::Parse(message),
            ResolverClientError::NoResult { .. } => ResolveError::NoResult,
            e @ (ResolverClientError::InvalidUrl(_) | ResolverClientError::InvalidPlatform(_)) => {
                ResolveError::Transport(e.to_string())
            }
        }
    }
}
