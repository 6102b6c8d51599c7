//! Error types for playback coordination

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue is empty or the player is hidden
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {index} (queue length {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Why a playback id could not be resolved
///
/// Cloneable so it can travel inside [`crate::Resolution`] and playback events.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ResolveError {
    /// Network failure or unreachable endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status
    #[error("Resolver returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Endpoint answered but found nothing playable
    #[error("No result found")]
    NoResult,

    /// Response body could not be decoded
    #[error("Failed to parse resolver response: {0}")]
    Parse(String),

    /// Resolver did not answer in time
    #[error("Resolver timed out after {0:?}")]
    Timeout(std::time::Duration),
}
