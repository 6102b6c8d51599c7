/// Player application error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid queue: {0}")]
    Queue(String),

    #[error("Resolver error: {0}")]
    Resolver(#[from] reliva_resolver::ResolverClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] reliva_playback::PlaybackError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
