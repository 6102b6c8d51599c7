//! Types for search endpoint requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to a search endpoint.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base URL of the web app (e.g., "https://reliva.example.com")
    pub url: String,
    /// Platform path segment, as in `/api/{platform}/search`
    pub platform: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl ResolverConfig {
    /// Create a config for the YouTube search endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            platform: "youtube".to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Use a different platform endpoint.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Body returned by `GET /api/{platform}/search`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SearchHit>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Best match for a search query.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub video_id: String,
    #[serde(default)]
    pub title: Option<String>,
}
