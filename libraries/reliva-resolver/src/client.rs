//! Search endpoint client.

use crate::error::{Result, ResolverClientError};
use crate::types::{ResolverConfig, SearchResponse};
use async_trait::async_trait;
use reliva_playback::{ResolveError, Resolver, SearchQuery};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Client for the web app's `/api/{platform}/search` proxy routes.
///
/// Implements [`Resolver`], so it can be handed straight to a
/// [`reliva_playback::Coordinator`].
///
/// # Example
///
/// ```ignore
/// use reliva_resolver::{ResolverConfig, SearchResolverClient};
///
/// let client = SearchResolverClient::new(ResolverConfig::new("https://reliva.example.com"))?;
/// let video_id = client.search("Blinding Lights The Weeknd official audio").await?;
/// println!("Resolved to {}", video_id);
/// ```
#[derive(Debug, Clone)]
pub struct SearchResolverClient {
    http: Client,
    endpoint: Url,
}

impl SearchResolverClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ResolverClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ResolverClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let platform = config.platform.trim();
        if platform.is_empty()
            || !platform
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ResolverClientError::InvalidPlatform(config.platform.clone()));
        }

        let endpoint = Url::parse(&format!("{}/api/{}/search", url, platform))
            .map_err(|e| ResolverClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Reliva/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ResolverClientError::Request)?;

        Ok(Self { http, endpoint })
    }

    /// Full search endpoint URL, without query string.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Search for `query` and return the best match's player id.
    pub async fn search(&self, query: &str) -> Result<String> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);

        debug!(url = %url, "Searching for playback id");

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                ResolverClientError::ServerUnreachable(e.to_string())
            } else {
                ResolverClientError::Request(e)
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ResolverClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            ResolverClientError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        match body.data {
            Some(hit) if body.success && !hit.video_id.trim().is_empty() => {
                debug!(
                    query = %query,
                    video_id = %hit.video_id,
                    title = hit.title.as_deref().unwrap_or("-"),
                    "Search hit"
                );
                Ok(hit.video_id)
            }
            _ => Err(ResolverClientError::NoResult { reason: body.error }),
        }
    }
}

#[async_trait]
impl Resolver for SearchResolverClient {
    async fn resolve(&self, query: &SearchQuery) -> std::result::Result<String, ResolveError> {
        self.search(query.as_str()).await.map_err(ResolveError::from)
    }
}
