//! Playback id resolution
//!
//! Items enter the queue with display metadata only. When one becomes
//! current without a playback id, the coordinator builds a [`SearchQuery`]
//! from its display fields and asks a [`Resolver`] for the platform id.

use crate::error::ResolveError;
use crate::types::{MediaKind, QueueItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-text search query for a resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Build the query for a queue item
    ///
    /// Songs search for `"{title} {artist} official audio"`, videos for
    /// `"{title} {label} official trailer {year}"`. Missing fields are
    /// skipped and whitespace is collapsed.
    pub fn for_item(item: &QueueItem) -> Self {
        let raw = match item.kind {
            MediaKind::Song => format!("{} {} official audio", item.title, item.secondary),
            MediaKind::Video { release_year } => {
                let year = release_year.map(|y| y.to_string()).unwrap_or_default();
                format!("{} {} official trailer {}", item.title, item.secondary, year)
            }
        };
        Self::new(raw)
    }

    /// Wrap arbitrary text, collapsing whitespace
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a search query to a platform playback id
///
/// Implemented by the HTTP client in `reliva-resolver`; tests substitute
/// scripted resolvers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve a query to a playback id
    ///
    /// # Errors
    /// Returns an error if the lookup fails or finds nothing playable
    async fn resolve(&self, query: &SearchQuery) -> Result<String, ResolveError>;
}

/// Outcome of resolving a single queue item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Resolver found the item
    Resolved { playback_id: String },

    /// Resolver failed; a fixed id was substituted
    Fallback {
        playback_id: String,
        cause: ResolveError,
    },

    /// Resolver failed and no substitute was allowed
    Failed { cause: ResolveError },
}

impl Resolution {
    /// Playback id to store in the queue slot, if any
    pub fn playback_id(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { playback_id } | Resolution::Fallback { playback_id, .. } => {
                Some(playback_id)
            }
            Resolution::Failed { .. } => None,
        }
    }

    /// Whether playback is degraded (fallback or failure)
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Resolution::Resolved { .. })
    }

    /// Underlying failure, if any
    pub fn cause(&self) -> Option<&ResolveError> {
        match self {
            Resolution::Resolved { .. } => None,
            Resolution::Fallback { cause, .. } | Resolution::Failed { cause } => Some(cause),
        }
    }
}
