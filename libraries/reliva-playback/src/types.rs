//! Core types for playback coordination

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable entry in the queue
///
/// Display metadata is fixed once the item is built. The playback id is
/// filled in lazily the first time the item becomes current and is then
/// reused for as long as the item stays queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Catalog identifier (song id, movie or series id)
    pub id: String,

    /// Title shown in the player
    pub title: String,

    /// Artist name for songs, media kind label ("movie", "tv") for videos
    pub secondary: String,

    /// What kind of media this is
    pub kind: MediaKind,

    /// Third-party player id, absent until resolved
    #[serde(default)]
    pub resolved_playback_id: Option<String>,
}

impl QueueItem {
    /// Create a song entry
    pub fn song(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            secondary: artist.into(),
            kind: MediaKind::Song,
            resolved_playback_id: None,
        }
    }

    /// Create a video (trailer) entry
    pub fn video(
        id: impl Into<String>,
        title: impl Into<String>,
        label: impl Into<String>,
        release_year: Option<u16>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            secondary: label.into(),
            kind: MediaKind::Video { release_year },
            resolved_playback_id: None,
        }
    }

    /// Attach an already known playback id
    pub fn with_playback_id(mut self, playback_id: impl Into<String>) -> Self {
        self.resolved_playback_id = Some(playback_id.into());
        self
    }

    /// Whether the item can be handed to the player as is
    pub fn is_resolved(&self) -> bool {
        self.resolved_playback_id.is_some()
    }
}

/// Media kind of a queue item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaKind {
    /// Music track, resolved to its official audio upload
    Song,

    /// Movie or series, resolved to its official trailer
    Video {
        #[serde(default)]
        release_year: Option<u16>,
    },
}

/// What to do when a playback id cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// Substitute a fixed playback id so the player always has something to play
    Fallback { playback_id: String },

    /// Leave the slot unresolved and report the failure
    Strict,
}

/// Placeholder substituted when no fallback id is configured
pub const DEFAULT_FALLBACK_PLAYBACK_ID: &str = "aqz-KE-bpKQ";

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::Fallback {
            playback_id: DEFAULT_FALLBACK_PLAYBACK_ID.to_string(),
        }
    }
}

/// Configuration for a [`crate::Coordinator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Failure handling for resolver calls (default: fallback)
    pub policy: ResolutionPolicy,

    /// Upper bound for a single resolver call (default: 10s)
    pub resolve_timeout: Duration,

    /// Capacity of the event broadcast channel (default: 64)
    pub event_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            policy: ResolutionPolicy::default(),
            resolve_timeout: Duration::from_secs(10),
            event_capacity: 64,
        }
    }
}
