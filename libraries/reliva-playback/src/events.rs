//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! Each reduction of the session publishes whole-state events:
//! - Visibility changes (show/hide)
//! - Current item changes
//! - Resolution progress and outcome
//! - Queue boundaries hit during navigation

use crate::resolver::Resolution;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Floating player mounted or unmounted
    VisibilityChanged {
        /// Whether the player is now visible
        visible: bool,
    },

    /// Queue replaced by a show call
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Current item changed
    ItemChanged {
        /// ID of the new current item
        item_id: String,
        /// Position of the new current item
        index: usize,
        /// ID of the previous current item (if any)
        previous_item_id: Option<String>,
    },

    /// Resolution started for the current item
    ResolutionStarted {
        /// ID of the item being resolved
        item_id: String,
        /// Navigation generation the request belongs to
        generation: u64,
    },

    /// Resolution committed to the queue
    ResolutionCommitted {
        /// ID of the resolved item
        item_id: String,
        /// Queue slot written
        index: usize,
        /// Outcome, including any fallback cause
        resolution: Resolution,
    },

    /// Resolution arrived after a newer navigation and was dropped
    ResolutionDiscarded {
        /// Generation the stale request belonged to
        stale_generation: u64,
        /// Generation current when it arrived
        current_generation: u64,
    },

    /// `next` requested on the last item
    EndOfQueue,

    /// `previous` requested on the first item
    StartOfQueue,
}
