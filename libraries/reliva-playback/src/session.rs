//! Playback session state machine
//!
//! The session is a plain state object driven by tagged [`Action`]s. Every
//! mutation goes through [`PlaybackSession::reduce`], which returns the
//! [`Effect`] the caller has to perform (at most one resolver call).
//!
//! ```text
//!   Idle ──show──▶ Resolving ──resolution──▶ Ready
//!    ▲                ▲                        │
//!    │                └──next/previous/jump────┘
//!    └────────────────────hide─────────────────┘
//! ```
//!
//! Each navigation bumps a generation counter. A resolution is committed
//! only if its token carries the current generation, so a slow lookup for
//! an item the user already skipped past can never overwrite newer state.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::resolver::Resolution;
use crate::types::QueueItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Externally visible phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Player hidden, queue empty
    Idle,

    /// Visible, waiting for the current item's playback id
    Resolving,

    /// Visible, current item has a playback id
    Ready,

    /// Visible, resolution failed under the strict policy
    Unplayable,
}

/// Identifies which navigation a resolver call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveToken {
    /// Session generation when the request was issued
    pub generation: u64,

    /// Queue slot the result should be written to
    pub index: usize,
}

/// A resolver call the session is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub token: ResolveToken,
    pub item: QueueItem,
}

/// Session mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Play `item`, optionally inside a new queue
    Show {
        item: QueueItem,
        queue: Vec<QueueItem>,
        start_index: usize,
    },

    /// Advance to the next item
    Next,

    /// Go back to the previous item
    Previous,

    /// Select an arbitrary queue slot
    JumpTo(usize),

    /// Unmount the player and forget the queue
    Hide,

    /// A resolver call finished
    ResolutionCompleted {
        token: ResolveToken,
        resolution: Resolution,
    },
}

/// Work requested by a reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Resolve(ResolveRequest),
}

/// Point-in-time copy of the session for rendering or serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub visible: bool,
    pub queue: Vec<QueueItem>,
    pub current_index: usize,
    pub loading: bool,
    pub phase: SessionPhase,
    /// Navigation counter; changes whenever the current slot is re-entered
    pub generation: u64,
    pub last_resolution: Option<Resolution>,
}

impl SessionSnapshot {
    /// Item at the current index, if the player is showing one
    pub fn current_item(&self) -> Option<&QueueItem> {
        if self.visible {
            self.queue.get(self.current_index)
        } else {
            None
        }
    }
}

/// Playback queue and player visibility
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    visible: bool,
    queue: Vec<QueueItem>,
    current_index: usize,
    loading: bool,

    // Bumped on every navigation; stale resolutions are discarded
    generation: u64,

    last_resolution: Option<Resolution>,

    // Drained by the coordinator after each reduction
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action
    ///
    /// Only [`Action::JumpTo`] can fail. Every other action is total:
    /// boundary navigation and navigation on a hidden session are no-ops,
    /// and stale completions are discarded.
    pub fn reduce(&mut self, action: Action) -> Result<Effect> {
        match action {
            Action::Show {
                item,
                queue,
                start_index,
            } => Ok(self.show(item, queue, start_index)),
            Action::Next => Ok(self.next()),
            Action::Previous => Ok(self.previous()),
            Action::JumpTo(index) => self.jump_to(index),
            Action::Hide => {
                self.hide();
                Ok(Effect::None)
            }
            Action::ResolutionCompleted { token, resolution } => {
                self.complete(token, resolution);
                Ok(Effect::None)
            }
        }
    }

    fn show(&mut self, item: QueueItem, queue: Vec<QueueItem>, start_index: usize) -> Effect {
        let previous_item_id = self.current_item().map(|current| current.id.clone());

        let mut queue = if queue.is_empty() {
            vec![item.clone()]
        } else {
            queue
        };

        let index = match queue.get(start_index) {
            Some(slot) if slot.id == item.id => start_index,
            _ => match queue.iter().position(|slot| slot.id == item.id) {
                Some(position) => position,
                None => {
                    queue.push(item.clone());
                    queue.len() - 1
                }
            },
        };

        if let (Some(slot), Some(playback_id)) = (queue.get_mut(index), item.resolved_playback_id) {
            if slot.resolved_playback_id.is_none() {
                slot.resolved_playback_id = Some(playback_id);
            }
        }

        // Ids resolved earlier stay valid for as long as the item is queued
        let cached: HashMap<&str, &str> = self
            .queue
            .iter()
            .filter_map(|slot| {
                slot.resolved_playback_id
                    .as_deref()
                    .map(|playback_id| (slot.id.as_str(), playback_id))
            })
            .collect();
        for slot in queue.iter_mut().filter(|slot| !slot.is_resolved()) {
            if let Some(playback_id) = cached.get(slot.id.as_str()) {
                slot.resolved_playback_id = Some((*playback_id).to_string());
            }
        }

        self.queue = queue;
        if !self.visible {
            self.visible = true;
            self.pending_events
                .push(PlaybackEvent::VisibilityChanged { visible: true });
        }
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });

        self.enter(index, previous_item_id)
    }

    fn next(&mut self) -> Effect {
        if !self.visible || self.queue.is_empty() {
            debug!("next ignored, player hidden");
            return Effect::None;
        }
        if self.current_index + 1 >= self.queue.len() {
            debug!(index = self.current_index, "next ignored, end of queue");
            self.pending_events.push(PlaybackEvent::EndOfQueue);
            return Effect::None;
        }

        let previous_item_id = self.current_item().map(|current| current.id.clone());
        self.enter(self.current_index + 1, previous_item_id)
    }

    fn previous(&mut self) -> Effect {
        if !self.visible || self.queue.is_empty() {
            debug!("previous ignored, player hidden");
            return Effect::None;
        }
        if self.current_index == 0 {
            debug!("previous ignored, start of queue");
            self.pending_events.push(PlaybackEvent::StartOfQueue);
            return Effect::None;
        }

        let previous_item_id = self.current_item().map(|current| current.id.clone());
        self.enter(self.current_index - 1, previous_item_id)
    }

    fn jump_to(&mut self, index: usize) -> Result<Effect> {
        if !self.visible || self.queue.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }
        if index >= self.queue.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.queue.len(),
            });
        }

        let previous_item_id = self.current_item().map(|current| current.id.clone());
        Ok(self.enter(index, previous_item_id))
    }

    fn hide(&mut self) {
        let was_visible = self.visible;

        self.visible = false;
        self.queue.clear();
        self.current_index = 0;
        self.loading = false;
        self.last_resolution = None;
        self.generation += 1;

        if was_visible {
            self.pending_events
                .push(PlaybackEvent::VisibilityChanged { visible: false });
        }
        debug!(generation = self.generation, "player hidden");
    }

    /// Make `index` current and request resolution if needed
    fn enter(&mut self, index: usize, previous_item_id: Option<String>) -> Effect {
        let Some(item) = self.queue.get(index).cloned() else {
            return Effect::None;
        };

        self.current_index = index;
        self.generation += 1;
        self.pending_events.push(PlaybackEvent::ItemChanged {
            item_id: item.id.clone(),
            index,
            previous_item_id,
        });

        if item.is_resolved() {
            self.loading = false;
            debug!(item_id = %item.id, index, "item ready");
            return Effect::None;
        }

        self.loading = true;
        self.pending_events.push(PlaybackEvent::ResolutionStarted {
            item_id: item.id.clone(),
            generation: self.generation,
        });
        debug!(item_id = %item.id, index, generation = self.generation, "resolving item");

        Effect::Resolve(ResolveRequest {
            token: ResolveToken {
                generation: self.generation,
                index,
            },
            item,
        })
    }

    fn complete(&mut self, token: ResolveToken, resolution: Resolution) {
        if token.generation != self.generation {
            debug!(
                stale_generation = token.generation,
                current_generation = self.generation,
                "discarding stale resolution"
            );
            self.pending_events.push(PlaybackEvent::ResolutionDiscarded {
                stale_generation: token.generation,
                current_generation: self.generation,
            });
            return;
        }

        let Some(slot) = self.queue.get_mut(token.index) else {
            warn!(index = token.index, "resolution for missing queue slot");
            return;
        };

        if let Some(playback_id) = resolution.playback_id() {
            slot.resolved_playback_id = Some(playback_id.to_string());
        }
        let item_id = slot.id.clone();

        self.loading = false;
        self.last_resolution = Some(resolution.clone());

        info!(
            item_id = %item_id,
            index = token.index,
            playback_id = resolution.playback_id().unwrap_or("-"),
            degraded = resolution.is_degraded(),
            "resolution committed"
        );
        self.pending_events.push(PlaybackEvent::ResolutionCommitted {
            item_id,
            index: token.index,
            resolution,
        });
    }

    // ===== Accessors =====

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn queue(&self) -> &[QueueItem] {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    /// Item at the current index, if the player is showing one
    pub fn current_item(&self) -> Option<&QueueItem> {
        if self.visible {
            self.queue.get(self.current_index)
        } else {
            None
        }
    }

    /// Derive the externally visible phase
    pub fn phase(&self) -> SessionPhase {
        if !self.visible {
            SessionPhase::Idle
        } else if self.loading {
            SessionPhase::Resolving
        } else if self.current_item().is_some_and(QueueItem::is_resolved) {
            SessionPhase::Ready
        } else {
            SessionPhase::Unplayable
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            visible: self.visible,
            queue: self.queue.clone(),
            current_index: self.current_index,
            loading: self.loading,
            phase: self.phase(),
            generation: self.generation,
            last_resolution: self.last_resolution.clone(),
        }
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    fn song(id: &str) -> QueueItem {
        QueueItem::song(id, format!("Song {}", id), "Test Artist")
    }

    fn show(session: &mut PlaybackSession, item: QueueItem, queue: Vec<QueueItem>, start: usize) -> Effect {
        session
            .reduce(Action::Show {
                item,
                queue,
                start_index: start,
            })
            .unwrap()
    }

    fn resolve(session: &mut PlaybackSession, effect: Effect, playback_id: &str) {
        let Effect::Resolve(request) = effect else {
            panic!("expected a resolve effect, got {:?}", effect);
        };
        session
            .reduce(Action::ResolutionCompleted {
                token: request.token,
                resolution: Resolution::Resolved {
                    playback_id: playback_id.to_string(),
                },
            })
            .unwrap();
    }

    fn ready_session(ids: &[&str], start: usize) -> PlaybackSession {
        let queue: Vec<QueueItem> = ids
            .iter()
            .map(|id| song(id).with_playback_id(format!("P-{}", id)))
            .collect();
        let mut session = PlaybackSession::new();
        let effect = show(&mut session, queue[start].clone(), queue, start);
        assert_eq!(effect, Effect::None);
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = PlaybackSession::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.queue().is_empty());
        assert!(session.current_item().is_none());
    }

    #[test]
    fn show_without_queue_synthesizes_single_item_queue() {
        let mut session = PlaybackSession::new();
        let effect = show(&mut session, song("a"), vec![], 0);

        assert!(matches!(effect, Effect::Resolve(_)));
        assert_eq!(session.queue().len(), 1);
        assert_eq!(session.current_index(), 0);
        assert!(session.is_visible());
        assert_eq!(session.phase(), SessionPhase::Resolving);
    }

    #[test]
    fn show_same_item_twice_does_not_duplicate() {
        let mut session = PlaybackSession::new();
        let effect = show(&mut session, song("a"), vec![], 0);
        resolve(&mut session, effect, "V1");

        let effect = show(&mut session, song("a"), vec![], 0);

        assert_eq!(effect, Effect::None, "cached id must not be re-resolved");
        assert_eq!(session.queue().len(), 1);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn show_appends_item_missing_from_queue() {
        let mut session = PlaybackSession::new();
        show(&mut session, song("z"), vec![song("a"), song("b")], 0);

        assert_eq!(session.queue().len(), 3);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.current_item().unwrap().id, "z");
    }

    #[test]
    fn show_prefers_start_index_for_duplicate_ids() {
        let mut session = PlaybackSession::new();
        show(&mut session, song("a"), vec![song("a"), song("b"), song("a")], 2);
        assert_eq!(session.current_index(), 2);

        // Mismatched hint falls back to first occurrence
        show(&mut session, song("b"), vec![song("a"), song("b"), song("a")], 0);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn show_preserves_previously_resolved_ids() {
        let mut session = PlaybackSession::new();
        let effect = show(&mut session, song("a"), vec![], 0);
        resolve(&mut session, effect, "V1");

        let effect = show(&mut session, song("b"), vec![song("a"), song("b")], 1);

        assert!(matches!(effect, Effect::Resolve(ref r) if r.item.id == "b"));
        assert_eq!(session.queue().len(), 2);
        assert_eq!(session.current_index(), 1);
        assert_eq!(
            session.queue()[0].resolved_playback_id.as_deref(),
            Some("V1")
        );
    }

    #[test]
    fn next_at_last_index_leaves_state_unchanged() {
        let mut session = ready_session(&["a", "b"], 1);
        let before = session.snapshot();
        let generation = session.generation();
        session.drain_events();

        let effect = session.reduce(Action::Next).unwrap();

        assert_eq!(effect, Effect::None);
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.generation(), generation);
        assert_eq!(session.drain_events(), vec![PlaybackEvent::EndOfQueue]);
    }

    #[test]
    fn previous_at_first_index_leaves_state_unchanged() {
        let mut session = ready_session(&["a", "b"], 0);
        let before = session.snapshot();

        let effect = session.reduce(Action::Previous).unwrap();

        assert_eq!(effect, Effect::None);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn navigation_on_hidden_session_is_noop() {
        let mut session = PlaybackSession::new();
        assert_eq!(session.reduce(Action::Next).unwrap(), Effect::None);
        assert_eq!(session.reduce(Action::Previous).unwrap(), Effect::None);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn next_requests_resolution_for_unresolved_item() {
        let mut session = PlaybackSession::new();
        let queue = vec![song("a").with_playback_id("PA"), song("b")];
        show(&mut session, queue[0].clone(), queue, 0);

        let effect = session.reduce(Action::Next).unwrap();

        let Effect::Resolve(request) = effect else {
            panic!("expected resolve");
        };
        assert_eq!(request.item.id, "b");
        assert_eq!(request.token.index, 1);
        assert_eq!(request.token.generation, session.generation());
        assert!(session.is_loading());
    }

    #[test]
    fn jump_to_out_of_range_fails() {
        let mut session = ready_session(&["a", "b"], 0);

        match session.reduce(Action::JumpTo(5)) {
            Err(PlaybackError::IndexOutOfBounds { index, len }) => {
                assert_eq!(index, 5);
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfBounds, got {:?}", other),
        }
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn jump_to_on_idle_session_fails() {
        let mut session = PlaybackSession::new();
        assert!(matches!(
            session.reduce(Action::JumpTo(0)),
            Err(PlaybackError::QueueEmpty)
        ));
    }

    #[test]
    fn hide_resets_everything() {
        let mut session = PlaybackSession::new();
        show(&mut session, song("b"), vec![song("a"), song("b")], 1);
        assert!(session.is_loading());

        session.reduce(Action::Hide).unwrap();

        assert!(!session.is_visible());
        assert!(session.queue().is_empty());
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_loading());
        assert!(session.last_resolution().is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn stale_resolution_is_discarded() {
        let mut session = PlaybackSession::new();
        let effect = show(&mut session, song("a"), vec![song("a"), song("b")], 0);
        let Effect::Resolve(stale) = effect else {
            panic!("expected resolve");
        };

        // User skips ahead before the first lookup returns
        let effect = session.reduce(Action::Next).unwrap();
        session.drain_events();

        session
            .reduce(Action::ResolutionCompleted {
                token: stale.token,
                resolution: Resolution::Resolved {
                    playback_id: "STALE".into(),
                },
            })
            .unwrap();

        assert!(session.queue()[0].resolved_playback_id.is_none());
        assert!(session.is_loading(), "current lookup still outstanding");
        assert!(matches!(
            session.drain_events().as_slice(),
            [PlaybackEvent::ResolutionDiscarded { .. }]
        ));

        resolve(&mut session, effect, "VB");
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.current_item().unwrap().resolved_playback_id.as_deref(), Some("VB"));
    }

    #[test]
    fn resolution_after_hide_is_discarded() {
        let mut session = PlaybackSession::new();
        let Effect::Resolve(request) = show(&mut session, song("a"), vec![], 0) else {
            panic!("expected resolve");
        };
        session.reduce(Action::Hide).unwrap();

        session
            .reduce(Action::ResolutionCompleted {
                token: request.token,
                resolution: Resolution::Resolved {
                    playback_id: "V1".into(),
                },
            })
            .unwrap();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.queue().is_empty());
    }

    #[test]
    fn failed_resolution_leaves_slot_unplayable() {
        let mut session = PlaybackSession::new();
        let Effect::Resolve(request) = show(&mut session, song("a"), vec![], 0) else {
            panic!("expected resolve");
        };

        session
            .reduce(Action::ResolutionCompleted {
                token: request.token,
                resolution: Resolution::Failed {
                    cause: ResolveError::NoResult,
                },
            })
            .unwrap();

        assert!(!session.is_loading());
        assert_eq!(session.phase(), SessionPhase::Unplayable);
        assert!(session.last_resolution().unwrap().is_degraded());
    }

    #[test]
    fn show_emits_visibility_then_item_events() {
        let mut session = PlaybackSession::new();
        show(&mut session, song("a").with_playback_id("PA"), vec![], 0);

        let events = session.drain_events();
        assert_eq!(
            events,
            vec![
                PlaybackEvent::VisibilityChanged { visible: true },
                PlaybackEvent::QueueChanged { length: 1 },
                PlaybackEvent::ItemChanged {
                    item_id: "a".into(),
                    index: 0,
                    previous_item_id: None,
                },
            ]
        );
        assert!(session.drain_events().is_empty());
    }
}
