//! Playback coordinator - async orchestration
//!
//! Owns a [`PlaybackSession`] behind a lock, performs the resolver calls the
//! session asks for, and broadcasts the resulting events. The lock is never
//! held across a resolver call; results are fed back as
//! [`Action::ResolutionCompleted`] and committed only if still current.

use crate::{
    error::{ResolveError, Result},
    events::PlaybackEvent,
    resolver::{Resolution, Resolver, SearchQuery},
    session::{Action, Effect, PlaybackSession, ResolveRequest, SessionSnapshot},
    types::{CoordinatorConfig, QueueItem, ResolutionPolicy},
};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

/// What a coordinator call ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No resolver call was needed
    Settled,

    /// A resolver call finished and its result was committed
    Committed(Resolution),

    /// A resolver call finished after a newer navigation; result dropped
    Superseded(Resolution),
}

/// Central playback coordination
///
/// Cheap to clone; clones share the same session and event channel. One
/// coordinator is created per media kind (music player, trailer player).
pub struct Coordinator<R: ?Sized> {
    session: Arc<Mutex<PlaybackSession>>,
    resolver: Arc<R>,
    config: Arc<CoordinatorConfig>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl<R: ?Sized> Clone for Coordinator<R> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            resolver: Arc::clone(&self.resolver),
            config: Arc::clone(&self.config),
            events: self.events.clone(),
        }
    }
}

impl<R: Resolver + ?Sized> Coordinator<R> {
    /// Create a coordinator with an idle session
    pub fn new(resolver: Arc<R>, config: CoordinatorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            session: Arc::new(Mutex::new(PlaybackSession::new())),
            resolver,
            config: Arc::new(config),
            events,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Copy of the current session state
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    // ===== Playback Control =====

    /// Play `item`, optionally as part of `queue`
    ///
    /// An empty `queue` plays the item on its own. The item is appended when
    /// the queue does not contain it.
    pub async fn show(
        &self,
        item: QueueItem,
        queue: Vec<QueueItem>,
        start_index: usize,
    ) -> DispatchOutcome {
        self.dispatch_infallible(Action::Show {
            item,
            queue,
            start_index,
        })
        .await
    }

    /// Advance to the next item; no-op on the last one
    pub async fn play_next(&self) -> DispatchOutcome {
        self.dispatch_infallible(Action::Next).await
    }

    /// Go back to the previous item; no-op on the first one
    pub async fn play_previous(&self) -> DispatchOutcome {
        self.dispatch_infallible(Action::Previous).await
    }

    /// Select a queue slot directly
    pub async fn jump_to(&self, index: usize) -> Result<DispatchOutcome> {
        self.dispatch(Action::JumpTo(index)).await
    }

    /// Unmount the player and clear the queue
    pub async fn hide_player(&self) {
        self.dispatch_infallible(Action::Hide).await;
    }

    /// Apply an action and perform the effect it requests
    pub async fn dispatch(&self, action: Action) -> Result<DispatchOutcome> {
        match self.apply(action).await? {
            Effect::None => Ok(DispatchOutcome::Settled),
            Effect::Resolve(request) => Ok(self.run_resolution(request).await),
        }
    }

    /// Dispatch an action the reducer handles without error
    ///
    /// `reduce` fails only for [`Action::JumpTo`]; show, navigation and hide
    /// are total and boundary cases are no-ops, so they are routed here.
    async fn dispatch_infallible(&self, action: Action) -> DispatchOutcome {
        debug_assert!(
            !matches!(action, Action::JumpTo(_)),
            "JumpTo must go through dispatch"
        );
        match self.dispatch(action).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "playback reducer rejected a total action");
                DispatchOutcome::Settled
            }
        }
    }

    async fn apply(&self, action: Action) -> Result<Effect> {
        let (effect, events) = {
            let mut session = self.session.lock().await;
            let effect = session.reduce(action)?;
            (effect, session.drain_events())
        };
        self.publish(events);
        Ok(effect)
    }

    async fn run_resolution(&self, request: ResolveRequest) -> DispatchOutcome {
        let resolution = self.resolve(&request.item).await;

        let (committed, events) = {
            let mut session = self.session.lock().await;
            let committed = session.generation() == request.token.generation;
            // Cannot fail: completions are total
            let _ = session.reduce(Action::ResolutionCompleted {
                token: request.token,
                resolution: resolution.clone(),
            });
            (committed, session.drain_events())
        };
        self.publish(events);

        if committed {
            DispatchOutcome::Committed(resolution)
        } else {
            DispatchOutcome::Superseded(resolution)
        }
    }

    /// Look up a playback id for `item`, applying the failure policy
    async fn resolve(&self, item: &QueueItem) -> Resolution {
        let query = SearchQuery::for_item(item);
        let timeout = self.config.resolve_timeout;
        debug!(item_id = %item.id, query = %query, "calling resolver");

        let result = match tokio::time::timeout(timeout, self.resolver.resolve(&query)).await {
            Ok(result) => result,
            Err(_) => Err(ResolveError::Timeout(timeout)),
        };

        match result {
            Ok(playback_id) => Resolution::Resolved { playback_id },
            Err(cause) => match &self.config.policy {
                ResolutionPolicy::Fallback { playback_id } => {
                    warn!(
                        item_id = %item.id,
                        query = %query,
                        error = %cause,
                        fallback = %playback_id,
                        "resolution failed, using fallback"
                    );
                    Resolution::Fallback {
                        playback_id: playback_id.clone(),
                        cause,
                    }
                }
                ResolutionPolicy::Strict => {
                    warn!(item_id = %item.id, query = %query, error = %cause, "resolution failed");
                    Resolution::Failed { cause }
                }
            },
        }
    }

    fn publish(&self, events: Vec<PlaybackEvent>) {
        for event in events {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }
}
