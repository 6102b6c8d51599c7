//! Reliva - Playback Coordination
//!
//! Platform-agnostic queue and player coordination for Reliva's floating
//! music and trailer players.
//!
//! This crate provides:
//! - Playback session with an explicit reducer (`Show`, `Next`, `Previous`, `JumpTo`, `Hide`)
//! - Lazy playback id resolution through a pluggable [`Resolver`]
//! - Fallback or strict handling of failed resolutions
//! - Generation tokens that discard stale resolutions
//! - A bridge to an embedded player widget
//!
//! # Architecture
//!
//! `reliva-playback` knows nothing about HTTP or any particular widget:
//! - Resolution is provided via the [`Resolver`] trait (`reliva-resolver` ships an HTTP client)
//! - Player widgets are provided via the [`EmbeddedPlayer`] trait
//!
//! # Example: Driving the session directly
//!
//! ```rust
//! use reliva_playback::{Action, Effect, PlaybackSession, QueueItem, Resolution};
//!
//! let mut session = PlaybackSession::new();
//! let effect = session
//!     .reduce(Action::Show {
//!         item: QueueItem::song("s1", "Blinding Lights", "The Weeknd"),
//!         queue: vec![],
//!         start_index: 0,
//!     })
//!     .unwrap();
//!
//! if let Effect::Resolve(request) = effect {
//!     session
//!         .reduce(Action::ResolutionCompleted {
//!             token: request.token,
//!             resolution: Resolution::Resolved { playback_id: "4NRXx6U8ABQ".into() },
//!         })
//!         .unwrap();
//! }
//!
//! assert!(!session.is_loading());
//! ```
//!
//! # Example: Async coordinator
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use reliva_playback::{Coordinator, CoordinatorConfig, QueueItem, ResolveError, Resolver, SearchQuery};
//! use std::sync::Arc;
//!
//! struct StaticResolver;
//!
//! #[async_trait]
//! impl Resolver for StaticResolver {
//!     async fn resolve(&self, _query: &SearchQuery) -> Result<String, ResolveError> {
//!         Ok("4NRXx6U8ABQ".to_string())
//!     }
//! }
//!
//! # async fn run() {
//! let coordinator = Coordinator::new(Arc::new(StaticResolver), CoordinatorConfig::default());
//! coordinator
//!     .show(QueueItem::song("s1", "Blinding Lights", "The Weeknd"), vec![], 0)
//!     .await;
//! coordinator.play_next().await; // no-op: single item queue
//! # }
//! ```

mod coordinator;
mod error;
pub mod events;
pub mod player;
mod resolver;
mod session;
pub mod types;

// Public exports
pub use coordinator::{Coordinator, DispatchOutcome};
pub use error::{PlaybackError, ResolveError, Result};
pub use events::PlaybackEvent;
pub use player::{EmbeddedPlayer, PlayerErrorCode, PlayerState, PlayerStatus, PlayerView};
pub use resolver::{Resolution, Resolver, SearchQuery};
pub use session::{
    Action, Effect, PlaybackSession, ResolveRequest, ResolveToken, SessionPhase, SessionSnapshot,
};
pub use types::{
    CoordinatorConfig, MediaKind, QueueItem, ResolutionPolicy, DEFAULT_FALLBACK_PLAYBACK_ID,
};
