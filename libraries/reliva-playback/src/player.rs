//! Embedded player bridge
//!
//! Connects a third-party player widget to a [`Coordinator`]: loads the
//! current playback id into the widget, tears it down when the session is
//! hidden, and turns the widget's "ended" notification into `play_next`.

use crate::coordinator::{Coordinator, DispatchOutcome};
use crate::resolver::Resolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Player widget state, as reported by the widget's state-change callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Decode the widget's numeric state code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

/// Player widget error, as reported by the widget's error callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerErrorCode {
    /// Malformed playback id
    InvalidParameter,
    /// Content cannot be played in an HTML5 player
    Html5,
    /// Video removed or private
    NotFound,
    /// Owner does not allow embedded playback
    EmbeddingNotAllowed,
    /// Code not known to this bridge
    Other(i32),
}

impl PlayerErrorCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::InvalidParameter,
            5 => Self::Html5,
            100 => Self::NotFound,
            101 | 150 => Self::EmbeddingNotAllowed,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for PlayerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => f.write_str("invalid parameter"),
            Self::Html5 => f.write_str("html5 player error"),
            Self::NotFound => f.write_str("video not found"),
            Self::EmbeddingNotAllowed => f.write_str("embedding not allowed"),
            Self::Other(code) => write!(f, "player error {}", code),
        }
    }
}

/// Embedded third-party player widget
///
/// Implement this for the platform's player (iframe API, native view, or a
/// console stand-in).
pub trait EmbeddedPlayer: Send {
    /// Load a playback id, replacing whatever is loaded
    fn load(&mut self, playback_id: &str);

    fn play_video(&mut self);

    fn pause_video(&mut self);

    /// Tear down the widget
    fn destroy(&mut self);
}

/// What the widget is doing, as far as the bridge knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Idle,
    Buffering,
    Playing,
    Paused,
    Ended,
}

/// Binds an [`EmbeddedPlayer`] to a [`Coordinator`]
pub struct PlayerView<P, R: ?Sized> {
    player: P,
    coordinator: Coordinator<R>,
    // (session generation, playback id) currently in the widget
    loaded: Option<(u64, String)>,
    status: PlayerStatus,
    last_error: Option<PlayerErrorCode>,
}

impl<P: EmbeddedPlayer, R: Resolver + ?Sized> PlayerView<P, R> {
    pub fn new(player: P, coordinator: Coordinator<R>) -> Self {
        Self {
            player,
            coordinator,
            loaded: None,
            status: PlayerStatus::Idle,
            last_error: None,
        }
    }

    /// Bring the widget in line with the session
    ///
    /// Destroys the widget when the session is hidden; loads and starts the
    /// current item after every navigation. Keyed on the session generation,
    /// so moving between slots that share an item id or a playback id still
    /// restarts the widget.
    pub async fn sync(&mut self) {
        let snapshot = self.coordinator.snapshot().await;

        if !snapshot.visible {
            if self.loaded.take().is_some() {
                debug!("destroying player widget");
                self.player.destroy();
            }
            self.status = PlayerStatus::Idle;
            return;
        }

        let wanted = snapshot
            .current_item()
            .and_then(|item| item.resolved_playback_id.clone())
            .map(|playback_id| (snapshot.generation, playback_id));

        match wanted {
            Some(key) if self.loaded.as_ref() != Some(&key) => {
                debug!(
                    index = snapshot.current_index,
                    generation = key.0,
                    playback_id = %key.1,
                    "loading player widget"
                );
                self.player.load(&key.1);
                self.player.play_video();
                self.loaded = Some(key);
                self.status = PlayerStatus::Buffering;
                self.last_error = None;
            }
            Some(_) => {}
            None => debug!(loading = snapshot.loading, "no playback id for current item yet"),
        }
    }

    /// Handle a widget state change
    ///
    /// `Ended` advances the queue and reloads the widget. At the end of the
    /// queue playback simply stops on the last item.
    pub async fn handle_state_change(&mut self, state: PlayerState) -> Option<DispatchOutcome> {
        match state {
            PlayerState::Playing => self.status = PlayerStatus::Playing,
            PlayerState::Paused => self.status = PlayerStatus::Paused,
            PlayerState::Buffering => self.status = PlayerStatus::Buffering,
            PlayerState::Unstarted | PlayerState::Cued => {}
            PlayerState::Ended => {
                self.status = PlayerStatus::Ended;
                let outcome = self.coordinator.play_next().await;
                self.sync().await;
                return Some(outcome);
            }
        }
        None
    }

    /// Handle a raw state code from the widget; unknown codes are ignored
    pub async fn handle_state_code(&mut self, code: i32) -> Option<DispatchOutcome> {
        match PlayerState::from_code(code) {
            Some(state) => self.handle_state_change(state).await,
            None => {
                debug!(code, "ignoring unknown player state");
                None
            }
        }
    }

    /// Record a widget error; the queue position is left alone
    pub fn handle_error(&mut self, code: i32) {
        let error = PlayerErrorCode::from_code(code);
        warn!(
            error = %error,
            playback_id = self.loaded_playback_id().unwrap_or("-"),
            "player widget error"
        );
        self.last_error = Some(error);
    }

    pub fn toggle_playback(&mut self) {
        match self.status {
            PlayerStatus::Playing => {
                self.player.pause_video();
                self.status = PlayerStatus::Paused;
            }
            PlayerStatus::Paused | PlayerStatus::Ended | PlayerStatus::Buffering => {
                if self.loaded.is_some() {
                    self.player.play_video();
                    self.status = PlayerStatus::Playing;
                }
            }
            PlayerStatus::Idle => {}
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn loaded_playback_id(&self) -> Option<&str> {
        self.loaded.as_ref().map(|(_, playback_id)| playback_id.as_str())
    }

    pub fn last_error(&self) -> Option<PlayerErrorCode> {
        self.last_error
    }

    pub fn coordinator(&self) -> &Coordinator<R> {
        &self.coordinator
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}
