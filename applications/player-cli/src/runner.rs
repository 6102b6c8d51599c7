/// Command implementations shared by the binary and its tests
use crate::config::PlayerAppConfig;
use crate::console_player::ConsolePlayer;
use crate::error::{AppError, Result};
use reliva_playback::{
    Coordinator, DispatchOutcome, PlayerState, PlayerView, QueueItem, Resolution, SessionSnapshot,
};
use reliva_resolver::SearchResolverClient;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Result of a `play` run
#[derive(Debug, Serialize)]
pub struct PlayReport {
    /// Playback ids handed to the player, in order
    pub loaded: Vec<String>,
    pub session: SessionSnapshot,
}

/// Build a coordinator backed by the HTTP resolver
pub fn build_coordinator(config: &PlayerAppConfig) -> Result<Coordinator<SearchResolverClient>> {
    config.validate()?;
    let client = SearchResolverClient::new(config.resolver_config())?;
    Ok(Coordinator::new(Arc::new(client), config.coordinator_config()))
}

/// Read a JSON array of queue items
pub fn load_queue(path: &Path) -> Result<Vec<QueueItem>> {
    let contents = std::fs::read_to_string(path)?;
    let queue: Vec<QueueItem> = serde_json::from_str(&contents)?;
    if queue.is_empty() {
        return Err(AppError::Queue(format!("{} contains no items", path.display())));
    }
    Ok(queue)
}

/// Resolve a single item under the configured policy
pub async fn resolve_item(config: &PlayerAppConfig, item: QueueItem) -> Result<Resolution> {
    let coordinator = build_coordinator(config)?;

    let resolution = match coordinator.show(item.clone(), vec![], 0).await {
        DispatchOutcome::Committed(resolution) | DispatchOutcome::Superseded(resolution) => {
            resolution
        }
        DispatchOutcome::Settled => Resolution::Resolved {
            playback_id: item.resolved_playback_id.unwrap_or_default(),
        },
    };
    coordinator.hide_player().await;

    Ok(resolution)
}

/// Play `queue` from `start`, optionally running through to the end
///
/// Autoplay reports an "ended" state for each item in turn, exactly as the
/// embedded widget would, until the coordinator reaches the last item.
pub async fn play_queue(
    config: &PlayerAppConfig,
    queue: Vec<QueueItem>,
    start: usize,
    autoplay: bool,
) -> Result<PlayReport> {
    let item = queue.get(start).cloned().ok_or_else(|| {
        AppError::Queue(format!(
            "start index {} is outside a queue of {} items",
            start,
            queue.len()
        ))
    })?;
    let remaining = queue.len() - start;

    let coordinator = build_coordinator(config)?;
    coordinator.show(item, queue, start).await;

    let mut view = PlayerView::new(ConsolePlayer::new(), coordinator);
    view.sync().await;

    if autoplay {
        for _ in 0..remaining {
            view.handle_state_change(PlayerState::Playing).await;
            match view.handle_state_change(PlayerState::Ended).await {
                Some(DispatchOutcome::Settled) | None => {
                    let snapshot = view.coordinator().snapshot().await;
                    if snapshot.current_index + 1 >= snapshot.queue.len() {
                        break;
                    }
                }
                Some(_) => {}
            }
        }
    }

    Ok(PlayReport {
        loaded: view.player().history().to_vec(),
        session: view.coordinator().snapshot().await,
    })
}
