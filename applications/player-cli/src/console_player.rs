/// Headless stand-in for the embedded player widget
use reliva_playback::EmbeddedPlayer;
use tracing::info;

/// Logs widget calls instead of rendering anything
#[derive(Debug, Default)]
pub struct ConsolePlayer {
    loaded: Vec<String>,
    playing: bool,
}

impl ConsolePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every playback id loaded so far, in order
    pub fn history(&self) -> &[String] {
        &self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl EmbeddedPlayer for ConsolePlayer {
    fn load(&mut self, playback_id: &str) {
        info!(playback_id, "Loading player");
        self.loaded.push(playback_id.to_string());
    }

    fn play_video(&mut self) {
        self.playing = true;
    }

    fn pause_video(&mut self) {
        self.playing = false;
    }

    fn destroy(&mut self) {
        info!("Player destroyed");
        self.playing = false;
    }
}
