//! Reliva Player Library
//!
//! Command-line host for the playback coordinator: loads configuration,
//! wires the HTTP resolver into a coordinator, and drives a queue through a
//! headless player.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod console_player;
pub mod error;
pub mod runner;

// Re-export commonly used types for convenience
pub use config::{PlayerAppConfig, PolicyKind};
pub use console_player::ConsolePlayer;
pub use error::{AppError, Result};
pub use runner::{build_coordinator, load_queue, play_queue, resolve_item, PlayReport};
