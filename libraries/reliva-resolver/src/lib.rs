//! Reliva Resolver Client
//!
//! HTTP client for the web app's search proxy routes, used to turn queue
//! items into third-party player ids.
//!
//! # Features
//!
//! - **Search**: `GET /api/{platform}/search?q=...` returning the best match's id
//! - **Resolver**: implements [`reliva_playback::Resolver`] for the playback coordinator
//!
//! # Example
//!
//! ```ignore
//! use reliva_playback::{Coordinator, CoordinatorConfig, QueueItem};
//! use reliva_resolver::{ResolverConfig, SearchResolverClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchResolverClient::new(ResolverConfig::new("https://reliva.example.com"))?;
//!     let coordinator = Coordinator::new(Arc::new(client), CoordinatorConfig::default());
//!
//!     coordinator
//!         .show(QueueItem::song("s1", "Blinding Lights", "The Weeknd"), vec![], 0)
//!         .await;
//!     println!("{:?}", coordinator.snapshot().await.current_item());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

// Re-export main types
pub use client::SearchResolverClient;
pub use error::{Result, ResolverClientError};
pub use types::{ResolverConfig, SearchHit, SearchResponse};
