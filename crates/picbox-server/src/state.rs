//! Application state shared across handlers.
//!
//! [`AppState`] wraps [`AlbumService`] in `Arc<tokio::sync::Mutex<_>>`.
//! The async-aware mutex lets handlers await the lock without blocking the
//! tokio runtime; an `RwLock` is not an option because the service holds a
//! `rusqlite::Connection`, which is `!Sync`.

use std::sync::Arc;

use crate::error::ApiError;
use crate::service::AlbumService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<AlbumService>>,
}

impl AppState {
    /// Creates state backed by the given SQLite path and media directory.
    pub fn new(db_path: &str, media_dir: &str) -> Result<Self, ApiError> {
        let service = AlbumService::new(db_path, media_dir)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }

    /// Creates state with an in-memory database (for testing).
    pub fn in_memory(media_dir: &str) -> Result<Self, ApiError> {
        let service = AlbumService::in_memory(media_dir)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }
}
