//! Shared application state.

use std::sync::Arc;

use crate::pubsub::Channels;
use crate::storage::{HistoryStore, MemoryStore};

/// State shared by the crawler and every WebSocket connection.
pub struct AppState {
    pub store: Arc<dyn HistoryStore>,
    pub channels: Arc<Channels>,
}

impl AppState {
    /// State over the default in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            channels: Arc::new(Channels::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
