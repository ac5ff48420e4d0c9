//! Storage for the asset catalog and rate history.
//!
//! WARNING: the shipped implementation keeps everything in process memory
//! and does not provide any data persistence. The [`HistoryStore`] trait is
//! the seam where a SQL-backed store would slot in.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::domain::{Asset, AssetId, HistoryPoint};

/// Catalog and history operations used by the crawler and the WebSocket API.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All tracked assets, in catalog order.
    async fn assets(&self) -> Vec<Asset>;

    /// Look up an asset by id.
    async fn asset_by_id(&self, id: AssetId) -> Option<Asset>;

    /// Append a batch of points.
    async fn save_points(&self, points: &[HistoryPoint]);

    /// Stored history for an asset, newest first.
    async fn history(&self, asset: &Asset) -> Vec<HistoryPoint>;
}
