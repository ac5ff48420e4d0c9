//! In-memory ring-buffer store.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::HistoryStore;
use crate::domain::{Asset, AssetId, HistoryPoint, DEFAULT_ASSETS, HISTORY_DEPTH};

/// Thread-safe store keeping a bounded history per catalog asset.
pub struct MemoryStore {
    catalog: Vec<Asset>,
    history: RwLock<HashMap<AssetId, VecDeque<HistoryPoint>>>,
}

impl MemoryStore {
    /// Create a store seeded with [`DEFAULT_ASSETS`].
    pub fn new() -> Self {
        Self::with_assets(
            DEFAULT_ASSETS
                .iter()
                .map(|(id, symbol)| Asset::new(*id, *symbol))
                .collect(),
        )
    }

    /// Create a store over an explicit catalog.
    pub fn with_assets(catalog: Vec<Asset>) -> Self {
        let history = catalog
            .iter()
            .map(|asset| (asset.id, VecDeque::new()))
            .collect();

        Self {
            catalog,
            history: RwLock::new(history),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn assets(&self) -> Vec<Asset> {
        self.catalog.clone()
    }

    async fn asset_by_id(&self, id: AssetId) -> Option<Asset> {
        self.catalog.iter().find(|asset| asset.id == id).cloned()
    }

    async fn save_points(&self, points: &[HistoryPoint]) {
        let mut history = self.history.write();

        for point in points {
            debug!(asset = %point.asset.symbol, "New history point");

            let buf = history.entry(point.asset.id).or_default();
            if buf.len() == HISTORY_DEPTH {
                buf.pop_back();
            }
            buf.push_front(point.clone());
        }
    }

    async fn history(&self, asset: &Asset) -> Vec<HistoryPoint> {
        self.history
            .read()
            .get(&asset.id)
            .map(|buf| buf.iter().cloned().collect())
            .unwrap_or_default()
    }
}
