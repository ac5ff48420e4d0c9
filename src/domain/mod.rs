//! Core domain types for assets and their rate history.

mod asset;
mod ids;

pub use asset::{Asset, HistoryPoint, DEFAULT_ASSETS, HISTORY_DEPTH};
pub use ids::AssetId;
