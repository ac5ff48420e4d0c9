//! Assets and their observed rate points.

use rust_decimal::Decimal;

use super::ids::AssetId;

/// Assets seeded into the catalog at startup.
pub const DEFAULT_ASSETS: [(i64, &str); 5] = [
    (1, "EURUSD"),
    (2, "USDJPY"),
    (3, "GBPUSD"),
    (4, "AUDUSD"),
    (5, "USDCAD"),
];

/// History depth per asset: 30 minutes, one point per second.
pub const HISTORY_DEPTH: usize = 30 * 60;

/// A tracked asset: a currency pair identified by id and symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
        }
    }
}

/// One observed rate for one asset at one second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPoint {
    pub asset: Asset,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub value: Decimal,
}

impl HistoryPoint {
    pub fn new(asset: Asset, timestamp: i64, value: Decimal) -> Self {
        Self {
            asset,
            timestamp,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_assets_are_unique() {
        let mut ids: Vec<_> = DEFAULT_ASSETS.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEFAULT_ASSETS.len());
    }

    #[test]
    fn history_point_carries_exact_value() {
        let asset = Asset::new(1, "EURUSD");
        let point = HistoryPoint::new(asset.clone(), 1_700_000_000, dec!(1.0753));

        assert_eq!(point.asset, asset);
        assert_eq!(point.value, dec!(1.0753));
    }
}
