//! Wire protocol for the WebSocket API.
//!
//! Every frame is a JSON envelope `{"action": ..., "message": {...}}` in
//! both directions. Incoming envelopes with an unknown action or a
//! non-object message fail to parse and are skipped by the connection loop.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::{Asset, AssetId, HistoryPoint};

/// Messages received from clients.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "message", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request the asset catalog. The message body must be an object but
    /// its content is not inspected.
    Assets(serde_json::Map<String, serde_json::Value>),

    /// Request history plus a live stream for one asset.
    Subscribe(SubscribePayload),
}

#[derive(Debug, Deserialize)]
pub struct SubscribePayload {
    #[serde(rename = "assetId")]
    pub asset_id: Option<i64>,
}

/// Messages sent to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "action", content = "message", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to the `assets` action.
    Assets { assets: Vec<AssetDto> },

    /// First reply to the `subscribe` action, newest point first.
    AssetHistory { points: Vec<PointDto> },

    /// Notification about a new point on the subscribed asset.
    Point(PointDto),
}

impl ServerMessage {
    pub fn assets(assets: &[Asset]) -> Self {
        Self::Assets {
            assets: assets.iter().map(AssetDto::from).collect(),
        }
    }

    pub fn asset_history(points: &[HistoryPoint]) -> Self {
        Self::AssetHistory {
            points: points.iter().map(PointDto::from).collect(),
        }
    }

    pub fn point(point: &HistoryPoint) -> Self {
        Self::Point(PointDto::from(point))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetDto {
    pub id: AssetId,
    pub name: String,
}

impl From<&Asset> for AssetDto {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            name: asset.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PointDto {
    #[serde(rename = "assetId")]
    pub asset_id: AssetId,
    #[serde(rename = "assetName")]
    pub asset_name: String,
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Rate value as a JSON number.
    pub value: f64,
}

impl From<&HistoryPoint> for PointDto {
    fn from(point: &HistoryPoint) -> Self {
        Self {
            asset_id: point.asset.id,
            asset_name: point.asset.symbol.clone(),
            time: point.timestamp,
            value: point.value.to_f64().unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_assets_action() {
        let msg: ClientMessage = serde_json::from_str(r#"{"action":"assets","message":{}}"#)
            .expect("valid assets action");
        assert!(matches!(msg, ClientMessage::Assets(_)));
    }

    #[test]
    fn parses_subscribe_action() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"action":"subscribe","message":{"assetId":2}}"#)
                .expect("valid subscribe action");

        match msg {
            ClientMessage::Subscribe(payload) => assert_eq!(payload.asset_id, Some(2)),
            other => panic!("expected subscribe, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_action() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"action":"nope","message":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_object_message() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"action":"assets","message":1}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<ClientMessage>(r#"{"action":"assets"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn encodes_assets_reply() {
        let assets = vec![Asset::new(1, "EURUSD"), Asset::new(2, "USDJPY")];
        let json = serde_json::to_string(&ServerMessage::assets(&assets)).unwrap();

        assert_eq!(
            json,
            r#"{"action":"assets","message":{"assets":[{"id":1,"name":"EURUSD"},{"id":2,"name":"USDJPY"}]}}"#
        );
    }

    #[test]
    fn encodes_history_reply() {
        let asset = Asset::new(1, "EURUSD");
        let points = vec![HistoryPoint::new(asset, 100, dec!(1.5))];
        let json = serde_json::to_string(&ServerMessage::asset_history(&points)).unwrap();

        assert_eq!(
            json,
            r#"{"action":"asset_history","message":{"points":[{"assetId":1,"assetName":"EURUSD","time":100,"value":1.5}]}}"#
        );
    }

    #[test]
    fn encodes_point_notification() {
        let asset = Asset::new(3, "GBPUSD");
        let point = HistoryPoint::new(asset, 200, dec!(1.25));
        let json = serde_json::to_string(&ServerMessage::point(&point)).unwrap();

        assert_eq!(
            json,
            r#"{"action":"point","message":{"assetId":3,"assetName":"GBPUSD","time":200,"value":1.25}}"#
        );
    }
}
