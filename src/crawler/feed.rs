//! Upstream feed payload parsing.
//!
//! The feed answers with a JSONP-style body:
//! `null({"Rates":[{"Symbol":"EURUSD","Bid":1.07,"Ask":1.08},...]});`
//! The wrapper is stripped before JSON parsing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Asset, HistoryPoint};
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct FeedSnapshot {
    #[serde(rename = "Rates", default)]
    pub rates: Vec<FeedRate>,
}

#[derive(Debug, Deserialize)]
pub struct FeedRate {
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "Bid", default)]
    pub bid: Option<FeedNumber>,
    #[serde(rename = "Ask", default)]
    pub ask: Option<FeedNumber>,
}

/// Feed prices arrive either as JSON numbers or as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FeedNumber {
    Value(f64),
    Text(String),
}

impl FeedNumber {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            FeedNumber::Value(value) => Decimal::try_from(*value).ok(),
            FeedNumber::Text(text) => text.parse().ok(),
        }
    }
}

/// Strip surrounding whitespace and the JSONP wrapper, each if present.
pub fn strip_jsonp(raw: &[u8]) -> &[u8] {
    let mut body = trim_ascii(raw);

    if let Some(rest) = body.strip_prefix(b"null(".as_slice()) {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix(b");".as_slice()) {
        body = rest;
    }

    body
}

fn trim_ascii(mut raw: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = raw {
        if !first.is_ascii_whitespace() {
            break;
        }
        raw = rest;
    }
    while let [rest @ .., last] = raw {
        if !last.is_ascii_whitespace() {
            break;
        }
        raw = rest;
    }
    raw
}

/// Parse a raw feed body into points for known assets, stamped with `ts`.
///
/// Rates with unknown symbols are skipped. A missing or null bid/ask is
/// treated as zero; the point value is the bid/ask midpoint.
pub fn parse_points(raw: &[u8], ts: i64, assets: &[Asset]) -> Result<Vec<HistoryPoint>> {
    let snapshot: FeedSnapshot = serde_json::from_slice(strip_jsonp(raw))?;

    let by_symbol: HashMap<&str, &Asset> = assets
        .iter()
        .map(|asset| (asset.symbol.as_str(), asset))
        .collect();

    let mut points = Vec::new();

    for rate in &snapshot.rates {
        let Some(asset) = rate.symbol.as_deref().and_then(|s| by_symbol.get(s)) else {
            continue;
        };

        let bid = rate.bid.as_ref().and_then(FeedNumber::to_decimal).unwrap_or_default();
        let ask = rate.ask.as_ref().and_then(FeedNumber::to_decimal).unwrap_or_default();
        let value = (bid + ask) / Decimal::TWO;

        points.push(HistoryPoint::new((*asset).clone(), ts, value));
    }

    Ok(points)
}
