//! Background crawler polling the upstream rates feed.
//!
//! One poll cycle fetches the feed, parses points for catalog assets,
//! saves them to the store and publishes them to the pub/sub layer. Fetch
//! and parse failures are logged and the loop continues; the crawler never
//! takes the service down.

mod feed;

pub use feed::{parse_points, strip_jsonp, FeedNumber, FeedRate, FeedSnapshot};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::RatesConfig;
use crate::error::Result;
use crate::pubsub::Channels;
use crate::storage::HistoryStore;

pub struct RatesCrawler {
    http: HttpClient,
    url: String,
    period: Duration,
    store: Arc<dyn HistoryStore>,
    channels: Arc<Channels>,
}

impl RatesCrawler {
    /// Build a crawler from config.
    ///
    /// Returns `None` when no feed URL is configured; the rest of the
    /// service runs without live updates.
    pub fn from_config(
        config: &RatesConfig,
        store: Arc<dyn HistoryStore>,
        channels: Arc<Channels>,
    ) -> Option<Self> {
        let Some(url) = config.url.clone() else {
            error!("Rates feed URL is not configured, crawler is not started");
            return None;
        };

        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Some(Self {
            http,
            url,
            period: Duration::from_secs(config.poll_interval_secs),
            store,
            channels,
        })
    }

    /// Run the poll loop until the task is cancelled.
    pub async fn run(self) {
        info!(url = %self.url, period = ?self.period, "Start rates crawler");

        let mut ticker = interval(self.period);
        // A slow request delays the next tick instead of bursting.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let ts = Utc::now().timestamp();

            match self.poll_once(ts).await {
                Ok(saved) => debug!(points = saved, "Crawler tick complete"),
                Err(err) => error!(error = %err, url = %self.url, "Crawler tick failed"),
            }
        }
    }

    /// One fetch-parse-save-publish cycle, stamped with `ts`.
    ///
    /// Returns the number of points saved and published.
    pub async fn poll_once(&self, ts: i64) -> Result<usize> {
        debug!(url = %self.url, "New feed request");
        let raw = self.fetch().await?;

        let assets = self.store.assets().await;
        let points = parse_points(&raw, ts, &assets)?;

        if points.is_empty() {
            return Ok(0);
        }

        self.store.save_points(&points).await;

        for point in &points {
            self.channels.publish(&point.asset.symbol, point);
        }

        Ok(points.len())
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self.http.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
