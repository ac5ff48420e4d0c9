//! App orchestration module.
//!
//! Wires the store, the pub/sub layer, the crawler task and the WebSocket
//! server together and runs them until shutdown.

use std::sync::Arc;

use tracing::info;

use crate::app::AppState;
use crate::config::Config;
use crate::crawler::RatesCrawler;
use crate::error::Result;
use crate::server::WsServer;

/// Main application struct.
pub struct App;

impl App {
    /// Run the service until a fatal error.
    ///
    /// The crawler runs as a background task and is torn down when the
    /// server loop ends. Without a configured feed URL the service still
    /// serves the catalog and stored history.
    pub async fn run(config: Config) -> Result<()> {
        let state = Arc::new(AppState::new());

        let assets = state.store.assets().await;
        info!(assets = assets.len(), "Asset catalog seeded");

        let crawler = RatesCrawler::from_config(
            &config.rates,
            Arc::clone(&state.store),
            Arc::clone(&state.channels),
        );
        let crawler_task = crawler.map(|crawler| tokio::spawn(crawler.run()));

        let server = WsServer::bind(&config.server.host, config.server.port).await?;
        let result = server.run(state).await;

        if let Some(task) = crawler_task {
            task.abort();
        }

        result
    }
}
