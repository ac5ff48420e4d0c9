//! Assetsrates - real-time asset rates over WebSockets.
//!
//! This crate provides a small streaming service: a background crawler polls
//! an upstream rates feed once per second, parsed points are kept in an
//! in-memory history store and fanned out through an in-process pub/sub
//! layer to WebSocket subscribers.
//!
//! # Architecture
//!
//! - **`crawler`** - Upstream feed polling and payload parsing
//! - **`storage`** - Asset catalog and per-asset rate history
//! - **`pubsub`** - Channel fan-out from the crawler to subscribers
//! - **`server`** - The WebSocket API (`assets` / `subscribe` actions)
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files with env overrides
//! - [`domain`] - Core types: assets, history points
//! - [`error`] - Error types for the crate
//! - [`app`] - Application orchestration
//!
//! # Example
//!
//! ```no_run
//! use assetsrates::app::App;
//! use assetsrates::config::Config;
//!
//! # async fn run() -> assetsrates::error::Result<()> {
//! let config = Config::load(None)?;
//! App::run(config).await
//! # }
//! ```

pub mod app;
pub mod config;
pub mod crawler;
pub mod domain;
pub mod error;
pub mod pubsub;
pub mod server;
pub mod storage;

#[cfg(feature = "testkit")]
pub mod testkit;
