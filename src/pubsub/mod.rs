//! In-process pub/sub fan-out keyed by asset symbol.
//!
//! The crawler publishes every stored point to its asset's channel; each
//! WebSocket subscription drains a bounded queue. A slow subscriber only
//! loses its own points, it never blocks the publisher or its peers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::HistoryPoint;

/// Queue capacity per subscriber.
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 100;

/// Registry of channels and their subscriber queues.
pub struct Channels {
    subscriptions: DashMap<String, HashMap<u64, mpsc::Sender<HistoryPoint>>>,
    next_id: AtomicU64,
}

impl Channels {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Subscribe to a channel.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes; a channel
    /// disappears from the registry with its last subscriber.
    pub fn subscribe(self: &Arc<Self>, channel: &str) -> Subscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.subscriptions
            .entry(channel.to_string())
            .or_default()
            .insert(id, tx);

        Subscription {
            rx,
            channel: channel.to_string(),
            id,
            channels: Arc::clone(self),
        }
    }

    /// Deliver a point to every subscriber of `channel`.
    ///
    /// A full subscriber queue drops the point for that subscriber only.
    pub fn publish(&self, channel: &str, point: &HistoryPoint) {
        let Some(subscribers) = self.subscriptions.get(channel) else {
            return;
        };

        for tx in subscribers.values() {
            match tx.try_send(point.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!(channel, "Subscriber queue full, dropping point");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
    }

    /// Number of live subscriber queues for a channel.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscriptions
            .get(channel)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Number of channels with at least one subscriber.
    pub fn channel_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription draining one channel.
pub struct Subscription {
    rx: mpsc::Receiver<HistoryPoint>,
    channel: String,
    id: u64,
    channels: Arc<Channels>,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for the next published point.
    pub async fn recv(&mut self) -> Option<HistoryPoint> {
        self.rx.recv().await
    }

    /// Take an already-queued point, if any.
    pub fn try_recv(&mut self) -> Option<HistoryPoint> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Scoped so the shard guard is released before remove_if.
        {
            if let Some(mut subscribers) = self.channels.subscriptions.get_mut(&self.channel) {
                subscribers.remove(&self.id);
            }
        }

        self.channels
            .subscriptions
            .remove_if(&self.channel, |_, subscribers| subscribers.is_empty());
    }
}
