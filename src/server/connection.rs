//! Per-connection WebSocket session.
//!
//! # Connection Lifecycle
//!
//! 1. **Handshake**: the accepted TCP stream is upgraded via `accept_async`
//! 2. **Message Loop**: incoming frames are parsed and dispatched until
//!    close or error
//! 3. **Termination**: the subscription task and the writer task are torn
//!    down when the loop ends
//!
//! # Message Loop
//!
//! - **Text frames**: parsed as [`ClientMessage`]. Parse failures are
//!   logged and skipped, the connection stays open.
//! - **Ping frames**: answered with Pong (keepalive).
//! - **Close frames**: terminate the loop gracefully.
//! - **Other frames**: silently ignored.
//!
//! At most one subscription task is live per connection; a new `subscribe`
//! action cancels the previous one before starting the next. All outbound
//! frames funnel through a single writer task so the history reply and
//! streamed points never interleave mid-frame.

use std::sync::Arc;

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};
use tracing::{debug, warn};
use uuid::Uuid;

use super::messages::{ClientMessage, ServerMessage};
use crate::app::AppState;
use crate::domain::AssetId;
use crate::error::Result;

/// Outbound frame queue depth per connection.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Handle one accepted TCP connection for its whole lifetime.
pub async fn serve(stream: TcpStream, state: Arc<AppState>) -> Result<()> {
    let conn = Uuid::new_v4();
    let ws = accept_async(stream).await?;

    debug!(%conn, "New websocket connection");

    let (mut sink, mut stream) = ws.split();
    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE_CAPACITY);

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let mut subscription: Option<JoinHandle<()>> = None;

    let result = read_loop(&mut stream, &state, &tx, &mut subscription, conn).await;

    if let Some(task) = subscription.take() {
        debug!(%conn, "Cancel subscription task");
        task.abort();
    }

    // The writer exits once every sender is gone.
    drop(tx);
    let _ = writer.await;

    debug!(%conn, "Websocket connection closed");

    result
}

async fn read_loop(
    stream: &mut SplitStream<WebSocketStream<TcpStream>>,
    state: &Arc<AppState>,
    tx: &mpsc::Sender<Message>,
    subscription: &mut Option<JoinHandle<()>>,
    conn: Uuid,
) -> Result<()> {
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(raw) => {
                dispatch(&raw, state, tx, subscription, conn).await;
            }
            Message::Ping(payload) => {
                let _ = tx.send(Message::Pong(payload)).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    Ok(())
}

async fn dispatch(
    raw: &str,
    state: &Arc<AppState>,
    tx: &mpsc::Sender<Message>,
    subscription: &mut Option<JoinHandle<()>>,
    conn: Uuid,
) {
    let request = match serde_json::from_str::<ClientMessage>(raw) {
        Ok(request) => request,
        Err(err) => {
            debug!(%conn, error = %err, "Skipping invalid message");
            return;
        }
    };

    match request {
        ClientMessage::Assets(_) => {
            debug!(%conn, "Send available assets");
            let assets = state.store.assets().await;
            send(tx, ServerMessage::assets(&assets)).await;
        }
        ClientMessage::Subscribe(payload) => {
            if let Some(task) = subscription.take() {
                debug!(%conn, "Cancel subscription task");
                task.abort();
            }

            let state = Arc::clone(state);
            let tx = tx.clone();
            *subscription = Some(tokio::spawn(async move {
                run_subscription(payload.asset_id, state, tx, conn).await;
            }));
        }
    }
}

/// Send the stored history for the asset, then stream new points until the
/// task is cancelled or the connection goes away.
async fn run_subscription(
    asset_id: Option<i64>,
    state: Arc<AppState>,
    tx: mpsc::Sender<Message>,
    conn: Uuid,
) {
    let asset = match asset_id {
        Some(id) => state.store.asset_by_id(AssetId::new(id)).await,
        None => None,
    };

    let Some(asset) = asset else {
        debug!(%conn, asset_id = ?asset_id, "Ignoring subscribe for unknown asset");
        return;
    };

    debug!(%conn, asset = %asset.symbol, "Send history");
    let history = state.store.history(&asset).await;
    if !send(&tx, ServerMessage::asset_history(&history)).await {
        return;
    }

    debug!(%conn, asset = %asset.symbol, "Subscribe for updates");
    let mut sub = state.channels.subscribe(&asset.symbol);

    while let Some(point) = sub.recv().await {
        if !send(&tx, ServerMessage::point(&point)).await {
            break;
        }
    }
}

/// Queue an outbound message. Returns false when the connection is gone.
async fn send(tx: &mpsc::Sender<Message>, message: ServerMessage) -> bool {
    let json = match serde_json::to_string(&message) {
        Ok(json) => json,
        Err(err) => {
            warn!(error = %err, "Failed to encode outbound message");
            return true;
        }
    };

    tx.send(Message::Text(json)).await.is_ok()
}
