//! WebSocket server: listener lifecycle and accept loop.

mod connection;
pub mod messages;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::Result;

pub struct WsServer {
    listener: TcpListener,
}

impl WsServer {
    /// Bind the listener. Port 0 picks an ephemeral port.
    pub async fn bind(host: &str, port: u16) -> Result<Self> {
        let listener = TcpListener::bind((host, port)).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is cancelled.
    ///
    /// Each connection runs in its own task; a connection error closes
    /// that connection only.
    pub async fn run(self, state: Arc<AppState>) -> Result<()> {
        info!(addr = %self.local_addr()?, "Listening for websocket connections");

        loop {
            let (stream, peer) = self.listener.accept().await?;
            let state = Arc::clone(&state);

            tokio::spawn(async move {
                if let Err(err) = connection::serve(stream, state).await {
                    warn!(%peer, error = %err, "Connection closed with error");
                }
            });
        }
    }
}
