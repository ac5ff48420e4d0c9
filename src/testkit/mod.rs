//! Fixtures and harnesses for integration tests.
//!
//! Enabled via the `testkit` cargo feature; the integration tests depend
//! on the crate with that feature turned on.

use std::net::SocketAddr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::app::AppState;
use crate::domain::{Asset, HistoryPoint};
use crate::error::Result;
use crate::server::WsServer;

pub fn asset(id: i64, symbol: &str) -> Asset {
    Asset::new(id, symbol)
}

pub fn point(asset: &Asset, timestamp: i64, value: Decimal) -> HistoryPoint {
    HistoryPoint::new(asset.clone(), timestamp, value)
}

/// Build a JSONP feed body from `(symbol, bid, ask)` triples.
pub fn feed_body(rates: &[(&str, f64, f64)]) -> Vec<u8> {
    let rates: Vec<String> = rates
        .iter()
        .map(|(symbol, bid, ask)| format!(r#"{{"Symbol":"{symbol}","Bid":{bid},"Ask":{ask}}}"#))
        .collect();

    format!(r#"null({{"Rates":[{}]}});"#, rates.join(",")).into_bytes()
}

/// A service instance bound to an ephemeral loopback port.
///
/// The crawler is not started; tests drive the store and the channels
/// directly through `state`.
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    server: JoinHandle<()>,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let state = Arc::new(AppState::new());

        let server = WsServer::bind("127.0.0.1", 0).await?;
        let addr = server.local_addr()?;

        let handle = tokio::spawn({
            let state = Arc::clone(&state);
            async move {
                let _ = server.run(state).await;
            }
        });

        Ok(Self {
            addr,
            state,
            server: handle,
        })
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Serve `body` as an HTTP 200 response for every request.
///
/// A canned responder for crawler tests; aborting the returned handle
/// shuts it down.
pub async fn spawn_feed_server(body: Vec<u8>) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let body = body.clone();

            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 512];

                // Drain the request head; its content is irrelevant.
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            head.extend_from_slice(&buf[..n]);
                            if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let response_head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(response_head.as_bytes()).await;
                let _ = stream.write_all(&body).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    Ok((addr, handle))
}
