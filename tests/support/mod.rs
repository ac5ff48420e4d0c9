#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub async fn connect(url: &str) -> WsClient {
    let (ws, _) = connect_async(url).await.expect("connect to test app");
    ws
}

pub async fn send_text(ws: &mut WsClient, raw: &str) {
    ws.send(Message::Text(raw.to_string()))
        .await
        .expect("send frame");
}

/// Receive the next text frame, failing the test after a timeout.
pub async fn recv_text(ws: &mut WsClient) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .expect("websocket error");

        if let Message::Text(text) = frame {
            return text;
        }
    }
}

pub async fn recv_json(ws: &mut WsClient) -> Value {
    serde_json::from_str(&recv_text(ws).await).expect("valid json frame")
}

/// Assert that no frame arrives within `wait`.
pub async fn assert_silent(ws: &mut WsClient, wait: Duration) {
    let result = tokio::time::timeout(wait, ws.next()).await;
    assert!(result.is_err(), "expected no frame, got {result:?}");
}

/// Poll `cond` until it holds, failing the test after two seconds.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2s");
}
