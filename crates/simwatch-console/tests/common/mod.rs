//! Local websocket servers shared by the integration tests.

use crossbeam_channel::Receiver;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Starts a local server that records every text frame and answers each
/// request with a status message, the way the simwatch updates endpoint does.
pub fn spawn_status_server() -> (String, Receiver<String>) {
    let (addr_tx, addr_rx) = std::sync::mpsc::channel();
    let (frames_tx, frames_rx) = crossbeam_channel::unbounded::<String>();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build server runtime");

        rt.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind test server");
            addr_tx
                .send(listener.local_addr().unwrap())
                .expect("Failed to report server address");

            while let Ok((stream, _)) = listener.accept().await {
                let frames_tx = frames_tx.clone();
                tokio::spawn(async move {
                    let Ok(mut ws) = accept_async(stream).await else {
                        return;
                    };
                    while let Some(Ok(msg)) = ws.next().await {
                        if let Message::Text(text) = msg {
                            let text = text.as_str().to_owned();
                            let _ = frames_tx.send(text.clone());
                            let req_id = serde_json::from_str::<Value>(&text)
                                .ok()
                                .and_then(|v| v["id"].as_str().map(str::to_owned))
                                .unwrap_or_default();
                            let reply = json!({
                                "id": "",
                                "type": "status",
                                "payload": { "status": "ok", "req_id": req_id }
                            });
                            if ws.send(Message::text(reply.to_string())).await.is_err() {
                                break;
                            }
                        }
                    }
                });
            }
        });
    });

    let addr = addr_rx.recv().expect("Test server did not start");
    (format!("ws://{}/api/updates", addr), frames_rx)
}

/// Address of a port nothing listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("ws://127.0.0.1:{port}/api/updates")
}
