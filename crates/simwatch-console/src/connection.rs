use crossbeam_channel::{unbounded, Receiver, Sender as CbSender};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use crate::error::{ConsoleError, ConsoleResult};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Lifecycle of the single session socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            _ => ConnectionState::Closed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Connecting => 0,
            ConnectionState::Open => 1,
            ConnectionState::Closed => 2,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Socket events delivered to the owner of the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Opened {
        at: Instant,
    },
    Message {
        data: String,
        at: Instant,
    },
    Closed {
        reason: Option<String>,
        at: Instant,
    },
    Failed {
        error: String,
        at: Instant,
    },
}

#[derive(Debug, Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ConnectionState::Connecting.as_u8())))
    }

    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: ConnectionState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

/// Handle to one WebSocket connection driven on a dedicated runtime.
///
/// The socket task is the only writer to the socket. Outbound frames reach it
/// through an unbounded channel; events come back through [`Connection::events`].
pub struct Connection {
    url: String,
    state: SharedState,
    outbound: Option<UnboundedSender<String>>,
    events: Receiver<ConnectionEvent>,
    runtime: Option<Runtime>,
}

impl Connection {
    /// Starts connecting to `url` and returns immediately in the
    /// [`ConnectionState::Connecting`] state.
    pub fn open(url: &str) -> ConsoleResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("simwatch-socket")
            .enable_all()
            .build()
            .map_err(ConsoleError::Runtime)?;

        let state = SharedState::new();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<String>();
        let (events_tx, events_rx) = unbounded::<ConnectionEvent>();

        runtime.spawn(run_socket(
            url.to_string(),
            state.clone(),
            outbound_rx,
            events_tx,
        ));

        Ok(Self {
            url: url.to_string(),
            state,
            outbound: Some(outbound_tx),
            events: events_rx,
            runtime: Some(runtime),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Queues one text frame. Fails if the socket is not open.
    pub fn send_text(&self, text: String) -> ConsoleResult<()> {
        let state = self.state.get();
        if state != ConnectionState::Open {
            return Err(ConsoleError::ConnectionNotOpen { state });
        }
        self.queue_text(text)
    }

    /// Hands a frame to the socket task without checking the shared state.
    /// Callers that track the open event themselves use this directly.
    pub(crate) fn queue_text(&self, text: String) -> ConsoleResult<()> {
        let outbound = self
            .outbound
            .as_ref()
            .ok_or(ConsoleError::ConnectionNotOpen {
                state: ConnectionState::Closed,
            })?;

        // The socket task drops its receiver when it exits
        outbound
            .send(text)
            .map_err(|_| ConsoleError::ConnectionNotOpen {
                state: ConnectionState::Closed,
            })
    }

    /// Receiver of socket events, in arrival order.
    pub fn events(&self) -> &Receiver<ConnectionEvent> {
        &self.events
    }

    /// Asks the socket task to send a close frame. Further sends fail.
    /// The [`ConnectionEvent::Closed`] event follows once the task exits.
    pub fn request_close(&mut self) {
        // Dropping the sender tells the socket task to send a close frame
        self.outbound.take();
    }

    /// Closes the socket and stops the runtime.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.request_close();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        }
        self.state.set(ConnectionState::Closed);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_socket(
    url: String,
    state: SharedState,
    mut outbound: UnboundedReceiver<String>,
    events: CbSender<ConnectionEvent>,
) {
    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            warn!(%url, error = %e, "websocket connect failed");
            state.set(ConnectionState::Closed);
            let _ = events.send(ConnectionEvent::Failed {
                error: e.to_string(),
                at: Instant::now(),
            });
            return;
        }
    };

    info!(%url, "websocket connection open");
    // Queued before the state flips, so an open state implies a pending event
    let _ = events.send(ConnectionEvent::Opened { at: Instant::now() });
    state.set(ConnectionState::Open);

    let (mut sink, mut stream) = socket.split();

    let reason = loop {
        tokio::select! {
            frame = outbound.recv() => {
                match frame {
                    Some(text) => {
                        debug!(frame = %text, "sending frame");
                        if let Err(e) = sink.send(Message::text(text)).await {
                            warn!(error = %e, "websocket send failed");
                            break Some(format!("send failed: {}", e));
                        }
                    }
                    None => {
                        // Owner went away
                        state.set(ConnectionState::Closed);
                        let _ = sink.send(Message::Close(None)).await;
                        break None;
                    }
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let _ = events.send(ConnectionEvent::Message {
                            data: text.as_str().to_owned(),
                            at: Instant::now(),
                        });
                    }
                    Some(Ok(Message::Binary(data))) => {
                        let _ = events.send(ConnectionEvent::Message {
                            data: String::from_utf8_lossy(&data).into_owned(),
                            at: Instant::now(),
                        });
                    }
                    Some(Ok(Message::Close(frame))) => {
                        break frame.map(|f| format!("{} {}", u16::from(f.code), f.reason.as_str()));
                    }
                    Some(Ok(_)) => {} // ping/pong are answered by tungstenite
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket read failed");
                        break Some(e.to_string());
                    }
                    None => break None,
                }
            }
        }
    };

    state.set(ConnectionState::Closed);
    info!(%url, reason = ?reason, "websocket connection closed");
    let _ = events.send(ConnectionEvent::Closed {
        reason,
        at: Instant::now(),
    });
}
