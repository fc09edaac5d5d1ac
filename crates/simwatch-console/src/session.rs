use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::SessionConfig;
use crate::connection::{Connection, ConnectionEvent, ConnectionState};
use crate::error::{ConsoleError, ConsoleResult};
use crate::log_sink::{LogKind, LogSink};
use crate::request::{Bounds, Payload, Request, RequestBuilder};

/// One harness session: the socket, the request counter and the log.
///
/// Created by [`Session::connect`] and torn down by [`Session::close`] or drop.
/// Every submit appends exactly one log entry: `request <json>` when the frame
/// was queued, an `error` entry otherwise.
pub struct Session {
    connection: Connection,
    requests: RequestBuilder,
    log: LogSink,
    opened: bool,
    terminated: bool,
}

impl Session {
    /// Starts connecting. The `connection open` entry is logged once the open
    /// event has been drained with [`Session::poll_events`] or a wait.
    pub fn connect(config: &SessionConfig) -> ConsoleResult<Self> {
        let log = LogSink::new();
        let connection = Connection::open(config.url())?;
        debug!(url = config.url(), "session started");
        Ok(Self {
            connection,
            requests: RequestBuilder::new(),
            log,
            opened: false,
            terminated: false,
        })
    }

    pub fn url(&self) -> &str {
        self.connection.url()
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn log(&self) -> &LogSink {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Id the next accepted request will carry.
    pub fn next_request_id(&self) -> u64 {
        self.requests.peek_id()
    }

    /// Validates, numbers and queues one request.
    ///
    /// Pending socket events are logged first, so the request entry never
    /// lands ahead of the open event or a message that arrived before it.
    pub fn submit(&mut self, payload: Payload) -> ConsoleResult<Request> {
        self.poll_events();

        let request = match self.requests.build(payload) {
            Ok(request) => request,
            Err(e) => {
                self.log
                    .append(LogKind::Error, format!("request rejected: {}", e));
                return Err(e);
            }
        };

        let sent = self
            .ensure_open()
            .and_then(|_| request.to_json())
            .and_then(|json| self.connection.queue_text(json.clone()).map(|_| json));

        match sent {
            Ok(json) => {
                debug!(id = %request.id, kind = %request.request_type, "request queued");
                self.log.append(LogKind::Request, format!("request {}", json));
                Ok(request)
            }
            Err(e) => {
                self.log.append(
                    LogKind::Error,
                    format!("request {} not sent: {}", request.id, e),
                );
                Err(e)
            }
        }
    }

    pub fn submit_bounds(&mut self, bounds: Bounds) -> ConsoleResult<Request> {
        self.submit(Payload::Bounds(bounds))
    }

    /// Parses raw bounds fields; unparsable input is logged and rejected.
    pub fn submit_bounds_input(
        &mut self,
        sw_lat: &str,
        sw_lng: &str,
        ne_lat: &str,
        ne_lng: &str,
    ) -> ConsoleResult<Request> {
        self.poll_events();
        match Bounds::parse(sw_lat, sw_lng, ne_lat, ne_lng) {
            Ok(bounds) => self.submit_bounds(bounds),
            Err(e) => {
                self.log
                    .append(LogKind::Error, format!("request rejected: {}", e));
                Err(e)
            }
        }
    }

    pub fn submit_pilot_filter(&mut self, query: impl Into<String>) -> ConsoleResult<Request> {
        self.submit(Payload::PilotFilter {
            query: query.into(),
        })
    }

    pub fn submit_airport_filter(&mut self, include_uncontrolled: bool) -> ConsoleResult<Request> {
        self.submit(Payload::AirportFilter {
            include_uncontrolled,
        })
    }

    pub fn subscribe(&mut self, id: impl Into<String>) -> ConsoleResult<Request> {
        self.submit(Payload::Subscribe { id: id.into() })
    }

    pub fn unsubscribe(&mut self, id: impl Into<String>) -> ConsoleResult<Request> {
        self.submit(Payload::Unsubscribe { id: id.into() })
    }

    /// Logs a free-form line, e.g. a UI-side notice.
    pub fn note(&mut self, message: impl Into<String>) {
        self.log.append(LogKind::Info, message);
    }

    /// Drains pending socket events into the log without blocking.
    /// Returns how many were recorded.
    pub fn poll_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.connection.events().try_recv() {
            self.record(event);
            count += 1;
        }
        count
    }

    /// Blocks up to `timeout` for one socket event. Returns whether one arrived.
    pub fn wait_event(&mut self, timeout: Duration) -> bool {
        match self.connection.events().recv_timeout(timeout) {
            Ok(event) => {
                self.record(event);
                true
            }
            Err(_) => false,
        }
    }

    /// Waits for the open event, logging everything that arrives meanwhile.
    pub fn wait_open(&mut self, timeout: Duration) -> ConsoleResult<()> {
        let deadline = Instant::now() + timeout;
        self.poll_events();
        loop {
            if self.opened && !self.terminated {
                return Ok(());
            }
            if self.terminated {
                let message = self
                    .log
                    .entries()
                    .iter()
                    .rev()
                    .find(|entry| matches!(entry.kind, LogKind::Error | LogKind::Closed))
                    .map(|entry| entry.message.clone())
                    .unwrap_or_else(|| "connection closed".to_string());
                return Err(ConsoleError::ConnectFailed {
                    url: self.url().to_string(),
                    message,
                });
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.wait_event(remaining) {
                return Err(ConsoleError::ConnectTimeout {
                    url: self.url().to_string(),
                    ms: timeout.as_millis() as u64,
                });
            }
        }
    }

    /// Logs socket events for `duration`, then returns.
    pub fn collect_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            // A terminated socket drops its sender, so waiting would spin
            if !self.wait_event(remaining) && self.terminated {
                break;
            }
        }
    }

    /// Closes the socket, records the final events and hands back the log.
    pub fn close(mut self, grace: Duration) -> LogSink {
        self.connection.request_close();
        let deadline = Instant::now() + grace;
        self.poll_events();
        while !self.terminated {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.wait_event(remaining) {
                break;
            }
        }

        let Session {
            connection, log, ..
        } = self;
        connection.close();
        log
    }

    /// Open means the open event has been logged and no terminal one has.
    fn ensure_open(&self) -> ConsoleResult<()> {
        let state = match (self.opened, self.terminated) {
            (true, false) => return Ok(()),
            (false, false) => ConnectionState::Connecting,
            (_, true) => ConnectionState::Closed,
        };
        Err(ConsoleError::ConnectionNotOpen { state })
    }

    fn record(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened { at } => {
                self.opened = true;
                self.log.append_at(LogKind::Open, "connection open", at);
            }
            ConnectionEvent::Message { data, at } => {
                self.log
                    .append_at(LogKind::Message, format!("message {}", data), at);
            }
            ConnectionEvent::Closed { reason, at } => {
                self.terminated = true;
                let message = match reason {
                    Some(reason) => format!("connection closed: {}", reason),
                    None => "connection closed".to_string(),
                };
                self.log.append_at(LogKind::Closed, message, at);
            }
            ConnectionEvent::Failed { error, at } => {
                self.terminated = true;
                self.log
                    .append_at(LogKind::Error, format!("connection failed: {}", error), at);
            }
        }
    }
}
