//! Test harness for the simwatch live updates endpoint.
//!
//! A [`Session`] owns one WebSocket connection, a request counter and an
//! append-only [`LogSink`]. Requests are JSON objects of the form
//! `{"id": "0", "type": "bounds", "payload": {...}}`; whatever the server
//! sends back is logged verbatim.
//!
//! ```no_run
//! use simwatch_console::{Bounds, LatLng, Session, SessionConfig};
//! use std::time::Duration;
//!
//! let config = SessionConfig::new("ws://localhost:5000/api/updates").unwrap();
//! let mut session = Session::connect(&config).unwrap();
//! session.wait_open(Duration::from_secs(3)).unwrap();
//!
//! session
//!     .submit_bounds(Bounds::new(LatLng::new(-10.0, 20.0), LatLng::new(5.0, 30.0)))
//!     .unwrap();
//! session.submit_pilot_filter("N123AB").unwrap();
//!
//! session.collect_for(Duration::from_secs(1));
//! for entry in session.log().entries() {
//!     println!("{}", entry.message);
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod log_sink;
pub mod report;
pub mod request;
pub mod session;
pub mod telemetry;

pub use config::{SessionConfig, DEFAULT_ENDPOINT};
pub use connection::{Connection, ConnectionEvent, ConnectionState};
pub use error::{ConsoleError, ConsoleResult};
pub use log_sink::{LogEntry, LogKind, LogSink};
pub use report::render_log;
pub use request::{Bounds, LatLng, Payload, Request, RequestBuilder, RequestType};
pub use session::Session;
pub use telemetry::{init_tracing, LogTarget};

/// Output format of a printed session log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
    JsonPretty,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            "json-pretty" | "json_pretty" => Ok(Format::JsonPretty),
            _ => Err(format!(
                "invalid format {:?}, expected table, json or json-pretty",
                s
            )),
        }
    }
}

/// Formats a timestamp in nanoseconds as MM:SS.mmm
pub fn format_timestamp(timestamp_ns: u64) -> String {
    let total_secs = timestamp_ns / 1_000_000_000;
    let millis = (timestamp_ns % 1_000_000_000) / 1_000_000;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}
