use thiserror::Error;

/// Result type used across the crate.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors surfaced by the session, its connection and the request builder.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The endpoint address cannot be used as a WebSocket URL.
    #[error("invalid endpoint {url}: {message}")]
    InvalidEndpoint { url: String, message: String },

    /// A request was submitted while the socket was not open.
    #[error("connection is {state}, request not sent")]
    ConnectionNotOpen { state: crate::ConnectionState },

    /// The handshake with the server failed.
    #[error("failed to connect to {url}: {message}")]
    ConnectFailed { url: String, message: String },

    /// The open event did not arrive in time.
    #[error("connection to {url} not open after {ms}ms")]
    ConnectTimeout { url: String, ms: u64 },

    /// A numeric field did not parse.
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A coordinate is outside its valid range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A request spec or field that must not be empty was empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A request spec on the command line could not be parsed.
    #[error("invalid request spec {spec:?}: {message}")]
    InvalidRequestSpec { spec: String, message: String },

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to open log file: {0}")]
    LogFile(#[source] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
