use crate::error::{ConsoleError, ConsoleResult};

/// Endpoint the simwatch server exposes its live updates on.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:5000/api/updates";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "SIMWATCH_CONSOLE_URL";

/// Environment variable naming the diagnostics log file.
pub const LOG_FILE_ENV: &str = "SIMWATCH_CONSOLE_LOG_FILE";

/// Settings a [`crate::Session`] is created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    url: String,
}

impl SessionConfig {
    pub fn new(url: &str) -> ConsoleResult<Self> {
        Ok(Self {
            url: normalize_endpoint(url)?,
        })
    }

    /// Reads the endpoint from `SIMWATCH_CONSOLE_URL`, falling back to the default.
    pub fn from_env() -> ConsoleResult<Self> {
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Ok(Self::default()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Accepts `ws://` and `wss://` URLs; a bare `host:port/path` gets `ws://`.
pub fn normalize_endpoint(raw: &str) -> ConsoleResult<String> {
    let invalid = |message: &str| ConsoleError::InvalidEndpoint {
        url: raw.to_string(),
        message: message.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty address"));
    }

    let url = match trimmed.split_once("://") {
        Some((scheme, _)) if scheme.eq_ignore_ascii_case("ws") => trimmed.to_string(),
        Some((scheme, _)) if scheme.eq_ignore_ascii_case("wss") => trimmed.to_string(),
        Some((scheme, _)) => {
            return Err(invalid(&format!("unsupported scheme {}", scheme)));
        }
        None => format!("ws://{}", trimmed),
    };

    let host = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    if host.is_empty() || host.starts_with('/') {
        return Err(invalid("missing host"));
    }

    Ok(url)
}
