use clap::Args;
use simwatch_console::config::{DEFAULT_ENDPOINT, ENDPOINT_ENV, LOG_FILE_ENV};
use simwatch_console::LogTarget;
use std::path::PathBuf;

pub(crate) mod console;
pub(crate) mod send;

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct EndpointArgs {
    /// WebSocket endpoint of the simwatch server
    #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Append diagnostics to this file (level from RUST_LOG, default info)
    #[arg(long, env = LOG_FILE_ENV)]
    pub log_file: Option<PathBuf>,
}

impl EndpointArgs {
    /// Log file if given, `fallback` otherwise.
    pub(crate) fn log_target(&self, fallback: LogTarget) -> LogTarget {
        match &self.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None => fallback,
        }
    }
}
