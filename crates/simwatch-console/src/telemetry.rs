use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{ConsoleError, ConsoleResult};

/// Where diagnostic tracing output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber is installed.
    Off,
    Stderr,
    /// Appended to the file; the terminal UI must not write to stderr.
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the `info` default.
///
/// Only the first installed subscriber takes effect; later calls keep it and
/// note the refusal at debug level. A file target is still opened, so an
/// unwritable path is reported either way.
pub fn init_tracing(target: &LogTarget) -> ConsoleResult<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
            note_installed(installed);
            Ok(())
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(ConsoleError::LogFile)?;
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            note_installed(installed);
            Ok(())
        }
    }
}

fn note_installed<E: std::fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        debug!(error = %e, "tracing subscriber already installed, keeping it");
    }
}
