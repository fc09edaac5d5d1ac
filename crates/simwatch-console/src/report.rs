use prettytable::{Cell, Row, Table};
use serde::Serialize;

use crate::error::ConsoleResult;
use crate::log_sink::{LogEntry, LogSink};
use crate::{format_timestamp, Format};

/// JSON shape of a printed session log.
#[derive(Debug, Serialize)]
pub struct LogReport<'a> {
    pub url: &'a str,
    pub entries: &'a [LogEntry],
}

/// Renders the session log in the requested format.
pub fn render_log(url: &str, log: &LogSink, format: Format) -> ConsoleResult<String> {
    match format {
        Format::Table => {
            if log.is_empty() {
                return Ok("No log entries.".to_string());
            }

            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("#"),
                Cell::new("Time"),
                Cell::new("Kind"),
                Cell::new("Entry"),
            ]));

            for entry in log.entries() {
                table.add_row(Row::new(vec![
                    Cell::new(&entry.index.to_string()),
                    Cell::new(&format_timestamp(entry.timestamp)),
                    Cell::new(entry.kind.as_str()),
                    Cell::new(&entry.message),
                ]));
            }

            Ok(format!("Session log for {}:\n{}", url, table))
        }
        Format::Json => {
            let report = LogReport {
                url,
                entries: log.entries(),
            };
            Ok(serde_json::to_string(&report)?)
        }
        Format::JsonPretty => {
            let report = LogReport {
                url,
                entries: log.entries(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}
