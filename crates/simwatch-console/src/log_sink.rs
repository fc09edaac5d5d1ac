use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Open,
    Message,
    Request,
    Closed,
    Error,
    Info,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Open => "open",
            LogKind::Message => "message",
            LogKind::Request => "request",
            LogKind::Closed => "closed",
            LogKind::Error => "error",
            LogKind::Info => "info",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for LogKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "open" => Ok(LogKind::Open),
            "message" => Ok(LogKind::Message),
            "request" => Ok(LogKind::Request),
            "closed" => Ok(LogKind::Closed),
            "error" => Ok(LogKind::Error),
            "info" => Ok(LogKind::Info),
            _ => Err(serde::de::Error::custom("invalid log kind")),
        }
    }
}

/// A single immutable log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 1-based position since the last clear.
    pub index: u64,
    /// Nanoseconds since the session started.
    pub timestamp: u64,
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub(crate) fn new(
        index: u64,
        started_at: Instant,
        timestamp: Instant,
        kind: LogKind,
        message: String,
    ) -> Self {
        let timestamp_nanos = timestamp
            .saturating_duration_since(started_at)
            .as_nanos() as u64;
        Self {
            index,
            timestamp: timestamp_nanos,
            kind,
            message,
        }
    }
}

/// Ordered, append-only log. Only [`LogSink::clear`] removes entries.
#[derive(Debug)]
pub struct LogSink {
    started_at: Instant,
    entries: Vec<LogEntry>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started_at: Instant) -> Self {
        Self {
            started_at,
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, kind: LogKind, message: impl Into<String>) -> &LogEntry {
        self.append_at(kind, message, Instant::now())
    }

    /// Appends an entry stamped with the time its event happened.
    pub fn append_at(
        &mut self,
        kind: LogKind,
        message: impl Into<String>,
        at: Instant,
    ) -> &LogEntry {
        let index = self.entries.len() as u64 + 1;
        self.entries.push(LogEntry::new(
            index,
            self.started_at,
            at,
            kind,
            message.into(),
        ));
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&LogEntry> {
        self.entries.get(position)
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nanoseconds elapsed since the session started.
    pub fn elapsed_ns(&self) -> u64 {
        self.started_at.elapsed().as_nanos() as u64
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut log = LogSink::new();
        log.append(LogKind::Open, "connection open");
        log.append(LogKind::Message, "message hello");
        log.append(LogKind::Message, "message hello");

        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            ["connection open", "message hello", "message hello"]
        );
        assert_eq!(
            log.entries().iter().map(|e| e.index).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }

    #[test]
    fn test_clear_empties_any_length() {
        let mut log = LogSink::new();
        for i in 0..100 {
            log.append(LogKind::Info, format!("line {i}"));
        }
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);

        log.clear();
        assert!(log.is_empty());

        assert_eq!(log.append(LogKind::Info, "again").index, 1);
    }

    #[test]
    fn test_timestamps_are_relative_to_start() {
        let start = Instant::now();
        let mut log = LogSink::starting_at(start);
        let entry = log.append_at(LogKind::Info, "x", start + Duration::from_millis(1500));
        assert_eq!(entry.timestamp, 1_500_000_000);

        let before = log.append_at(LogKind::Info, "y", start);
        assert_eq!(before.timestamp, 0);
    }

    #[test]
    fn test_log_kind_json() {
        let entry = LogEntry {
            index: 1,
            timestamp: 0,
            kind: LogKind::Request,
            message: "request {}".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""kind":"request""#));
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
