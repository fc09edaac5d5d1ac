use ratatui::style::{Color, Modifier, Style};
use simwatch_console::{ConnectionState, LogKind};

pub(crate) fn truncate_message(msg: &str, max_len: usize) -> String {
    let len = msg.chars().count();
    if len <= max_len {
        format!("{:<width$}", msg, width = max_len)
    } else {
        let truncated: String = msg.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

pub(crate) fn kind_style(kind: LogKind) -> Style {
    match kind {
        LogKind::Open => Style::default().fg(Color::Green),
        LogKind::Message => Style::default().fg(Color::Cyan),
        LogKind::Request => Style::default().fg(Color::Blue),
        LogKind::Closed => Style::default().fg(Color::Yellow),
        LogKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        LogKind::Info => Style::default(),
    }
}

pub(crate) fn connection_style(state: ConnectionState) -> Style {
    match state {
        ConnectionState::Connecting => Style::default().fg(Color::Yellow),
        ConnectionState::Open => Style::default().fg(Color::Green),
        ConnectionState::Closed => Style::default().fg(Color::Red),
    }
}

/// Splits `"<label> <json>"` entries and pretty-prints the JSON part.
/// Anything else is returned unchanged.
pub(crate) fn pretty_entry(message: &str) -> String {
    if let Some((label, rest)) = message.split_once(' ') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(rest) {
            if value.is_object() || value.is_array() {
                if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                    return format!("{}\n{}", label, pretty);
                }
            }
        }
    }
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("abc", 5), "abc  ");
        assert_eq!(truncate_message("abcdefgh", 6), "abc...");
        assert_eq!(truncate_message("żółwżółw", 5), "żó...");
    }

    #[test]
    fn test_pretty_entry() {
        let pretty = pretty_entry(r#"message {"type":"status","payload":{"req_id":"0"}}"#);
        assert!(pretty.starts_with("message\n{\n"));
        assert!(pretty.contains("\"req_id\": \"0\""));

        assert_eq!(pretty_entry("connection open"), "connection open");
        assert_eq!(pretty_entry("message 42"), "message 42");
        assert_eq!(pretty_entry("message not json"), "message not json");
    }
}
