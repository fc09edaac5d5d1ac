use crate::cmd::console::widgets::formatters::{kind_style, truncate_message};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::Text,
    widgets::{Block, Cell, HighlightSpacing, Row, Table, TableState},
    Frame,
};
use simwatch_console::{format_timestamp, LogEntry};

fn panel_block(title: String, is_focused: bool) -> Block<'static> {
    let border_set = if is_focused {
        border::THICK
    } else {
        border::PLAIN
    };

    Block::bordered()
        .title(title)
        .border_set(border_set)
        .style(if is_focused {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        })
}

/// Renders a placeholder when the log is empty
pub(crate) fn render_logs_placeholder(message: &str, area: Rect, frame: &mut Frame, is_focused: bool) {
    let block = panel_block(" Log ".to_string(), is_focused);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let message_width = message.len() as u16;
    let x = inner_area.x + (inner_area.width.saturating_sub(message_width)) / 2;
    let y = inner_area.y + inner_area.height / 2;

    if x < inner_area.x + inner_area.width && y < inner_area.y + inner_area.height {
        frame
            .buffer_mut()
            .set_string(x, y, message, Style::default().fg(Color::DarkGray));
    }
}

/// Renders the session log, oldest entry first
pub(crate) fn render_logs_panel(
    entries: &[LogEntry],
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
    is_focused: bool,
) {
    let position = table_state.selected().map(|i| i + 1).unwrap_or(entries.len());
    let block = panel_block(
        format!(" Log [{}/{}] ", position, entries.len()),
        is_focused,
    );

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let available_width = inner_area.width.saturating_sub(2);
    let msg_width = (available_width.saturating_sub(30) as usize).max(20);

    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let header = Row::new(vec!["#", "Time", "Kind", "Entry"])
        .style(header_style)
        .height(1);

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let row = Row::new(vec![
                Cell::from(entry.index.to_string()),
                Cell::from(format_timestamp(entry.timestamp)),
                Cell::from(entry.kind.as_str()).style(kind_style(entry.kind)),
                Cell::from(truncate_message(&entry.message, msg_width)),
            ]);

            if !is_focused {
                row.style(Style::default().fg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(10), // MM:SS.mmm format
        Constraint::Length(8),
        Constraint::Min(20),
    ];

    let selected_row_style = if is_focused {
        Style::default()
            .add_modifier(Modifier::REVERSED)
            .bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(selected_row_style)
        .highlight_symbol(Text::from(">"))
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(table, inner_area, table_state);
}
