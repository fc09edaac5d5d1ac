use crate::cmd::console::widgets::formatters::{kind_style, pretty_entry};
use ratatui::{
    layout::Rect,
    symbols::border,
    text::Line,
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};
use simwatch_console::{format_timestamp, LogEntry};

/// Renders a centered popup displaying the full log entry
pub(crate) fn render_inspect_popup(entry: &LogEntry, area: Rect, frame: &mut Frame) {
    // Center the popup at 80% of screen size
    let popup_width = (area.width as f32 * 0.8) as u16;
    let popup_height = (area.height as f32 * 0.8) as u16;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width,
        height: popup_height,
    };

    // Clear the area to create a complete overlay
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(
            " Entry {} ({} at {}) ",
            entry.index,
            entry.kind,
            format_timestamp(entry.timestamp)
        ))
        .title_style(kind_style(entry.kind))
        .border_set(border::DOUBLE);

    let inner_area = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let body = pretty_entry(&entry.message);
    let text_lines: Vec<Line> = body.lines().map(|line| Line::from(line.to_string())).collect();

    let paragraph = Paragraph::new(text_lines).wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner_area);
}
