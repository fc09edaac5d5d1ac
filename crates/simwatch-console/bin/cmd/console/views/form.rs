use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use simwatch_console::ConnectionState;

use crate::cmd::console::state::{FormField, FormState};
use crate::cmd::console::widgets::formatters::connection_style;

fn field_line(form: &FormState, field: FormField, is_focused: bool) -> Line<'static> {
    let editing = is_focused && form.focused == field;
    let value = form.value(field).to_string();

    let value_span = if editing {
        Span::styled(
            format!("{}▏", value),
            Style::default().add_modifier(Modifier::REVERSED),
        )
    } else if value.is_empty() {
        Span::styled("(empty)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };

    let marker = if editing { "> " } else { "  " };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(
            format!("{:<10}", field.label()),
            Style::default().fg(Color::Yellow),
        ),
        value_span,
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(title.bold())
}

fn hint(text: String) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Renders the request form with the connection status on top
pub(crate) fn render_form_panel(
    form: &FormState,
    state: ConnectionState,
    url: &str,
    next_id: u64,
    area: Rect,
    frame: &mut Frame,
    is_focused: bool,
) {
    let block = Block::bordered()
        .title(" Request ")
        .border_set(if is_focused {
            border::THICK
        } else {
            border::PLAIN
        });

    let include = if form.include_uncontrolled { "yes" } else { "no" };

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Connection "),
            Span::styled(state.to_string(), connection_style(state)),
        ]),
        Line::from(Span::styled(
            url.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(format!("Next id    {}", next_id)),
        Line::from(""),
        section("Bounds"),
    ];

    for field in [
        FormField::SwLat,
        FormField::SwLng,
        FormField::NeLat,
        FormField::NeLng,
    ] {
        lines.push(field_line(form, field, is_focused));
    }
    lines.push(hint("<enter> sends bounds".to_string()));
    lines.push(Line::from(""));

    lines.push(section("Pilots filter"));
    lines.push(field_line(form, FormField::PilotQuery, is_focused));
    lines.push(hint("<enter> sends pilots_filter".to_string()));
    lines.push(Line::from(""));

    lines.push(section("Airports filter"));
    lines.push(Line::from(format!("  Include uncontrolled: {}", include)));
    lines.push(hint("<^a> toggles and sends airports_filter".to_string()));
    lines.push(Line::from(""));

    lines.push(section("Subscription"));
    lines.push(field_line(form, FormField::SubscriptionId, is_focused));
    lines.push(hint("<enter> sub_id, <^u> unsub_id".to_string()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
