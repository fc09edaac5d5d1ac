use ratatui::{style::Stylize, text::Line};

use crate::cmd::console::state::Focus;

/// Context-aware keybinding hints shown in the frame's bottom border
pub(crate) fn controls_line(focus: Focus) -> Line<'static> {
    match focus {
        Focus::Form => Line::from(vec![
            " Quit ".into(),
            "<esc> ".blue().bold(),
            " | Field ".into(),
            "<↑↓> ".blue().bold(),
            " | Send ".into(),
            "<enter> ".blue().bold(),
            " | Airports ".into(),
            "<^a> ".blue().bold(),
            " | Unsub ".into(),
            "<^u> ".blue().bold(),
            " | Clear ".into(),
            "<^l> ".blue().bold(),
            " | Logs ".into(),
            "<tab> ".blue().bold(),
        ]),
        Focus::Logs => Line::from(vec![
            " Quit ".into(),
            "<q> ".blue().bold(),
            " | ".into(),
            "<↑↓/jk/gG> ".blue().bold(),
            " | Inspect ".into(),
            "<i> ".blue().bold(),
            " | Clear ".into(),
            "<c> ".blue().bold(),
            " | Form ".into(),
            "<tab> ".blue().bold(),
        ]),
        Focus::Inspect => Line::from(vec![
            " Quit ".into(),
            "<q> ".blue().bold(),
            " | ".into(),
            "<↑↓/jk> ".blue().bold(),
            " | Close ".into(),
            "<i/esc/h> ".blue().bold(),
        ]),
    }
}
