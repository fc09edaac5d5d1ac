use clap::Args;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use ratatui::{
    layout::{Constraint, Layout},
    style::Stylize,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, TableState},
    DefaultTerminal, Frame,
};
use simwatch_console::{
    init_tracing, ConnectionState, LogEntry, LogTarget, Session, SessionConfig,
};
use std::io;
use std::time::{Duration, Instant};

use super::state::{Focus, FormField, FormState};
use super::views::bottom_bar::controls_line;
use super::views::form::render_form_panel;
use super::views::inspect::render_inspect_popup;
use super::views::logs::{render_logs_panel, render_logs_placeholder};
use super::widgets::formatters::connection_style;
use crate::cmd::EndpointArgs;

const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Args)]
pub struct ConsoleArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

pub(crate) struct App {
    session: Session,
    form: FormState,
    focus: Focus,
    exit: bool,
    last_render_duration: Duration,
    logs_table_state: TableState,
    follow_logs: bool,
    inspected_log: Option<LogEntry>,
}

impl ConsoleArgs {
    pub fn run(&self) -> Result<()> {
        // stderr belongs to the terminal UI
        init_tracing(&self.endpoint.log_target(LogTarget::Off))?;

        let config = SessionConfig::new(&self.endpoint.url)?;
        let session = Session::connect(&config)?;

        let mut app = App {
            session,
            form: FormState::new(),
            focus: Focus::Form,
            exit: false,
            last_render_duration: Duration::from_millis(0),
            logs_table_state: TableState::default(),
            follow_logs: true,
            inspected_log: None,
        };

        let mut terminal = ratatui::init();
        let app_result = app.run(&mut terminal);
        ratatui::restore();
        app.session.close(CLOSE_GRACE);
        app_result.map_err(|e| eyre::eyre!("TUI error: {}", e))
    }
}

impl App {
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            if self.session.poll_events() > 0 {
                self.on_log_appended();
            }

            let render_start = Instant::now();
            terminal.draw(|frame| self.draw(frame))?;
            self.last_render_duration = render_start.elapsed();

            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.render_ui(frame);
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    self.handle_key_event(key_event);
                }
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            match key_event.code {
                KeyCode::Char('c') => self.exit(),
                KeyCode::Char('l') => self.clear_log(),
                KeyCode::Char('a') => self.toggle_airports(),
                KeyCode::Char('u') => self.unsubscribe(),
                _ => {}
            }
            return;
        }

        match self.focus {
            Focus::Form => self.handle_form_key(key_event),
            Focus::Logs => self.handle_logs_key(key_event),
            Focus::Inspect => self.handle_inspect_key(key_event),
        }
    }

    fn handle_form_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.exit(),
            KeyCode::Tab => self.focus_logs(),
            KeyCode::Up | KeyCode::BackTab => self.form.focus_previous(),
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Enter => self.submit_focused(),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Delete => self.form.clear_focused(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn handle_logs_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.exit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.focus_form()
            }
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_log(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_log(),
            KeyCode::Char('g') => self.select_first_log(),
            KeyCode::Char('G') => self.select_last_log(),
            KeyCode::Char('i') | KeyCode::Char('I') | KeyCode::Enter => self.toggle_inspect(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.clear_log(),
            _ => {}
        }
    }

    fn handle_inspect_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit(),
            KeyCode::Char('i')
            | KeyCode::Char('I')
            | KeyCode::Char('h')
            | KeyCode::Left
            | KeyCode::Esc
            | KeyCode::Enter => self.toggle_inspect(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_log(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_log(),
            _ => {}
        }
    }

    fn submit_focused(&mut self) {
        // Failures are already in the log
        let _ = match self.form.focused {
            field if field.is_bounds() => {
                let [sw_lat, sw_lng, ne_lat, ne_lng] = self.form.bounds_input();
                self.session
                    .submit_bounds_input(sw_lat, sw_lng, ne_lat, ne_lng)
            }
            FormField::PilotQuery => {
                let query = self.form.value(FormField::PilotQuery).to_string();
                self.session.submit_pilot_filter(query)
            }
            _ => {
                let id = self
                    .form
                    .value(FormField::SubscriptionId)
                    .trim()
                    .to_string();
                self.session.subscribe(id)
            }
        };
        self.on_log_appended();
    }

    fn toggle_airports(&mut self) {
        self.form.include_uncontrolled = !self.form.include_uncontrolled;
        let _ = self
            .session
            .submit_airport_filter(self.form.include_uncontrolled);
        self.on_log_appended();
    }

    fn unsubscribe(&mut self) {
        let id = self
            .form
            .value(FormField::SubscriptionId)
            .trim()
            .to_string();
        let _ = self.session.unsubscribe(id);
        self.on_log_appended();
    }

    fn clear_log(&mut self) {
        self.session.clear_log();
        self.logs_table_state.select(None);
        self.inspected_log = None;
        self.follow_logs = true;
        self.focus = Focus::Form;
    }

    /// Keeps the newest entry in view unless the user scrolled away
    fn on_log_appended(&mut self) {
        if self.follow_logs {
            let count = self.session.log().len();
            if count > 0 {
                self.logs_table_state.select(Some(count - 1));
            }
        }
    }

    fn focus_form(&mut self) {
        self.focus = Focus::Form;
    }

    fn focus_logs(&mut self) {
        // Only allow focus if there are actual logs to display
        if !self.session.log().is_empty() {
            self.focus = Focus::Logs;
            if self.logs_table_state.selected().is_none() {
                self.select_last_log();
            }
        }
    }

    fn select_log(&mut self, i: usize) {
        let log_count = self.session.log().len();
        if log_count == 0 {
            return;
        }
        let i = i.min(log_count - 1);
        self.logs_table_state.select(Some(i));
        self.follow_logs = i == log_count - 1;

        // Update inspected log if inspect popup is open
        if self.focus == Focus::Inspect {
            if let Some(entry) = self.session.log().get(i) {
                self.inspected_log = Some(entry.clone());
            }
        }
    }

    fn select_previous_log(&mut self) {
        let i = match self.logs_table_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select_log(i);
    }

    fn select_next_log(&mut self) {
        let i = match self.logs_table_state.selected() {
            Some(i) => i + 1,
            None => 0,
        };
        self.select_log(i);
    }

    fn select_first_log(&mut self) {
        self.select_log(0);
    }

    fn select_last_log(&mut self) {
        self.select_log(usize::MAX);
    }

    fn toggle_inspect(&mut self) {
        if self.focus == Focus::Inspect {
            // Closing inspect popup
            self.focus = Focus::Logs;
            self.inspected_log = None;
        } else if let Some(selected) = self.logs_table_state.selected() {
            // Opening inspect popup - capture the current log entry
            if let Some(entry) = self.session.log().get(selected) {
                self.inspected_log = Some(entry.clone());
                self.focus = Focus::Inspect;
            }
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}

impl App {
    fn render_ui(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let title = Line::from(" Simwatch Console ".bold());

        let state = self.session.state();
        let status_line = Line::from(vec![
            Span::styled(" ● ", connection_style(state)),
            Span::styled(format!("{} ", state), connection_style(state)),
        ]);

        #[cfg(feature = "dev")]
        let block = {
            let render_time_ms = self.last_render_duration.as_millis();
            let render_time_text = if render_time_ms < 10 {
                format!("  {}ms ", render_time_ms)
            } else {
                format!(" {}ms ", render_time_ms)
            };

            Block::bordered()
                .title(title.centered())
                .title(status_line.right_aligned())
                .title_bottom(controls_line(self.focus).centered())
                .title_bottom(Line::from(render_time_text).cyan().right_aligned())
                .border_set(border::THICK)
        };

        #[cfg(not(feature = "dev"))]
        let block = Block::bordered()
            .title(title.centered())
            .title(status_line.right_aligned())
            .title_bottom(controls_line(self.focus).centered())
            .border_set(border::THICK);

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(ratatui::layout::Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(30)])
            .split(inner_area);
        let (form_area, logs_area) = (chunks[0], chunks[1]);

        render_form_panel(
            &self.form,
            state,
            self.session.url(),
            self.session.next_request_id(),
            form_area,
            frame,
            self.focus == Focus::Form,
        );

        let logs_focused = matches!(self.focus, Focus::Logs | Focus::Inspect);
        if self.session.log().is_empty() {
            let message = match state {
                ConnectionState::Connecting => "(connecting...)",
                _ => "(no log entries)",
            };
            render_logs_placeholder(message, logs_area, frame, logs_focused);
        } else {
            render_logs_panel(
                self.session.log().entries(),
                logs_area,
                frame,
                &mut self.logs_table_state,
                logs_focused,
            );
        }

        // Render inspect popup on top of everything if open
        if self.focus == Focus::Inspect {
            if let Some(ref inspected_log) = self.inspected_log {
                render_inspect_popup(inspected_log, area, frame);
            }
        }
    }
}
