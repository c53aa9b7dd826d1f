//! Main application state and TUI event loop for the EV dashboard.
//!
//! [`App`] owns the theme, the [`DashboardState`] and the page-jump buffer.
//! Keys are translated into [`DashboardAction`]s and applied through
//! [`reduce`]; the load outcome arrives on an async channel.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use ev_runtime::store::{reduce, DashboardAction, DashboardState, LoadPhase, LoadedDashboard};

use crate::charts;
use crate::components::header::Header;
use crate::components::metrics::{metric_boxes, render_metrics};
use crate::table_view;
use crate::themes::Theme;

/// Longest page number accepted in the jump buffer.
const MAX_JUMP_DIGITS: usize = 9;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Locator shown in the header while the load is pending.
    pub source: String,
    pub state: DashboardState,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Digits typed towards a 1-based page jump.
    pub jump_input: String,
}

impl App {
    pub fn new(theme_name: &str, source: String, page_size: usize) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            state: DashboardState::new(page_size),
            should_quit: false,
            jump_input: String::new(),
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits, receiving the load outcome
    /// from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// the terminal loop stays on the current thread while the load result is
    /// picked up with `try_recv`.
    pub async fn run(mut self, mut rx: mpsc::Receiver<DashboardAction>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut channel_open = true;

        let result = loop {
            if let Err(err) = terminal.draw(|frame| self.render(frame)) {
                break Err(err);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(err) => break Err(err),
                },
                Ok(false) => {}
                Err(err) => break Err(err),
            }

            // Drain the load outcome (non-blocking).
            while channel_open {
                match rx.try_recv() {
                    Ok(action) => {
                        tracing::debug!("load outcome received");
                        self.dispatch(action);
                    }
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        channel_open = false;
                        if matches!(self.state.phase, LoadPhase::Loading) {
                            self.dispatch(DashboardAction::LoadFailed(
                                "load task ended without a result".to_string(),
                            ));
                        }
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State changes ─────────────────────────────────────────────────────────

    /// Apply `action` to the dashboard state.
    pub fn dispatch(&mut self, action: DashboardAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Translate a key press into quitting, jump-buffer edits or a page
    /// action.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char(d) if d.is_ascii_digit() => {
                if self.jump_input.len() < MAX_JUMP_DIGITS {
                    self.jump_input.push(d);
                }
                None
            }
            KeyCode::Backspace => {
                self.jump_input.pop();
                None
            }
            KeyCode::Esc => {
                self.jump_input.clear();
                None
            }
            KeyCode::Enter => self.take_jump(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                Some(DashboardAction::NextPage)
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                Some(DashboardAction::PreviousPage)
            }
            KeyCode::Home => Some(DashboardAction::FirstPage),
            KeyCode::End => Some(DashboardAction::LastPage),
            _ => None,
        };

        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    /// Consume the jump buffer as a 1-based page number.
    fn take_jump(&mut self) -> Option<DashboardAction> {
        let input = std::mem::take(&mut self.jump_input);
        match input.parse::<usize>() {
            Ok(page) if page >= 1 => Some(DashboardAction::JumpToPage(page - 1)),
            _ => None,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        match &self.state.phase {
            LoadPhase::Loading => {
                let [header, body] = split_header(area);
                self.render_header(frame, header, None);
                render_loading(frame, body, &self.source, &self.theme);
            }
            LoadPhase::LoadFailed(message) => {
                let [header, body] = split_header(area);
                self.render_header(frame, header, None);
                render_load_failed(frame, body, &self.source, message, &self.theme);
            }
            LoadPhase::Loaded(data) => self.render_loaded(frame, area, data),
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, total_rows: Option<usize>) {
        let lines = Header::new(&self.source, total_rows, &self.theme).to_lines();
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    fn render_loaded(&self, frame: &mut Frame, area: Rect, data: &LoadedDashboard) {
        let pager = &self.state.pager;
        let table_height = pager.page_size().min(u16::MAX as usize - 3) as u16 + 3;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(table_height),
                Constraint::Length(1),
            ])
            .split(area);

        let lines = Header::new(&data.source, Some(data.dataset.len()), &self.theme).to_lines();
        frame.render_widget(Paragraph::new(Text::from(lines)), chunks[0]);

        let boxes = metric_boxes(data.dataset.len(), &data.summary);
        render_metrics(frame, chunks[1], &boxes, &self.theme);

        let chart_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        charts::render_bar_chart(
            frame,
            chart_areas[0],
            &charts::top_makes_chart(&data.summary),
            &self.theme,
        );
        charts::render_line_chart(
            frame,
            chart_areas[1],
            &charts::years_chart(&data.summary),
            &self.theme,
        );

        table_view::render_vehicle_table(
            frame,
            chunks[3],
            self.state.current_rows(),
            pager.current() * pager.page_size(),
            data.dataset.len(),
            &self.theme,
        );
        table_view::render_footer(frame, chunks[4], pager, &self.jump_input, &self.theme);
    }
}

fn split_header(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    [chunks[0], chunks[1]]
}

/// Panel shown while the dataset is being fetched and parsed.
pub fn render_loading(frame: &mut Frame, area: Rect, source: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Loading data...", theme.info)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Source: ", theme.label),
            Span::styled(source.to_string(), theme.value),
        ]),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" EV Dashboard "),
        ),
        area,
    );
}

/// Panel shown when the load failed; the dashboard does not retry.
pub fn render_load_failed(frame: &mut Frame, area: Rect, source: &str, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Failed to load data", theme.error)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Source: ", theme.label),
            Span::styled(source.to_string(), theme.value),
        ]),
        Line::from(Span::styled(message.to_string(), theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.error)
                    .title(" Load Failed "),
            ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
