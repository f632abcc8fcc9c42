//! Interactive terminal form.
//!
//! Four fields (Location, District, Year, Predict) stacked vertically with
//! the outcome of the last submit underneath.

use crate::error::{CliError, Result};
use crimerisk::artifacts::LoadedContext;
use crimerisk::form::{FormState, Notice, Phase, YEAR_RANGE};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use tracing::{debug, info};

/// Focusable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Location,
    District,
    Year,
    Predict,
}

impl Focus {
    const ALL: [Focus; 4] = [Focus::Location, Focus::District, Focus::Year, Focus::Predict];

    fn label(self) -> &'static str {
        match self {
            Focus::Location => "Location",
            Focus::District => "District",
            Focus::Year => "Year",
            Focus::Predict => "Predict",
        }
    }

    fn next(self) -> Self {
        match self {
            Focus::Location => Focus::District,
            Focus::District => Focus::Year,
            Focus::Year => Focus::Predict,
            Focus::Predict => Focus::Location,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Location => Focus::Predict,
            Focus::District => Focus::Location,
            Focus::Year => Focus::District,
            Focus::Predict => Focus::Year,
        }
    }
}

/// Application state
struct App {
    form: FormState,
    focus: Focus,
    should_quit: bool,
}

impl App {
    fn new(context: Arc<LoadedContext>) -> Self {
        Self {
            form: FormState::new(context),
            focus: Focus::Location,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Down | KeyCode::Char('j') => self.step(true),
            KeyCode::Up | KeyCode::Char('k') => self.step(false),
            KeyCode::Char('+') | KeyCode::Right => self.form.increment_year(),
            KeyCode::Char('-') | KeyCode::Left => self.form.decrement_year(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    /// Changes the focused field's value.
    fn step(&mut self, forward: bool) {
        match (self.focus, forward) {
            (Focus::Location, true) => self.form.next_location(),
            (Focus::Location, false) => self.form.prev_location(),
            (Focus::District, true) => self.form.next_district(),
            (Focus::District, false) => self.form.prev_district(),
            // Down lowers the year, matching a list ordered newest first.
            (Focus::Year, true) => self.form.decrement_year(),
            (Focus::Year, false) => self.form.increment_year(),
            (Focus::Predict, _) => {}
        }
        debug!(selection = ?self.form.selection(), "form.changed");
    }

    fn submit(&mut self) {
        let notice = self.form.submit();
        info!(notice = %notice.message(), "form.submitted");
    }

    /// Text of the focused field's value, or a placeholder.
    fn value(&self, focus: Focus) -> String {
        match focus {
            Focus::Location => self.form.location().unwrap_or("(no locations)").to_string(),
            Focus::District => self.form.district().unwrap_or("(no districts)").to_string(),
            Focus::Year => self.form.year().to_string(),
            Focus::Predict => {
                if self.form.phase() == Phase::Predicting {
                    "[ Predicting... ]".to_string()
                } else {
                    "[ Predict Crime Risk ]".to_string()
                }
            }
        }
    }

    /// "n/m" position of the focused choice.
    fn position(&self, focus: Focus) -> Option<String> {
        let (idx, len) = match focus {
            Focus::Location => (self.form.location_index()?, self.form.locations().len()),
            Focus::District => (self.form.district_index()?, self.form.districts().len()),
            Focus::Year => (
                usize::try_from(self.form.year() - YEAR_RANGE.start()).ok()?,
                usize::try_from(YEAR_RANGE.end() - YEAR_RANGE.start() + 1).ok()?,
            ),
            Focus::Predict => return None,
        };
        Some(format!("{}/{}", idx + 1, len))
    }
}

/// Run the form command
pub(crate) fn run(context: Arc<LoadedContext>) -> Result<()> {
    enable_raw_mode().map_err(|e| CliError::Terminal(format!("failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| CliError::Terminal(format!("failed to set up terminal: {e}")))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| CliError::Terminal(format!("failed to create terminal: {e}")))?;

    let mut app = App::new(context);
    info!(locations = app.form.locations().len(), "form.started");
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::Terminal(format!("failed to draw: {e}")))?;

        if event::poll(std::time::Duration::from_millis(100))
            .map_err(|e| CliError::Terminal(format!("event poll error: {e}")))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| CliError::Terminal(format!("event read error: {e}")))?
            {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            info!("form.closed");
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(6), // Fields
            Constraint::Min(3),    // Notice
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_fields(f, chunks[1], app);
    render_notice(f, chunks[2], app);
    render_status(f, chunks[3], app);
}

fn render_title(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Crime Risk Prediction ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(block, area);
}

fn render_fields(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lines: Vec<Line<'_>> = Focus::ALL
        .iter()
        .map(|&focus| {
            let focused = focus == app.focus;
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(
                    format!("{marker}{:<10}", focus.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(app.value(focus), value_style),
            ];
            if let Some(position) = app.position(focus).filter(|_| focused) {
                spans.push(Span::styled(
                    format!("  ({position})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let fields = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Form "));
    f.render_widget(fields, area);
}

fn render_notice(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Result ");
    let Some(notice) = app.form.notice() else {
        let empty = Paragraph::new("Pick a location, district and year, then press Enter.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let color = match notice {
        Notice::HighRisk | Notice::Error(_) => Color::Red,
        Notice::LowRisk => Color::Green,
    };
    let text = Paragraph::new(notice.message())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(text, area);
}

fn render_status(f: &mut Frame<'_>, area: Rect, app: &App) {
    let status = match app.focus {
        Focus::Location | Focus::District => "j/k to choose | Tab next field | Enter predict | q quit",
        Focus::Year => "+/- or j/k to change year | Tab next field | Enter predict | q quit",
        Focus::Predict => "Enter to predict | Tab next field | q quit",
    };
    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crimerisk::data::{LocationRow, ReferenceDataset};
    use crimerisk::preprocessing::{EncoderSet, LabelEncoder};
    use crimerisk::tree::{DecisionTreeClassifier, TreeNode};

    /// Tamil Nadu is high risk, Kerala low.
    fn context() -> Arc<LoadedContext> {
        let encoders = EncoderSet::new()
            .with_encoder(
                "STATE/UT",
                LabelEncoder::from_classes(["Tamil Nadu", "Kerala"]),
            )
            .with_encoder(
                "DISTRICT",
                LabelEncoder::from_classes(["Chennai", "Madurai", "Kochi"]),
            );
        let dataset = ReferenceDataset::from_rows(vec![
            LocationRow::new("Tamil Nadu", "Chennai"),
            LocationRow::new("Tamil Nadu", "Madurai"),
            LocationRow::new("Kerala", "Kochi"),
        ]);
        let model = DecisionTreeClassifier::from_root(
            TreeNode::split(0, 0.5, TreeNode::leaf(1, 6), TreeNode::leaf(0, 4)),
            3,
        )
        .unwrap();
        Arc::new(LoadedContext::new(Arc::new(model), encoders, dataset).unwrap())
    }

    #[test]
    fn test_focus_cycle() {
        let mut focus = Focus::Location;
        for expected in [Focus::District, Focus::Year, Focus::Predict, Focus::Location] {
            focus = focus.next();
            assert_eq!(focus, expected);
        }
        assert_eq!(Focus::Location.prev(), Focus::Predict);
    }

    #[test]
    fn test_app_new() {
        let app = App::new(context());
        assert_eq!(app.focus, Focus::Location);
        assert!(!app.should_quit);
        assert_eq!(app.value(Focus::Location), "Tamil Nadu");
        assert_eq!(app.value(Focus::District), "Chennai");
        assert_eq!(app.value(Focus::Year), "2023");
    }

    #[test]
    fn test_keys_change_focused_field() {
        let mut app = App::new(context());
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.form.district(), Some("Madurai"));

        app.handle_key(KeyCode::BackTab);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.form.location(), Some("Kerala"));
        assert_eq!(app.form.district(), Some("Kochi"));
    }

    #[test]
    fn test_year_keys() {
        let mut app = App::new(context());
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.form.year(), 2024);
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.form.year(), 2022);

        app.focus = Focus::Year;
        app.handle_key(KeyCode::Up);
        assert_eq!(app.form.year(), 2023);
    }

    #[test]
    fn test_enter_submits_from_any_field() {
        let mut app = App::new(context());
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.form.notice(), Some(&Notice::HighRisk));

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.form.notice(), Some(&Notice::LowRisk));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(context());
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = App::new(context());
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_position() {
        let mut app = App::new(context());
        assert_eq!(app.position(Focus::Location).as_deref(), Some("1/2"));
        assert_eq!(app.position(Focus::Year).as_deref(), Some("24/26"));
        assert!(app.position(Focus::Predict).is_none());
        app.handle_key(KeyCode::Up);
        assert_eq!(app.position(Focus::Location).as_deref(), Some("2/2"));
    }

    // Frame capture tests using ratatui's TestBackend
    mod frame_tests {
        use super::*;
        use ratatui::backend::TestBackend;

        fn render_text(app: &App, width: u16, height: u16) -> String {
            let backend = TestBackend::new(width, height);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal.draw(|f| ui(f, app)).unwrap();
            let buffer = terminal.backend().buffer();
            buffer
                .content()
                .chunks(usize::from(width))
                .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        }

        #[test]
        fn test_frame_shows_fields() {
            let app = App::new(context());
            let text = render_text(&app, 80, 16);
            assert!(text.contains("Crime Risk Prediction"), "{text}");
            assert!(text.contains("Location"), "{text}");
            assert!(text.contains("Tamil Nadu"), "{text}");
            assert!(text.contains("Chennai"), "{text}");
            assert!(text.contains("2023"), "{text}");
            assert!(text.contains("Predict Crime Risk"), "{text}");
        }

        #[test]
        fn test_frame_before_submit() {
            let app = App::new(context());
            let text = render_text(&app, 80, 16);
            assert!(text.contains("press Enter"), "{text}");
        }

        #[test]
        fn test_frame_shows_high_risk_notice() {
            let mut app = App::new(context());
            app.handle_key(KeyCode::Enter);
            let text = render_text(&app, 80, 16);
            assert!(text.contains("High Crime Risk! Be Cautious."), "{text}");
        }

        #[test]
        fn test_frame_shows_low_risk_notice() {
            let mut app = App::new(context());
            app.handle_key(KeyCode::Down);
            app.handle_key(KeyCode::Enter);
            let text = render_text(&app, 80, 16);
            assert!(
                text.contains("Low Crime Risk! Area is relatively safe."),
                "{text}"
            );
        }

        #[test]
        fn test_frame_status_follows_focus() {
            let mut app = App::new(context());
            app.focus = Focus::Year;
            let text = render_text(&app, 100, 16);
            assert!(text.contains("+/-"), "{text}");
        }
    }
}
