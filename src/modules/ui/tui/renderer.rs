use crate::application::state::AppState;
use crate::core::events::UiEvent;
use crate::core::models::{InputField, Panel, RunState};
use crate::core::traits::UiRenderer;
use crate::modules::ui::progress_formatter::percentage;
use crate::modules::ui::tui::tower::TowerReveal;
use crate::utils::{amplitude_to_volume, parse_field, push_digit, step_field, APP_NAME};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};
use std::time::Duration;

const VOLUME_STEP: u8 = 5;

pub struct TuiRenderer {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,

    // Display state (synced from AppState)
    view: AppState,
    volume: u8,
}

impl TuiRenderer {
    pub fn new() -> Self {
        Self {
            terminal: None,
            view: AppState::default(),
            volume: 100,
        }
    }

    pub fn update_from_app_state(&mut self, app_state: &AppState) {
        self.view.timer = app_state.timer.clone();
        self.view.ui = app_state.ui.clone();
        self.view.config = app_state.config.clone();
        self.volume = amplitude_to_volume(app_state.config.volume);
    }

    fn draw_ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Status
                Constraint::Length(3), // Controls
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);
        match self.view.timer.panel {
            Panel::Setup => self.draw_setup(f, chunks[1]),
            Panel::Running => self.draw_running(f, chunks[1]),
        }
        self.draw_status(f, chunks[2]);
        self.draw_controls(f, chunks[3]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new(format!("{} · volume {}%", APP_NAME, self.volume))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_setup(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(50, 40, area);
        let block = Block::default()
            .title(" Set duration ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        for (row, field, label) in [
            (rows[0], InputField::Minutes, "Minutes"),
            (rows[1], InputField::Seconds, "Seconds"),
        ] {
            let focused = self.view.ui.focused_field == field;
            let style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if focused { "▏" } else { " " };

            let line = Line::from(vec![
                Span::raw(format!("{:>8}: ", label)),
                Span::styled(format!("[ {:>2}{} ]", self.view.input_text(field), cursor), style),
            ]);
            f.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
        }
    }

    fn draw_running(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let timer = &self.view.timer;
        f.render_widget(
            TowerReveal::new(timer.progress)
                .urgent(timer.urgent)
                .finished(timer.finished),
            columns[0],
        );

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(columns[1]);

        let color = if timer.finished {
            Color::Green
        } else if timer.urgent {
            Color::Red
        } else {
            Color::White
        };

        let readout = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                timer.time_text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Remaining "));
        f.render_widget(readout, right[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(color))
            .ratio(timer.progress.clamp(0.0, 1.0))
            .label(format!("{}%", percentage(timer.progress)));
        f.render_widget(gauge, right[1]);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let line = if let Some(error) = &self.view.ui.error_message {
            Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
        } else {
            Line::from(self.view.ui.status_message.clone())
        };

        let paragraph =
            Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(paragraph, area);
    }

    fn draw_controls(&self, f: &mut Frame, area: Rect) {
        let hints = match (self.view.timer.panel, self.view.timer.run_state) {
            (Panel::Setup, _) => "Tab: Switch field • 0-9: Type • ↑/↓: Adjust • Enter: Start • +/-: Volume • q: Quit",
            (Panel::Running, RunState::Paused) => "Space/Enter: Resume • r: Reset • +/-: Volume • q: Quit",
            (Panel::Running, RunState::Finished) => "Enter: Again • r: Reset • +/-: Volume • q: Quit",
            (Panel::Running, _) => "Space: Pause • r: Reset • +/-: Volume • q: Quit",
        };

        let controls = Paragraph::new(hints)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(" Controls "));
        f.render_widget(controls, area);
    }

    /// Translate a key press into UI events.
    fn handle_key(&mut self, key: KeyEvent) -> Vec<UiEvent> {
        let mut events = Vec::new();

        // Keys shared by both panels
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                events.push(UiEvent::QuitRequested);
                return events;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                events.push(UiEvent::QuitRequested);
                return events;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.volume = (self.volume + VOLUME_STEP).min(100);
                events.push(UiEvent::VolumeChangeRequested { volume: self.volume });
                return events;
            }
            KeyCode::Char('-') => {
                self.volume = self.volume.saturating_sub(VOLUME_STEP);
                events.push(UiEvent::VolumeChangeRequested { volume: self.volume });
                return events;
            }
            _ => {}
        }

        match self.view.timer.panel {
            Panel::Setup => self.handle_setup_key(key, &mut events),
            Panel::Running => match key.code {
                KeyCode::Char(' ') | KeyCode::Char('p') => {
                    events.push(UiEvent::TogglePauseRequested);
                }
                KeyCode::Enter => {
                    events.push(UiEvent::StartRequested);
                }
                KeyCode::Char('r') => {
                    events.push(UiEvent::ResetRequested);
                }
                _ => {}
            },
        }

        events
    }

    fn handle_setup_key(&mut self, key: KeyEvent, events: &mut Vec<UiEvent>) {
        let field = self.view.ui.focused_field;
        let current = self.view.input_text(field).to_string();

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.view.ui.focused_field = field.other();
                events.push(UiEvent::FieldFocused { field: field.other() });
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                let value = push_digit(parse_field(&current), digit, field.max());
                self.edit(field, value.to_string(), events);
            }
            KeyCode::Up | KeyCode::Down => {
                let value = step_field(parse_field(&current), key.code == KeyCode::Up, field.max());
                self.edit(field, value.to_string(), events);
            }
            KeyCode::Backspace => {
                let mut value = current;
                value.pop();
                self.edit(field, value, events);
            }
            KeyCode::Enter => {
                events.push(UiEvent::StartRequested);
            }
            _ => {}
        }
    }

    // Keep the local copy current so fast typing builds on the latest value
    fn edit(&mut self, field: InputField, value: String, events: &mut Vec<UiEvent>) {
        match field {
            InputField::Minutes => self.view.ui.minutes_input = value.clone(),
            InputField::Seconds => self.view.ui.seconds_input = value.clone(),
        }
        events.push(UiEvent::FieldEdited { field, value });
    }
}

impl UiRenderer for TuiRenderer {
    fn init(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        self.terminal = Some(Terminal::new(backend)?);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        if let Some(mut terminal) = self.terminal.take() {
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    fn render(&mut self, state: &AppState) -> Result<()> {
        self.update_from_app_state(state);

        let mut terminal = match self.terminal.take() {
            Some(t) => t,
            None => return Ok(()),
        };

        terminal.draw(|f| self.draw_ui(f))?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn poll_input(&mut self) -> Result<Vec<UiEvent>> {
        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }

        Ok(Vec::new())
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
