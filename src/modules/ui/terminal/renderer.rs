use crate::application::state::AppState;
use crate::core::events::UiEvent;
use crate::core::models::RunState;
use crate::core::traits::UiRenderer;
use crate::modules::ui::progress_formatter::{percentage, reveal_bar};
use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::Stylize,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Write};
use std::time::Duration;

const BAR_WIDTH: usize = 24;

/// Single status line renderer for plain terminals
pub struct TerminalRenderer {
    initialized: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { initialized: false }
    }

    pub fn print_message(&self, message: &str) {
        println!("{}", message);
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    /// `MM:SS [bar] NN%` followed by the status text
    fn status_line(state: &AppState) -> String {
        let timer = &state.timer;
        format!(
            "{} [{}] {:>3}%  {}",
            timer.time_text,
            reveal_bar(timer.progress, BAR_WIDTH),
            percentage(timer.progress),
            state.ui.status_message
        )
    }

    fn key_to_event(key: KeyEvent) -> Option<UiEvent> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UiEvent::QuitRequested)
            }
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                Some(UiEvent::TogglePauseRequested)
            }
            KeyCode::Enter => Some(UiEvent::StartRequested),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(UiEvent::ResetRequested),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(UiEvent::QuitRequested),
            _ => None,
        }
    }
}

impl UiRenderer for TerminalRenderer {
    fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.initialized = true;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.initialized {
            terminal::disable_raw_mode()?;
            self.initialized = false;
            println!();
        }
        Ok(())
    }

    fn render(&mut self, state: &AppState) -> Result<()> {
        let mut stdout = stdout();

        stdout.execute(cursor::MoveToColumn(0))?;
        stdout.execute(terminal::Clear(ClearType::CurrentLine))?;

        let line = Self::status_line(state);
        let timer = &state.timer;
        if timer.finished {
            print!("{}", line.green().bold());
        } else if timer.urgent {
            print!("{}", line.red().bold());
        } else if timer.run_state == RunState::Paused {
            print!("{}", line.yellow());
        } else {
            print!("{}", line);
        }

        // Show error if any
        if let Some(error) = &state.ui.error_message {
            print!(" | {}", format!("ERROR: {}", error).red());
        }

        print!(" | [Space: Pause | R: Reset | Q: Quit]");

        stdout.flush()?;
        Ok(())
    }

    fn poll_input(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    events.extend(Self::key_to_event(key));
                }
            }
        }

        Ok(events)
    }
}
