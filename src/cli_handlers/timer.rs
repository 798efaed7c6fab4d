use crate::application::app::Application;
use crate::application::state::AppState;
use crate::cli::TimerArgs;
use crate::cli_handlers::CliCommand;
use crate::core::events::{AppEvent, UiEvent};
use crate::core::models::{InputField, TimerInput};
use crate::core::traits::{AudioCue, StorageBackend, UiRenderer};
use crate::modules::audio::rodio_backend::RodioCuePlayer;
use crate::modules::audio::silent::SilentCuePlayer;
use crate::modules::countdown::clock::SystemClock;
use crate::modules::countdown::tick_driver::IntervalDriver;
use crate::modules::storage::json_backend::JsonStorageBackend;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::modules::ui::tui::renderer::TuiRenderer;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

// How long the plain countdown keeps showing 00:00 before exiting
const EXIT_LINGER: Duration = Duration::from_secs(3);

// ── Tui ───────────────────────────────────────────────────────────────────────
pub struct TuiCommand {
    pub args: TimerArgs,
}

impl CliCommand for TuiCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut app = build_app(&self.args, Box::new(TuiRenderer::new()))?;

        app.init()?;
        prefill_overrides(&app, &self.args)?;
        let result = app.run();
        app.cleanup()?;

        result
    }
}

// ── Start ─────────────────────────────────────────────────────────────────────
pub struct StartCommand {
    pub args: TimerArgs,
}

impl CliCommand for StartCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut app = build_app(&self.args, Box::new(TerminalRenderer::new()))?
            .with_exit_after_finish(EXIT_LINGER);

        app.init()?;

        let input = resolve_input(app.state(), &self.args);
        if input.total_seconds() == 0 {
            app.cleanup()?;
            TerminalRenderer::new().print_error("Set a duration above 00:00 with -m/-s");
            return Ok(());
        }

        prefill_overrides(&app, &self.args)?;
        app.event_sender().send(AppEvent::Ui(UiEvent::StartRequested))?;
        let result = app.run();
        app.cleanup()?;

        result
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Wire clock, driver, audio, storage and `renderer` into an application.
fn build_app(args: &TimerArgs, renderer: Box<dyn UiRenderer>) -> Result<Application> {
    let storage = JsonStorageBackend::new()?;
    let saved = storage.load().unwrap_or_else(|e| {
        warn!(error = %e, "could not read settings, using defaults");
        AppState::default()
    });

    let cadence = args.cadence.unwrap_or(saved.config.cadence);

    Ok(Application::new(
        Box::new(SystemClock::new()),
        Box::new(IntervalDriver::new(cadence)),
    )
    .with_audio(cue_player(args.mute, saved.config.horn_path))
    .with_storage_backend(Box::new(storage))
    .with_ui_renderer(renderer))
}

/// Rodio output, or silence when muted or no device is available
fn cue_player(mute: bool, horn_path: Option<PathBuf>) -> Box<dyn AudioCue> {
    if mute {
        return Box::new(SilentCuePlayer);
    }

    match RodioCuePlayer::new(horn_path) {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!(error = %e, "no audio output, continuing without sound");
            Box::new(SilentCuePlayer)
        }
    }
}

/// Duration from the command line, falling back to the remembered one
fn resolve_input(state: &AppState, args: &TimerArgs) -> TimerInput {
    TimerInput::new(
        args.minutes.unwrap_or(state.config.last_minutes as u32),
        args.seconds.unwrap_or(state.config.last_seconds as u32),
    )
}

/// Push command line minutes/seconds into the setup fields
fn prefill_overrides(app: &Application, args: &TimerArgs) -> Result<()> {
    let sender = app.event_sender();

    for (field, value) in [
        (InputField::Minutes, args.minutes),
        (InputField::Seconds, args.seconds),
    ] {
        if let Some(value) = value {
            sender.send(AppEvent::Ui(UiEvent::FieldEdited {
                field,
                value: value.to_string(),
            }))?;
        }
    }

    Ok(())
}
