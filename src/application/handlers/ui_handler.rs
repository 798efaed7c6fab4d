use crate::application::handlers::HandlerContext;
use crate::core::error::CountdownError;
use crate::core::events::{AppEvent, UiEvent};
use crate::core::models::{RunState, TimerInput};
use crate::utils::volume_percent_to_amplitude;
use anyhow::Result;
use tracing::debug;

/// Handles all [`UiEvent`] variants that require side effects.
///
/// Responsible for:
/// - Translating user intent into countdown operations (start, pause, resume, reset).
/// - Remembering the last duration and volume in settings.
///
/// Pure state updates (ShowMessage, ShowError, FieldFocused, FieldEdited)
/// are already handled by `AppState::apply_event`.
pub struct UiHandler;

impl UiHandler {
    pub fn handle(&self, event: &UiEvent, ctx: &mut HandlerContext) -> Result<()> {
        match event {
            UiEvent::StartRequested => {
                // Same key starts a new countdown or resumes a paused one
                if ctx.countdown.state() == RunState::Paused {
                    Self::report(ctx.countdown.resume());
                } else {
                    Self::start_from_inputs(ctx)?;
                }
            }

            UiEvent::TogglePauseRequested => match ctx.countdown.state() {
                RunState::Running => Self::report(ctx.countdown.pause()),
                RunState::Paused => Self::report(ctx.countdown.resume()),
                RunState::Idle | RunState::Finished => {}
            },

            UiEvent::ResetRequested => {
                ctx.countdown.reset();
            }

            UiEvent::VolumeChangeRequested { volume } => {
                let amplitude = volume_percent_to_amplitude(*volume);
                ctx.countdown.set_volume(amplitude);
                ctx.state.config.volume = amplitude;
                ctx.persist_state();

                ctx.event_tx.send(AppEvent::Ui(UiEvent::ShowMessage {
                    message: format!("Volume set to {}%", volume),
                }))?;
            }

            UiEvent::QuitRequested => {
                ctx.event_tx.send(AppEvent::Shutdown)?;
            }

            // Pure state updates, already applied by AppState::apply_event
            UiEvent::ShowMessage { .. }
            | UiEvent::ShowError { .. }
            | UiEvent::FieldFocused { .. }
            | UiEvent::FieldEdited { .. } => {}
        }

        Ok(())
    }

    fn start_from_inputs(ctx: &mut HandlerContext) -> Result<()> {
        let input = TimerInput::from_fields(&ctx.state.ui.minutes_input, &ctx.state.ui.seconds_input);

        match ctx.countdown.start(input.total_seconds()) {
            Ok(()) => {
                ctx.state.config.last_minutes = input.minutes();
                ctx.state.config.last_seconds = input.seconds();
                ctx.persist_state();
            }
            Err(CountdownError::InvalidDuration) => {
                ctx.event_tx.send(AppEvent::Ui(UiEvent::ShowError {
                    message: "Set a duration above 00:00".to_string(),
                }))?;
            }
            Err(e) => Self::report(Err(e)),
        }

        Ok(())
    }

    /// Refused transitions are no-ops for the user; keep a trace of them.
    fn report(result: Result<(), CountdownError>) {
        if let Err(e) = result {
            debug!(error = %e, "countdown request ignored");
        }
    }
}
