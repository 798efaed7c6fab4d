use crate::core::events::*;
use crate::core::models::{InputField, Panel, RunState, TickCadence};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application state (single source of truth)
///
/// Only `config` is written to disk; the countdown itself never is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub config: ConfigState,

    #[serde(skip)]
    pub timer: TimerView,

    #[serde(skip)]
    pub ui: UiState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Amplitude (0.0 - 1.0), see `volume_percent_to_amplitude`
    pub volume: f32,
    pub cadence: TickCadence,
    pub horn_path: Option<PathBuf>,

    // Setup fields are pre-filled with the last duration entered
    pub last_minutes: u8,
    pub last_seconds: u8,
}

impl Default for ConfigState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            cadence: TickCadence::Frame,
            horn_path: None,
            last_minutes: 5,
            last_seconds: 0,
        }
    }
}

/// What the countdown last told the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub time_text: String,
    pub progress: f64,
    pub urgent: bool,
    pub finished: bool,
    pub panel: Panel,
    pub run_state: RunState,
}

impl Default for TimerView {
    fn default() -> Self {
        Self {
            time_text: "00:00".to_string(),
            progress: 0.0,
            urgent: false,
            finished: false,
            panel: Panel::Setup,
            run_state: RunState::Idle,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub status_message: String,
    pub error_message: Option<String>,

    // Setup panel
    pub minutes_input: String,
    pub seconds_input: String,
    pub focused_field: InputField,
}

impl AppState {
    /// Copy the remembered duration into the setup fields
    pub fn prefill_inputs(&mut self) {
        self.ui.minutes_input = self.config.last_minutes.to_string();
        self.ui.seconds_input = self.config.last_seconds.to_string();
    }

    pub fn input_text(&self, field: InputField) -> &str {
        match field {
            InputField::Minutes => &self.ui.minutes_input,
            InputField::Seconds => &self.ui.seconds_input,
        }
    }

    /// Update state based on an event
    pub fn apply_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Timer(te) => match te {
                TimerEvent::TimeRendered { text } => {
                    self.timer.time_text = text.clone();
                }
                TimerEvent::ProgressRendered { fraction } => {
                    self.timer.progress = *fraction;
                }
                TimerEvent::UrgentChanged { urgent } => {
                    self.timer.urgent = *urgent;
                }
                TimerEvent::FinishedChanged { finished } => {
                    self.timer.finished = *finished;
                }
                TimerEvent::PanelChanged { panel } => {
                    self.timer.panel = *panel;
                }
                TimerEvent::RunStateChanged { state } => {
                    self.timer.run_state = *state;
                    self.ui.error_message = None;
                    self.ui.status_message = match state {
                        RunState::Idle => "Set a duration".to_string(),
                        RunState::Running => "Running".to_string(),
                        RunState::Paused => "Paused".to_string(),
                        RunState::Finished => "Time's up!".to_string(),
                    };
                }
            },

            AppEvent::Ui(ue) => match ue {
                UiEvent::FieldFocused { field } => {
                    self.ui.focused_field = *field;
                }
                UiEvent::FieldEdited { field, value } => match field {
                    InputField::Minutes => self.ui.minutes_input = value.clone(),
                    InputField::Seconds => self.ui.seconds_input = value.clone(),
                },
                UiEvent::ShowMessage { message } => {
                    self.ui.status_message = message.clone();
                    self.ui.error_message = None;
                }
                UiEvent::ShowError { message } => {
                    self.ui.error_message = Some(message.clone());
                }
                _ => {}
            },

            AppEvent::Shutdown => {}
        }
    }
}
