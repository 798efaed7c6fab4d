use crate::core::models::{InputField, Panel, RunState};

/// All events that can occur in the application
#[derive(Debug, Clone)]
pub enum AppEvent {
    // Output of the countdown, forwarded by the presentation sink
    Timer(TimerEvent),

    // User intent and UI-only updates
    Ui(UiEvent),

    // Application lifecycle
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// New `MM:SS` readout
    TimeRendered { text: String },

    /// New reveal fraction (0.0 hidden - 1.0 revealed)
    ProgressRendered { fraction: f64 },

    /// Urgent mode switched on or off
    UrgentChanged { urgent: bool },

    /// Finished flag switched on or off
    FinishedChanged { finished: bool },

    /// Setup or running panel requested
    PanelChanged { panel: Panel },

    /// Countdown moved to a new run state
    RunStateChanged { state: RunState },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Start with the entered duration, or resume when paused
    StartRequested,

    /// Pause when running, resume when paused
    TogglePauseRequested,

    /// Back to the setup panel
    ResetRequested,

    /// Setup field focus moved
    FieldFocused { field: InputField },

    /// Setup field text changed (already clamped by the renderer)
    FieldEdited { field: InputField, value: String },

    /// User requested volume change (0-100)
    VolumeChangeRequested { volume: u8 },

    /// User requested quit
    QuitRequested,

    /// Display message to user
    ShowMessage { message: String },

    /// Display error to user
    ShowError { message: String },
}

/// Type alias for event sender
pub type EventSender = crossbeam_channel::Sender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = crossbeam_channel::Receiver<AppEvent>;
