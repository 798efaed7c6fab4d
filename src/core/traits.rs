use crate::application::state::AppState;
use crate::core::events::UiEvent;
use crate::core::models::RunState;
use anyhow::Result;

/// Source of "now" for the countdown.
pub trait Clock {
    /// Milliseconds since an arbitrary origin; never decreases
    fn now_ms(&self) -> u64;
}

/// Decides when the countdown should be updated next.
///
/// The driver never calls back on its own: the owner asks it with `poll`
/// whether a tick is due. Ticks are therefore strictly sequential.
pub trait TickDriver {
    /// Schedule ticks, the first one interval after `now_ms`
    fn arm(&mut self, now_ms: u64);

    /// Stop ticking. Cancelling an idle driver is harmless.
    fn cancel(&mut self);

    /// Whether ticks are scheduled
    fn is_armed(&self) -> bool;

    /// Returns true when a tick is due at `now_ms` and schedules the next one
    fn poll(&mut self, now_ms: u64) -> bool;
}

/// Receiver of everything the countdown wants to show.
pub trait PresentationSink {
    /// Zero-padded `MM:SS`
    fn render_time(&mut self, formatted: &str);

    /// Reveal fraction: 0.0 fully hidden, 1.0 fully revealed
    fn render_progress(&mut self, fraction: f64);

    fn set_urgent(&mut self, urgent: bool);

    fn set_finished(&mut self, finished: bool);

    fn show_setup_panel(&mut self);

    fn show_running_panel(&mut self);

    /// Lets the UI label its pause/resume controls
    fn set_run_state(&mut self, _state: RunState) {}
}

/// Abstraction for audio cues.
///
/// Failures are reported but callers are expected to carry on without sound.
pub trait AudioCue {
    /// Short warning tone for the final seconds
    fn play_beep(&mut self) -> Result<()>;

    /// Completion sound, restarted from the beginning on every call
    fn play_completion(&mut self) -> Result<()>;

    /// Set volume (0.0 - 1.0)
    fn set_volume(&mut self, _volume: f32) {}
}

/// Abstraction for persistent storage
pub trait StorageBackend {
    /// Load application state
    fn load(&self) -> Result<AppState>;

    /// Save application state
    fn save(&self, state: &AppState) -> Result<()>;
}

/// Abstraction for UI rendering
pub trait UiRenderer {
    /// Initialize the UI (setup terminal, etc.)
    fn init(&mut self) -> Result<()>;

    /// Cleanup the UI (restore terminal, etc.)
    fn cleanup(&mut self) -> Result<()>;

    /// Render current state
    fn render(&mut self, state: &AppState) -> Result<()>;

    /// Poll for user input (non-blocking)
    /// Returns events generated from user input
    fn poll_input(&mut self) -> Result<Vec<UiEvent>>;
}
