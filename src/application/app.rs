use crate::application::handlers::ui_handler::UiHandler;
use crate::application::handlers::HandlerContext;
use crate::application::presentation::ChannelSink;
use crate::application::state::AppState;
use crate::core::events::*;
use crate::core::models::RunState;
use crate::core::traits::*;
use crate::modules::countdown::state_machine::Countdown;
use anyhow::Result;
use crossbeam_channel::bounded;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const EVENT_QUEUE_CAPACITY: usize = 256;
const FRAME_INTERVAL: Duration = Duration::from_millis(16); // ~60 FPS

/// Main application orchestrator
pub struct Application {
    state: AppState,
    event_tx: EventSender,
    event_rx: EventReceiver,

    countdown: Countdown,
    ui_handler: UiHandler,

    // Module references
    storage_backend: Option<Box<dyn StorageBackend>>,
    ui_renderer: Option<Box<dyn UiRenderer>>,

    running: bool,

    // Quit this long after the countdown finishes (plain mode)
    exit_after_finish: Option<Duration>,
    finished_at: Option<Instant>,
}

impl Application {
    /// Builds the application around a countdown driven by `clock` and `driver`.
    ///
    /// Everything the countdown presents comes back through the event queue.
    pub fn new(clock: Box<dyn Clock>, driver: Box<dyn TickDriver>) -> Self {
        let (tx, rx) = bounded(EVENT_QUEUE_CAPACITY);
        let countdown =
            Countdown::new(clock, driver).with_presentation(Box::new(ChannelSink::new(tx.clone())));

        Self {
            state: AppState::default(),
            event_tx: tx,
            event_rx: rx,
            countdown,
            ui_handler: UiHandler,
            storage_backend: None,
            ui_renderer: None,
            running: true,
            exit_after_finish: None,
            finished_at: None,
        }
    }

    /// Set the audio cue player
    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.countdown = self.countdown.with_audio(audio);
        self
    }

    /// Set the storage backend
    pub fn with_storage_backend(mut self, backend: Box<dyn StorageBackend>) -> Self {
        self.storage_backend = Some(backend);
        self
    }

    /// Set the UI renderer
    pub fn with_ui_renderer(mut self, renderer: Box<dyn UiRenderer>) -> Self {
        self.ui_renderer = Some(renderer);
        self
    }

    /// Stop the main loop `linger` after the countdown finishes
    pub fn with_exit_after_finish(mut self, linger: Duration) -> Self {
        self.exit_after_finish = Some(linger);
        self
    }

    /// Get event sender (for modules to emit events)
    pub fn event_sender(&self) -> EventSender {
        self.event_tx.clone()
    }

    /// Get current state (read-only)
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Initialize the application
    pub fn init(&mut self) -> Result<()> {
        // Load settings from storage
        match self.storage_backend.as_ref().map(|storage| storage.load()) {
            Some(Ok(loaded_state)) => {
                self.state = loaded_state;
            }
            Some(Err(e)) => {
                // Leave the unreadable file alone for the user to fix
                warn!(error = %e, "could not load settings, using defaults without saving");
                self.storage_backend = None;
            }
            None => {}
        }

        self.countdown.set_volume(self.state.config.volume);
        self.state.prefill_inputs();

        // Initialize UI
        if let Some(ui) = &mut self.ui_renderer {
            ui.init()?;
        }

        info!(cadence = %self.state.config.cadence, "application initialized");
        Ok(())
    }

    /// Run the main event loop
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            self.step()?;

            if let Some(ui) = &mut self.ui_renderer {
                ui.render(&self.state)?;
            }

            // Small sleep to prevent CPU spinning
            std::thread::sleep(FRAME_INTERVAL);
        }

        Ok(())
    }

    /// One pass of the loop without rendering: input, countdown tick, events.
    pub fn step(&mut self) -> Result<()> {
        // Poll UI for input
        if let Some(ui) = &mut self.ui_renderer {
            let ui_events = ui.poll_input()?;
            for event in ui_events {
                self.event_tx.send(AppEvent::Ui(event))?;
            }
        }

        self.countdown.pump();
        self.process_events()?;
        self.check_exit_after_finish();

        Ok(())
    }

    /// Process all pending events in the queue
    fn process_events(&mut self) -> Result<()> {
        // Drain all events currently in queue
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Handle a single event
    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        // Update state based on event
        self.state.apply_event(&event);

        // Route event to appropriate handler
        match &event {
            // Countdown output only updates state
            AppEvent::Timer(_) => {}
            AppEvent::Ui(ue) => {
                let mut ctx = HandlerContext {
                    state: &mut self.state,
                    event_tx: &self.event_tx,
                    countdown: &mut self.countdown,
                    storage: &self.storage_backend,
                };
                self.ui_handler.handle(ue, &mut ctx)?;
            }
            AppEvent::Shutdown => {
                self.running = false;
            }
        }

        Ok(())
    }

    fn check_exit_after_finish(&mut self) {
        let Some(linger) = self.exit_after_finish else {
            return;
        };

        if self.state.timer.run_state == RunState::Finished {
            let finished_at = *self.finished_at.get_or_insert_with(Instant::now);
            if finished_at.elapsed() >= linger {
                self.running = false;
            }
        } else {
            self.finished_at = None;
        }
    }

    /// Cleanup resources
    pub fn cleanup(&mut self) -> Result<()> {
        // Save settings
        if let Some(storage) = &self.storage_backend {
            storage.save(&self.state)?;
        }

        // Cleanup UI
        if let Some(ui) = &mut self.ui_renderer {
            ui.cleanup()?;
        }

        Ok(())
    }
}
