pub mod ui_handler;

use crate::application::state::AppState;
use crate::core::events::EventSender;
use crate::core::traits::StorageBackend;
use crate::modules::countdown::state_machine::Countdown;
use tracing::warn;

/// All dependencies that event handlers need to do their work.
///
/// Passed by `&mut` into each handler method, giving handlers access to
/// shared resources without coupling them to the `Application` struct itself.
pub struct HandlerContext<'a> {
    pub state: &'a mut AppState,
    pub event_tx: &'a EventSender,
    pub countdown: &'a mut Countdown,
    pub storage: &'a Option<Box<dyn StorageBackend>>,
}

impl<'a> HandlerContext<'a> {
    /// Save settings to storage, if a backend is present.
    ///
    /// A failed save is logged; the countdown keeps going either way.
    pub fn persist_state(&self) {
        if let Some(storage) = self.storage {
            if let Err(e) = storage.save(&*self.state) {
                warn!(error = %e, "could not save settings");
            }
        }
    }
}
