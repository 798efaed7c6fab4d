use crate::application::state::AppState;
use crate::cli_handlers::CliCommand;
use crate::core::models::TickCadence;
use crate::core::traits::StorageBackend;
use crate::modules::storage::json_backend::JsonStorageBackend;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::{amplitude_to_volume, volume_percent_to_amplitude};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

// ── Volume ────────────────────────────────────────────────────────────────────
pub struct VolumeCommand {
    pub volume: Option<u8>,
}

impl CliCommand for VolumeCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let storage = JsonStorageBackend::new()?;
        let ui = TerminalRenderer::new();

        match self.volume {
            Some(vol) => {
                update_settings(&storage, |state| {
                    state.config.volume = volume_percent_to_amplitude(vol);
                })?;
                ui.print_message(&format!("Volume set to: {}%", vol));
            }
            None => {
                let state = storage.load()?;
                let current_percent = amplitude_to_volume(state.config.volume);
                ui.print_message(&format!("Current volume: {}%", current_percent));
            }
        }

        Ok(())
    }
}

// ── Cadence ───────────────────────────────────────────────────────────────────
pub struct CadenceCommand {
    pub cadence: Option<TickCadence>,
}

impl CliCommand for CadenceCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let storage = JsonStorageBackend::new()?;
        let ui = TerminalRenderer::new();

        match self.cadence {
            Some(cadence) => {
                update_settings(&storage, |state| state.config.cadence = cadence)?;
                ui.print_message(&format!(
                    "Cadence set to: {} ({})",
                    cadence,
                    cadence_description(cadence)
                ));
            }
            None => {
                let cadence = storage.load()?.config.cadence;
                ui.print_message(&format!(
                    "Current cadence: {} ({})",
                    cadence,
                    cadence_description(cadence)
                ));
            }
        }

        Ok(())
    }
}

/// Human-readable label used in terminal feedback messages
fn cadence_description(cadence: TickCadence) -> &'static str {
    match cadence {
        TickCadence::Frame => "smooth, every frame",
        TickCadence::Second => "once per second",
    }
}

// ── Horn ──────────────────────────────────────────────────────────────────────
pub struct HornCommand {
    pub path: Option<PathBuf>,
    pub clear: bool,
}

impl CliCommand for HornCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let storage = JsonStorageBackend::new()?;
        let ui = TerminalRenderer::new();

        if self.clear {
            update_settings(&storage, |state| state.config.horn_path = None)?;
            ui.print_message("Completion sound reset to the built-in horn");
            return Ok(());
        }

        match self.path {
            Some(path) if !path.is_file() => {
                ui.print_error(&format!("Not a file: {}", path.display()));
            }
            Some(path) => {
                let path = path.canonicalize().unwrap_or(path);
                ui.print_message(&format!("Completion sound set to: {}", path.display()));
                update_settings(&storage, |state| state.config.horn_path = Some(path))?;
            }
            None => {
                let state = storage.load()?;
                match state.config.horn_path {
                    Some(path) => ui.print_message(&format!("Completion sound: {}", path.display())),
                    None => ui.print_message("Completion sound: built-in horn"),
                }
            }
        }

        Ok(())
    }
}

/// Load, modify and save the settings file in one go
fn update_settings(storage: &dyn StorageBackend, change: impl FnOnce(&mut AppState)) -> Result<()> {
    let mut state = storage.load()?;
    change(&mut state);
    storage.save(&state)?;
    info!(config = ?state.config, "settings updated");
    Ok(())
}
