use crate::core::traits::AudioCue;
use anyhow::Result;
use tracing::debug;

/// Cue player for `--mute` or machines without an output device.
pub struct SilentCuePlayer;

impl AudioCue for SilentCuePlayer {
    fn play_beep(&mut self) -> Result<()> {
        debug!("beep (muted)");
        Ok(())
    }

    fn play_completion(&mut self) -> Result<()> {
        debug!("completion sound (muted)");
        Ok(())
    }
}
