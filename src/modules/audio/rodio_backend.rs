use crate::core::traits::AudioCue;
use anyhow::{Context, Result};
use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const BEEP_FREQUENCY_HZ: f32 = 800.0;
const BEEP_DURATION: Duration = Duration::from_millis(100);
const BEEP_GAIN: f32 = 0.1;

// Two detuned tones read as a horn more than a single sine does
const HORN_LOW_HZ: f32 = 233.0;
const HORN_HIGH_HZ: f32 = 294.0;
const HORN_DURATION: Duration = Duration::from_millis(1600);
const HORN_GAIN: f32 = 0.25;

pub struct RodioCuePlayer {
    // Audio stops when the stream is dropped
    _stream: OutputStream,
    handle: OutputStreamHandle,
    horn: Option<Sink>,
    horn_path: Option<PathBuf>,
    volume: f32,
}

impl RodioCuePlayer {
    /// Opens the default output device.
    ///
    /// `horn_path` is an audio file played on completion; without it a
    /// synthesized horn is used.
    pub fn new(horn_path: Option<PathBuf>) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("Failed to open audio output device")?;

        Ok(Self {
            _stream: stream,
            handle,
            horn: None,
            horn_path,
            volume: 1.0,
        })
    }

    fn new_sink(&self) -> Result<Sink> {
        let sink = Sink::try_new(&self.handle).context("Failed to create audio sink")?;
        sink.set_volume(self.volume);
        Ok(sink)
    }

    fn append_horn_file(sink: &Sink, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open horn file: {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode horn file: {}", path.display()))?;
        sink.append(source);
        Ok(())
    }
}

impl AudioCue for RodioCuePlayer {
    fn play_beep(&mut self) -> Result<()> {
        let sink = self.new_sink()?;
        let mut tone = SineWave::new(BEEP_FREQUENCY_HZ).take_duration(BEEP_DURATION);
        tone.set_filter_fadeout();
        sink.append(tone.amplify(BEEP_GAIN));
        sink.detach();
        Ok(())
    }

    fn play_completion(&mut self) -> Result<()> {
        // Replacing the previous sink stops it, so the horn always starts from the top
        let sink = self.new_sink()?;

        let from_file = match &self.horn_path {
            Some(path) => match Self::append_horn_file(&sink, path) {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "falling back to synthesized horn");
                    false
                }
            },
            None => false,
        };
        if !from_file {
            sink.append(synthesized_horn());
        }

        self.horn = Some(sink);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(horn) = &self.horn {
            horn.set_volume(self.volume);
        }
    }
}

fn synthesized_horn() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(HORN_LOW_HZ)
        .mix(SineWave::new(HORN_HIGH_HZ))
        .take_duration(HORN_DURATION)
        .amplify(HORN_GAIN)
}

impl Drop for RodioCuePlayer {
    fn drop(&mut self) {
        if let Some(horn) = &self.horn {
            horn.stop();
        }
    }
}
