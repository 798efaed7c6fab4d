//! Recording fakes for countdown collaborators.

use crate::core::models::RunState;
use crate::core::traits::{AudioCue, PresentationSink};
use std::cell::RefCell;
use std::rc::Rc;

/// Everything a countdown did to its sink and audio, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Time(String),
    Progress(f64),
    Urgent(bool),
    Finished(bool),
    SetupPanel,
    RunningPanel,
    State(RunState),
    Beep,
    Completion,
}

/// Shared, append-only call log
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn times(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Time(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    /// Display text that was showing each time a beep fired
    pub fn beep_times(&self) -> Vec<String> {
        let mut current = String::new();
        let mut beeps = Vec::new();
        for call in self.calls.borrow().iter() {
            match call {
                Call::Time(t) => current = t.clone(),
                Call::Beep => beeps.push(current.clone()),
                _ => {}
            }
        }
        beeps
    }
}

pub struct RecordingSink {
    log: CallLog,
}

impl RecordingSink {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl PresentationSink for RecordingSink {
    fn render_time(&mut self, formatted: &str) {
        self.log.push(Call::Time(formatted.to_string()));
    }

    fn render_progress(&mut self, fraction: f64) {
        self.log.push(Call::Progress(fraction));
    }

    fn set_urgent(&mut self, urgent: bool) {
        self.log.push(Call::Urgent(urgent));
    }

    fn set_finished(&mut self, finished: bool) {
        self.log.push(Call::Finished(finished));
    }

    fn show_setup_panel(&mut self) {
        self.log.push(Call::SetupPanel);
    }

    fn show_running_panel(&mut self) {
        self.log.push(Call::RunningPanel);
    }

    fn set_run_state(&mut self, state: RunState) {
        self.log.push(Call::State(state));
    }
}

pub struct RecordingAudio {
    log: CallLog,
}

impl RecordingAudio {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl AudioCue for RecordingAudio {
    fn play_beep(&mut self) -> anyhow::Result<()> {
        self.log.push(Call::Beep);
        Ok(())
    }

    fn play_completion(&mut self) -> anyhow::Result<()> {
        self.log.push(Call::Completion);
        Ok(())
    }
}

/// Audio that records the attempt and then fails
pub struct FailingAudio {
    log: CallLog,
}

impl FailingAudio {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl AudioCue for FailingAudio {
    fn play_beep(&mut self) -> anyhow::Result<()> {
        self.log.push(Call::Beep);
        anyhow::bail!("no output device")
    }

    fn play_completion(&mut self) -> anyhow::Result<()> {
        self.log.push(Call::Completion);
        anyhow::bail!("no output device")
    }
}
