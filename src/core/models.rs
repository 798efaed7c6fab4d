use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::utils::{parse_field, MAX_MINUTES, MAX_SECONDS};

/// Lifecycle of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Which panel the UI should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Setup,
    Running,
}

/// Input field focused on the setup panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputField {
    #[default]
    Minutes,
    Seconds,
}

impl InputField {
    pub fn other(self) -> Self {
        match self {
            InputField::Minutes => InputField::Seconds,
            InputField::Seconds => InputField::Minutes,
        }
    }

    /// Largest value the field accepts
    pub fn max(self) -> u32 {
        match self {
            InputField::Minutes => MAX_MINUTES,
            InputField::Seconds => MAX_SECONDS,
        }
    }
}

/// How often the tick driver fires while a countdown runs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TickCadence {
    /// Every display frame (~60 Hz): smooth reveal, precise second boundaries
    #[default]
    Frame,
    /// Once per second
    Second,
}

impl TickCadence {
    pub fn interval(self) -> Duration {
        match self {
            TickCadence::Frame => Duration::from_millis(16),
            TickCadence::Second => Duration::from_millis(1000),
        }
    }
}

impl fmt::Display for TickCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickCadence::Frame => f.write_str("frame"),
            TickCadence::Second => f.write_str("second"),
        }
    }
}

/// A user-entered duration, clamped to what the setup panel allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerInput {
    minutes: u8,
    seconds: u8,
}

impl TimerInput {
    /// Builds an input, clamping minutes to 0-99 and seconds to 0-59.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(MAX_MINUTES) as u8,
            seconds: seconds.min(MAX_SECONDS) as u8,
        }
    }

    /// Builds an input from raw text fields. Anything that is not a number counts as zero.
    pub fn from_fields(minutes: &str, seconds: &str) -> Self {
        Self::new(parse_field(minutes), parse_field(seconds))
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.minutes as u32 * 60 + self.seconds as u32
    }
}

/// One stretch of counting, from start or resume until pause, reset or finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownRun {
    started_at_ms: u64,
    end_at_ms: u64,
    duration_ms: u64,
}

impl CountdownRun {
    pub fn begin(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            started_at_ms: now_ms,
            end_at_ms: now_ms.saturating_add(duration_ms),
            duration_ms,
        }
    }

    /// Milliseconds left at `now_ms`, zero once the deadline has passed
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.end_at_ms.saturating_sub(now_ms)
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn end_at_ms(&self) -> u64 {
        self.end_at_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
