/// Whole seconds at or below which the countdown is urgent
pub const URGENT_THRESHOLD_SECS: u64 = 10;

/// Snapshot of a running countdown at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    remaining_ms: u64,
    elapsed_fraction: f64,
    whole_seconds: u64,
}

impl ProgressSample {
    /// Derives a sample from the configured total and what is left of it.
    ///
    /// # Arguments
    /// * `total_ms` - Duration the countdown was started with
    /// * `remaining_ms` - Time left, already clamped at zero
    ///
    /// A zero total counts as fully elapsed.
    pub fn derive(total_ms: u64, remaining_ms: u64) -> Self {
        let remaining_ms = remaining_ms.min(total_ms);
        let elapsed_fraction = if total_ms == 0 {
            1.0
        } else {
            (1.0 - remaining_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
        };

        Self {
            remaining_ms,
            elapsed_fraction,
            // Round up so "00:00" only shows once time is really out
            whole_seconds: remaining_ms.div_ceil(1000),
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Returns the ratio of elapsed time (0.0 to 1.0)
    pub fn elapsed_fraction(&self) -> f64 {
        self.elapsed_fraction
    }

    /// Seconds shown on the display
    pub fn whole_seconds(&self) -> u64 {
        self.whole_seconds
    }

    pub fn is_urgent(&self) -> bool {
        is_urgent(self.whole_seconds)
    }
}

pub fn is_urgent(whole_seconds: u64) -> bool {
    whole_seconds > 0 && whole_seconds <= URGENT_THRESHOLD_SECS
}
