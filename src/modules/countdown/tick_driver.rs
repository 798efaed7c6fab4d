use crate::core::models::TickCadence;
use crate::core::traits::TickDriver;

/// Fires at a fixed interval while armed.
///
/// Due times stay on the grid `armed_at + k * interval`. A late poll fires
/// once and moves to the next grid point after it, so a slow frame neither
/// shifts the phase nor causes a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct IntervalDriver {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl IntervalDriver {
    pub fn new(cadence: TickCadence) -> Self {
        Self::with_interval_ms(cadence.interval().as_millis() as u64)
    }

    pub fn with_interval_ms(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    #[cfg(test)]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl TickDriver for IntervalDriver {
    fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                let missed = (now_ms - due) / self.interval_ms;
                self.next_due_ms = Some(due + (missed + 1) * self.interval_ms);
                true
            }
            _ => false,
        }
    }
}
