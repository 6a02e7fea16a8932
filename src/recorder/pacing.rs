//! Frame-rate pacing for the capture loop
//!
//! Each tick sleeps away whatever is left of its time budget. A tick that ran
//! over budget is followed immediately by the next one; lost time is never
//! caught up.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget: Duration,
}

impl FramePacer {
    pub fn with_budget(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left in the budget after `elapsed`, if any
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// Sleep until the tick that began at `tick_start` has used its budget
    ///
    /// Returns how long it slept.
    pub fn pace(&self, tick_start: Instant) -> Duration {
        match self.remaining(tick_start.elapsed()) {
            Some(remaining) => {
                std::thread::sleep(remaining);
                remaining
            }
            None => Duration::ZERO,
        }
    }
}
