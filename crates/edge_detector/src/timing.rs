// Shared running total of per-image processing time.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Sum of the end-to-end durations of every finished image.
///
/// Handed to each image orchestrator behind an `Arc`; updates are a
/// read-modify-write under one lock so no contribution is lost.
#[derive(Debug, Default)]
pub struct ElapsedAccumulator {
    total: Mutex<Duration>,
}

impl ElapsedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, elapsed: Duration) {
        // the guarded value is always a whole Duration, poisoning is ignored
        let mut total = self.total.lock().unwrap_or_else(PoisonError::into_inner);
        *total += elapsed;
    }

    pub fn total(&self) -> Duration {
        *self.total.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Seconds with four decimal places, as printed in the timing report.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.4}", duration.as_secs_f64())
}
