//! Time-driven progress estimate for generation calls.
//!
//! The backend reports no real progress, so the UI shows a cosmetic ramp:
//! a 2% floor on start, climbing at 7.5%/s, held at 90% until the call
//! completes, then pinned to 100. The contract that matters: never above
//! 100, never backwards while active, 100 only on completion, 0 again on
//! the next start.

use std::time::{Duration, Instant};

/// Pure ramp: percentage shown after `elapsed` of an active generation.
pub fn percent_at(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * 7.5).clamp(2.0, 90.0)
}

/// Progress state for one generation operation.
#[derive(Debug, Clone, Default)]
pub struct ProgressEstimate {
    started: Option<Instant>,
    finished: bool,
}

impl ProgressEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new ramp, discarding any previous completion state.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.finished = false;
    }

    /// Pin to 100%. Called when the operation completes, success or not.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_active(&self) -> bool {
        self.started.is_some() && !self.finished
    }

    pub fn percent(&self) -> f32 {
        match self.started {
            None => 0.0,
            Some(_) if self.finished => 100.0,
            Some(started) => percent_at(started.elapsed()),
        }
    }
}
