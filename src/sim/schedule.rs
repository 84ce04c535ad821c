//! Fixed-interval timers driven by frame time
//!
//! Every game loop, round countdown and delayed callback is a timer advanced
//! by the elapsed frame time. Stopping a game is dropping or cancelling its
//! timers; nothing is registered with the browser per timer.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};

/// Repeating timer that reports how many whole periods have elapsed
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    period_ms: f64,
    accumulated_ms: f64,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            accumulated_ms: 0.0,
        }
    }

    /// Feed one frame's elapsed time; returns the number of ticks to run.
    ///
    /// A single frame counts for at most `MAX_FRAME_MS` and yields at most
    /// `MAX_SUBSTEPS` ticks. Backlog beyond that is dropped rather than
    /// replayed, so a stalled tab doesn't spiral.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.accumulated_ms += elapsed_ms.clamp(0.0, MAX_FRAME_MS);

        let mut ticks = 0;
        while self.accumulated_ms >= self.period_ms && ticks < MAX_SUBSTEPS {
            self.accumulated_ms -= self.period_ms;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            self.accumulated_ms = self.accumulated_ms.min(self.period_ms - f64::EPSILON).max(0.0);
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }
}

/// One-shot cancellable delay
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Delay {
    #[default]
    Idle,
    Pending { remaining_ms: f64 },
}

impl Delay {
    /// Arm (or re-arm) the delay
    pub fn schedule(&mut self, delay_ms: f64) {
        *self = Delay::Pending {
            remaining_ms: delay_ms.max(0.0),
        };
    }

    pub fn cancel(&mut self) {
        *self = Delay::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Delay::Pending { .. })
    }

    /// Count down; returns true exactly once, when the delay fires
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        match self {
            Delay::Idle => false,
            Delay::Pending { remaining_ms } => {
                *remaining_ms -= elapsed_ms.max(0.0);
                if *remaining_ms <= 0.0 {
                    *self = Delay::Idle;
                    true
                } else {
                    false
                }
            }
        }
    }
}
