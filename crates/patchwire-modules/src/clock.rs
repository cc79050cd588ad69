//! Step clock for the sequencer and slicer.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use libm::{floor, fmod};

/// Number of steps in every step sequence.
pub const STEPS: usize = 8;

/// Seconds between steps at `bpm` quarter notes per minute, `subdivision`
/// steps per beat.
pub fn step_interval(bpm: f64, subdivision: f64) -> f64 {
    60.0 / bpm / subdivision
}

/// Accumulates elapsed time and fires steps at a fixed interval.
///
/// The first step fires one full interval after [`reset`](Self::reset),
/// then the position wraps around [`STEPS`].
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    elapsed: f64,
    position: usize,
}

impl StepClock {
    /// A clock positioned before step 0.
    pub const fn new() -> Self {
        Self {
            elapsed: 0.0,
            position: 0,
        }
    }

    /// Rewinds to step 0 and discards accumulated time.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.position = 0;
    }

    /// Index of the step that fires next.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advances by `seconds` and returns the indices of the steps that
    /// fired, in order.
    ///
    /// At most one full cycle of [`STEPS`] is returned. Steps elapsed
    /// before the last cycle are skipped, but the position still lands
    /// where it would have had every step fired.
    pub fn advance(&mut self, seconds: f64, interval: f64) -> Vec<usize> {
        let mut fired = Vec::new();
        if !(interval > 0.0) || !seconds.is_finite() || seconds <= 0.0 {
            return fired;
        }
        self.elapsed += seconds;
        if self.elapsed < interval {
            return fired;
        }

        let due = floor(self.elapsed / interval);
        let rest = fmod(self.elapsed, interval);
        self.elapsed = if rest.is_finite() { rest } else { 0.0 };

        let cycle = STEPS as f64;
        if due > cycle {
            let skipped = fmod(due - cycle, cycle);
            if skipped.is_finite() {
                self.position = (self.position + skipped as usize) % STEPS;
            }
        }

        let count = if due < cycle { due as usize } else { STEPS };
        fired.reserve(count);
        for _ in 0..count {
            fired.push(self.position);
            self.position = (self.position + 1) % STEPS;
        }
        fired
    }
}
