//! Fixed Timestep
//!
//! Turns variable frame deltas into a bounded number of fixed simulation
//! steps. The frame delta is clamped so a long hitch (window drag, debugger
//! pause) cannot queue up an unbounded catch-up burst.

/// Largest frame delta accepted per call (seconds).
pub const MAX_FRAME_DELTA_S: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_steps_per_frame: u32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 8)
    }
}

impl FixedTimestep {
    /// `step` must be positive; non-positive values fall back to 1/60 s.
    pub fn new(step: f32, max_steps_per_frame: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            1.0 / 60.0
        };
        Self {
            step,
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn max_steps_per_frame(&self) -> u32 {
        self.max_steps_per_frame
    }

    /// Feed one frame delta. Returns how many fixed steps should run now.
    pub fn advance(&mut self, frame_delta: f32) -> usize {
        let frame_delta = if frame_delta.is_finite() {
            frame_delta.clamp(0.0, MAX_FRAME_DELTA_S)
        } else {
            0.0
        };
        let budget = self.step * self.max_steps_per_frame as f32;
        self.accumulator = (self.accumulator + frame_delta).min(budget);

        let mut steps = 0usize;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame as usize {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    /// Drop any accumulated time, e.g. after loading a level or unpausing.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
