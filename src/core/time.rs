//! Frame clock

use std::time::{Duration, Instant};

/// Tracks the elapsed time between simulation frames.
///
/// In fixed-step mode every `update()` advances by the same delta, which is
/// what a replicated simulation wants. Otherwise the delta is measured from
/// the wall clock and is never negative.
#[derive(Debug, Clone)]
pub struct Time {
    last: Instant,
    delta: Duration,
    elapsed: Duration,
    fixed_step: Option<Duration>,
    frame: u64,
}

impl Time {
    /// Create a wall-clock timer
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            fixed_step: None,
            frame: 0,
        }
    }

    /// Create a timer that advances by `step` seconds every frame
    pub fn fixed(step: f32) -> Self {
        Self {
            fixed_step: Some(Duration::from_secs_f32(step.max(0.0))),
            ..Self::new()
        }
    }

    /// Advance one frame
    pub fn update(&mut self) {
        self.delta = match self.fixed_step {
            Some(step) => step,
            None => {
                let now = Instant::now();
                let delta = now.saturating_duration_since(self.last);
                self.last = now;
                delta
            }
        };
        self.elapsed += self.delta;
        self.frame += 1;
    }

    /// Delta of the last frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta of the last frame in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total simulated time
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
