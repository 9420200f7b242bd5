//! Deterministic random stream for wander and dithering
//!
//! Every replica of an agent must draw the same numbers in the same order,
//! so the stream is built on ChaCha8, whose output is specified
//! independently of platform word size. `SmallRng` is not.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded per-agent random stream
#[derive(Debug, Clone)]
pub struct SteeringRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SteeringRng {
    /// Create a stream from a seed
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed this stream was built from
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.r#gen::<f32>()
    }

    /// Next float in (-1, 1)
    pub fn next_clamped(&mut self) -> f32 {
        self.next_f32() - self.next_f32()
    }

    /// Next raw integer
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Next raw 64-bit integer
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}
