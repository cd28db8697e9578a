//! Injectable uniform random source.
//!
//! Every random draw in the simulation goes through [`RandomSource`] so tests
//! can substitute a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// Uniform float in `[low, high)`.
    fn uniform_range(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_uniform() * (high - low)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_uniform() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_uniform(&mut self) -> f64 {
        self()
    }
}

/// Pseudo-random source backed by `StdRng`.
pub struct RngSource {
    rng: StdRng,
}

impl RngSource {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is set, otherwise from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for RngSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    next: usize,
}

impl SequenceSource {
    /// Cycle through `values`.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// Always yields the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.next % self.values.len()];
        self.next = (self.next + 1) % self.values.len();
        value
    }
}
