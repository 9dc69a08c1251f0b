// form-jsfuzz/src/random.rs
//! Random sources driving the mutators
//!
//! Every random decision of a pass is drawn from one explicitly passed,
//! sequential stream. Campaigns seed a `rand::rngs::StdRng`, so the same seed
//! and input reproduce the same mutated tree.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws used by mutators and generators
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn random(&mut self) -> f64;

    /// Uniform value in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.random()
    }

    /// True with the given probability
    fn choose(&mut self, probability: f64) -> bool {
        self.random() < probability
    }

    /// Uniform index into a collection of `len` elements (`0` when empty)
    fn index(&mut self, len: usize) -> usize {
        let index = (self.random() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

impl<R: Rng> RandomSource for R {
    fn random(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Seeded generator for reproducible campaigns
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Replays a fixed sequence of draws.
///
/// Used to reproduce a recorded decision sequence during triage. Draws past
/// the end of the script repeat the last value, or `0.0` for an empty script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Number of values drawn so far
    pub fn draws_consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn random(&mut self) -> f64 {
        let value = self
            .draws
            .get(self.cursor)
            .or_else(|| self.draws.last())
            .copied()
            .unwrap_or(0.0);
        self.cursor += 1;
        value
    }
}
