// form-jsfuzz/src/generators/mod.rs
//! Input generators for fuzz testing the mutators

pub mod program;

use crate::random::RandomSource;

pub use program::ProgramGenerator;

/// Generator trait for creating fuzzable inputs
pub trait Generator<T> {
    /// Generate a new random instance of T
    fn generate(&self, rng: &mut dyn RandomSource) -> T;

    /// Generate a set of new random instances of T
    fn generate_set(&self, rng: &mut dyn RandomSource, count: usize) -> Vec<T> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}
