// form-jsfuzz/src/mutators/mod.rs
//! Mutators for syntax trees of the corpus

pub mod try_catch;

use crate::ast::Program;
use crate::random::RandomSource;

pub use try_catch::{MutationStats, TryCatchConfig, TryCatchMutator};

/// Trait for mutating fuzzable inputs
pub trait Mutator<T> {
    /// Mutate the given input, drawing all randomness from `rng`
    fn mutate(&self, input: &mut T, rng: &mut dyn RandomSource);

    /// Apply multiple mutations to the input
    fn mutate_multiple(&self, input: &mut T, rng: &mut dyn RandomSource, count: usize) {
        for _ in 0..count {
            self.mutate(input, rng);
        }
    }
}

/// A composite mutator that applies multiple mutators in sequence
pub struct CompositeMutator<T> {
    mutators: Vec<Box<dyn Mutator<T>>>,
}

impl<T> Default for CompositeMutator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CompositeMutator<T> {
    pub fn new() -> Self {
        Self {
            mutators: Vec::new(),
        }
    }

    pub fn add_mutator(&mut self, mutator: Box<dyn Mutator<T>>) {
        self.mutators.push(mutator);
    }

    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }
}

impl<T> Mutator<T> for CompositeMutator<T> {
    fn mutate(&self, input: &mut T, rng: &mut dyn RandomSource) {
        // Apply each mutator in sequence
        for mutator in &self.mutators {
            mutator.mutate(input, rng);
        }
    }
}

/// Attach a diagnostic note to the unit root, prefixed with the mutator name
pub fn annotate(program: &mut Program, mutator_name: &str, message: impl AsRef<str>) {
    program
        .comments
        .push(format!("{}: {}", mutator_name, message.as_ref()));
}
