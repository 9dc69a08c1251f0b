// Formation JavaScript Fuzzing Infrastructure
// Core library definition

pub mod constants;
pub mod error;
pub mod random;
pub mod utils;

// Syntax tree and traversal
pub mod ast;
pub mod traverse;

// Core modules
pub mod generators;
pub mod mutators;
pub mod reporters;

// Re-exports for convenience
pub use ast::{print_program, PrintStyle, Program};
pub use error::{FuzzError, FuzzResult};
pub use mutators::{MutationStats, Mutator, TryCatchConfig, TryCatchMutator};
pub use random::{seeded, RandomSource, ScriptedRandom};

/// Initialize the fuzzing infrastructure
///
/// Logs the active mode. Should be called at the start of each fuzzing
/// binary, after the logger is set up.
pub fn init() {
    log::info!("Initializing Formation JavaScript fuzzing infrastructure");
    log::info!("Fuzzing mode: {}", utils::get_fuzzing_mode());
}
