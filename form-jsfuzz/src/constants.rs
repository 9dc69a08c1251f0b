// form-jsfuzz/src/constants.rs
//! Shared constants for the fuzzing infrastructure

/// Default target probability for skipping the try-catch wrapper entirely
pub const DEFAULT_SKIP_PROB: f64 = 0.05;

/// Default target probability to wrap on top-level only, i.e. to not nest
pub const DEFAULT_TOPLEVEL_PROB: f64 = 0.5;

/// Probability to deviate from the defaults for a whole compilation unit
pub const IGNORE_DEFAULT_PROB: f64 = 0.03;

/// Upper bound (exclusive) for a resampled skip probability
pub const MAX_SAMPLED_SKIP_PROB: f64 = 0.5;

/// Upper bound (exclusive) for a resampled toplevel probability
pub const MAX_SAMPLED_TOPLEVEL_PROB: f64 = 1.0;

/// Runtime helper called by wrapped initializers. Defined by the fuzz library
/// that gets prepended to every test case.
pub const WRAP_HELPER_NAME: &str = "__wrapTC";

/// Binding name of the generated catch clauses
pub const CATCH_PARAM: &str = "e";

/// Default corpus directory
pub const DEFAULT_CORPUS_DIR: &str = "./fuzzing-corpus";

/// Default artifact directory
pub const DEFAULT_ARTIFACT_DIR: &str = "./fuzzing-artifacts";

/// Environment variables understood by the binaries
pub mod env {
    /// Fuzzing mode, see [`super::modes`]
    pub const MODE: &str = "FORM_JSFUZZ_MODE";
    /// Seed of the mutation stream
    pub const SEED: &str = "FORM_JSFUZZ_SEED";
    /// Corpus base directory
    pub const CORPUS_DIR: &str = "FORM_JSFUZZ_CORPUS_DIR";
    /// Artifact base directory
    pub const ARTIFACTS_DIR: &str = "FORM_JSFUZZ_ARTIFACTS_DIR";
    /// Number of mutated variants per input
    pub const ITERATIONS: &str = "FORM_JSFUZZ_ITERATIONS";
}

/// Fuzzing targets
pub mod targets {
    /// Try-catch wrapping of JavaScript sources
    pub const TRY_CATCH: &str = "try_catch";
}

/// Fuzzing modes
pub mod modes {
    /// Standard fuzzing mode
    pub const STANDARD: &str = "standard";
    /// Quick fuzzing mode (one variant per input)
    pub const QUICK: &str = "quick";
    /// Thorough fuzzing mode (many variants per input)
    pub const THOROUGH: &str = "thorough";
    /// CI mode (optimized for continuous integration)
    pub const CI: &str = "ci";
}
