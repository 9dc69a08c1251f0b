// form-jsfuzz/src/mutators/try_catch/mod.rs
//! Try/catch wrapping mutator
//!
//! Wraps statements, function bodies and variable initializers of a parsed
//! unit in try/catch handlers. Wrapping keeps generated programs running past
//! exceptions thrown by unrelated code, so later statements still execute.
//!
//! Wrappers have these shapes:
//!
//! ```text
//! S;                      try { S; } catch (e) {}
//! function f() { B }      function f() { try { B } catch (e) {} }
//! let x = E;              let x = __wrapTC(() => E);
//! let x = await E;        let x = await __wrapTC(() => E);
//! ```

pub mod guards;
pub mod params;
pub mod policy;
pub mod position;
pub mod wrappers;

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ast::Program;
use crate::constants::{
    CATCH_PARAM, DEFAULT_SKIP_PROB, DEFAULT_TOPLEVEL_PROB, IGNORE_DEFAULT_PROB, WRAP_HELPER_NAME,
};
use crate::error::{FuzzError, FuzzResult};
use crate::mutators::Mutator;
use crate::random::RandomSource;
use crate::traverse::traverse;

pub use params::MutationContext;
pub use policy::{Decision, MutationStats, TryCatchPass};
pub use position::PositionTracker;
pub use wrappers::{wrap_try_catch, WrapperTemplate};

/// Name used to prefix annotations written by this mutator
pub const MUTATOR_NAME: &str = "TryCatchMutator";

/// Configuration for the try/catch mutator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TryCatchConfig {
    /// Default probability to skip a node, scaled by the source position
    pub skip_probability: f64,
    /// Default probability to wrap a node without descending into it
    pub toplevel_probability: f64,
    /// Probability to resample both of the above for a unit
    pub ignore_default_probability: f64,
    /// Name of the runtime helper used to wrap initializers
    pub helper_name: String,
    /// Binding name of the inserted catch clauses
    pub catch_param: String,
}

impl Default for TryCatchConfig {
    fn default() -> Self {
        Self {
            skip_probability: DEFAULT_SKIP_PROB,
            toplevel_probability: DEFAULT_TOPLEVEL_PROB,
            ignore_default_probability: IGNORE_DEFAULT_PROB,
            helper_name: WRAP_HELPER_NAME.to_string(),
            catch_param: CATCH_PARAM.to_string(),
        }
    }
}

impl TryCatchConfig {
    /// Check that all probabilities are within `[0, 1]` and that the
    /// inserted names are usable identifiers.
    pub fn validate(&self) -> FuzzResult<()> {
        let probabilities = [
            ("skip_probability", self.skip_probability),
            ("toplevel_probability", self.toplevel_probability),
            ("ignore_default_probability", self.ignore_default_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(FuzzError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("helper_name", &self.helper_name),
            ("catch_param", &self.catch_param),
        ] {
            if !is_identifier(value) {
                return Err(FuzzError::InvalidConfig(format!(
                    "{} is not a valid identifier: {:?}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file. Missing fields keep
    /// their defaults.
    pub fn from_file(path: &Path) -> FuzzResult<Self> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn template(&self) -> WrapperTemplate {
        WrapperTemplate::new(self.helper_name.clone(), self.catch_param.clone())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Mutator wrapping parts of a unit in try/catch handlers
#[derive(Debug, Clone)]
pub struct TryCatchMutator {
    config: TryCatchConfig,
    template: WrapperTemplate,
}

impl Default for TryCatchMutator {
    fn default() -> Self {
        Self::new()
    }
}

impl TryCatchMutator {
    pub const NAME: &'static str = MUTATOR_NAME;

    pub fn new() -> Self {
        let config = TryCatchConfig::default();
        Self {
            template: config.template(),
            config,
        }
    }

    pub fn with_config(config: TryCatchConfig) -> FuzzResult<Self> {
        config.validate()?;
        Ok(Self {
            template: config.template(),
            config,
        })
    }

    pub fn config(&self) -> &TryCatchConfig {
        &self.config
    }

    /// Mutate one unit and report what the pass did
    pub fn mutate_with_stats(
        &self,
        program: &mut Program,
        rng: &mut dyn RandomSource,
    ) -> MutationStats {
        let context = MutationContext::sample(program, &self.config, rng);
        let mut pass = TryCatchPass::new(context, &self.template, rng);
        traverse(program, &mut pass);
        let stats = pass.finish();
        debug!(
            "{}: {} decisions, {} skipped, {} wrapped now, {} wrapped late",
            Self::NAME,
            stats.decisions,
            stats.skipped,
            stats.wrapped_now,
            stats.wrapped_late
        );
        stats
    }
}

impl Mutator<Program> for TryCatchMutator {
    fn mutate(&self, input: &mut Program, rng: &mut dyn RandomSource) {
        self.mutate_with_stats(input, rng);
    }
}
