// form-jsfuzz/src/mutators/try_catch/params.rs
//! Per-unit mutation parameters
//!
//! A [`MutationContext`] is sampled when a compilation unit starts and
//! dropped when its pass ends.

use log::debug;

use super::position::PositionTracker;
use super::{TryCatchConfig, MUTATOR_NAME};
use crate::ast::Program;
use crate::constants::{MAX_SAMPLED_SKIP_PROB, MAX_SAMPLED_TOPLEVEL_PROB};
use crate::mutators::annotate;
use crate::random::RandomSource;

#[derive(Debug, Clone, PartialEq)]
pub struct MutationContext {
    /// Probability to skip a node (and its subtree), scaled by the position
    pub skip_probability: f64,
    /// Probability to wrap a node before descending, i.e. to not nest
    pub toplevel_probability: f64,
    pub position: PositionTracker,
    deviated: bool,
}

impl MutationContext {
    pub fn new(skip_probability: f64, toplevel_probability: f64) -> Self {
        Self {
            skip_probability,
            toplevel_probability,
            position: PositionTracker::new(),
            deviated: false,
        }
    }

    /// Start a unit with the configured probabilities. With low probability
    /// both are resampled for the whole unit and the values are recorded as
    /// an annotation on the unit root.
    pub fn sample(
        program: &mut Program,
        config: &TryCatchConfig,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut context = Self::new(config.skip_probability, config.toplevel_probability);
        if rng.choose(config.ignore_default_probability) {
            context.skip_probability = rng.uniform(0.0, MAX_SAMPLED_SKIP_PROB);
            context.toplevel_probability = rng.uniform(0.0, MAX_SAMPLED_TOPLEVEL_PROB);
            context.deviated = true;
            debug!(
                "deviating from defaults: skip={} toplevel={}",
                context.skip_probability, context.toplevel_probability
            );
            annotate(
                program,
                MUTATOR_NAME,
                format!(
                    "Target skip probability {} and toplevel probability {}",
                    context.skip_probability, context.toplevel_probability
                ),
            );
        }
        context
    }

    /// True if the probabilities were resampled for this unit
    pub fn is_deviated(&self) -> bool {
        self.deviated
    }

    /// Draws below this value skip the node
    pub fn skip_threshold(&self) -> f64 {
        self.skip_probability * self.position.current_fraction()
    }

    /// Draws below this value (and not skipped) wrap the node right away.
    /// When it exceeds 1 the deferred band is empty.
    pub fn wrap_threshold(&self) -> f64 {
        self.skip_probability + self.toplevel_probability
    }
}
