// form-jsfuzz/src/mutators/try_catch/policy.rs
//! Stochastic wrap policy
//!
//! Every eligible node draws once at entry:
//!
//! * below `skip * position`: skipped, together with its subtree
//! * below `skip + toplevel`: wrapped right away; the replacement is final
//! * otherwise deferred: children are visited and may be wrapped themselves,
//!   then the node is wrapped at exit, which nests the handlers
//!
//! Skipped and immediately wrapped nodes never reach their exit hook, so each
//! eligible node is wrapped at most once per pass.

use std::mem;

use log::trace;
use serde::{Deserialize, Serialize};

use super::guards::{self, BlockRule};
use super::params::MutationContext;
use super::wrappers::WrapperTemplate;
use crate::ast::{Block, DeclarationKind, PositionMarker, Statement, VariableDeclarator};
use crate::random::RandomSource;
use crate::traverse::{BlockRole, DeclarationSite, ParentKind, Visit, Visitor};

/// Outcome of the entry draw for an eligible node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skipped,
    WrappedNow,
    Deferred,
}

/// Counters of one mutation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationStats {
    /// Eligible nodes that drew a decision
    pub decisions: usize,
    pub skipped: usize,
    pub wrapped_now: usize,
    pub deferred: usize,
    /// Deferred nodes wrapped at exit
    pub wrapped_late: usize,
    /// Whether the unit used resampled probabilities
    pub parameters_deviated: bool,
}

impl MutationStats {
    /// Total number of wrappers inserted
    pub fn wrapped(&self) -> usize {
        self.wrapped_now + self.wrapped_late
    }

    fn record(&mut self, decision: Decision) {
        self.decisions += 1;
        match decision {
            Decision::Skipped => self.skipped += 1,
            Decision::WrappedNow => self.wrapped_now += 1,
            Decision::Deferred => self.deferred += 1,
        }
    }
}

/// Visitor applying the policy to one compilation unit
pub struct TryCatchPass<'a> {
    context: MutationContext,
    template: &'a WrapperTemplate,
    rng: &'a mut dyn RandomSource,
    stats: MutationStats,
}

impl<'a> TryCatchPass<'a> {
    pub fn new(
        context: MutationContext,
        template: &'a WrapperTemplate,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        let stats = MutationStats {
            parameters_deviated: context.is_deviated(),
            ..MutationStats::default()
        };
        Self {
            context,
            template,
            rng,
            stats,
        }
    }

    pub fn context(&self) -> &MutationContext {
        &self.context
    }

    pub fn finish(self) -> MutationStats {
        self.stats
    }

    /// Draw the band for the node being entered
    pub fn decide(&mut self) -> Decision {
        let draw = self.rng.random();
        let decision = if draw < self.context.skip_threshold() {
            Decision::Skipped
        } else if draw < self.context.wrap_threshold() {
            Decision::WrappedNow
        } else {
            Decision::Deferred
        };
        trace!(
            "draw {:.4} at position {:.3}: {:?}",
            draw,
            self.context.position.current_fraction(),
            decision
        );
        self.stats.record(decision);
        decision
    }

    fn apply<T: ?Sized>(&mut self, node: &mut T, wrap: fn(&Self, &mut T)) -> Visit {
        match self.decide() {
            Decision::Skipped => Visit::SkipSubtree,
            Decision::WrappedNow => {
                wrap(self, node);
                Visit::SkipSubtree
            }
            Decision::Deferred => Visit::Continue,
        }
    }

    fn wrap_statement(&self, statement: &mut Statement) {
        let original = mem::replace(statement, Statement::Empty);
        *statement = self.template.statement(original);
    }

    fn wrap_function_body(&self, block: &mut Block) {
        let original = mem::take(block);
        *block = self.template.block(original);
    }

    fn wrap_initializer(&self, declarator: &mut VariableDeclarator) {
        if let Some(init) = declarator.init.take() {
            declarator.init = Some(self.template.initializer(init));
        }
    }
}

impl Visitor for TryCatchPass<'_> {
    fn visit_marker(&mut self, marker: &PositionMarker) {
        if let Some(fraction) = marker.source_fraction {
            self.context.position.observe(fraction);
        }
    }

    fn enter_statement(&mut self, statement: &mut Statement, parent: ParentKind) -> Visit {
        if !guards::is_wrappable_statement(statement, parent) {
            return Visit::Continue;
        }
        self.apply(statement, Self::wrap_statement)
    }

    fn exit_statement(&mut self, statement: &mut Statement, parent: ParentKind) {
        // Only deferred nodes get here.
        if guards::is_wrappable_statement(statement, parent) {
            self.wrap_statement(statement);
            self.stats.wrapped_late += 1;
        }
    }

    fn enter_block(&mut self, block: &mut Block, role: BlockRole) -> Visit {
        match guards::classify_block(block, role) {
            BlockRule::Untouchable => Visit::SkipSubtree,
            // A deferred body is descended into and not wrapped again.
            BlockRule::FunctionBody => self.apply(block, Self::wrap_function_body),
            BlockRule::Traverse => Visit::Continue,
        }
    }

    fn enter_declarator(
        &mut self,
        declarator: &mut VariableDeclarator,
        kind: DeclarationKind,
        site: DeclarationSite,
    ) -> Visit {
        if !guards::is_wrappable_declarator(declarator, kind, site) {
            return Visit::Continue;
        }
        self.apply(declarator, Self::wrap_initializer)
    }

    fn exit_declarator(
        &mut self,
        declarator: &mut VariableDeclarator,
        kind: DeclarationKind,
        site: DeclarationSite,
    ) {
        if guards::is_wrappable_declarator(declarator, kind, site) {
            self.wrap_initializer(declarator);
            self.stats.wrapped_late += 1;
        }
    }
}
