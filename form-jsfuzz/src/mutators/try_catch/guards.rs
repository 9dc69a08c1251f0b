// form-jsfuzz/src/mutators/try_catch/guards.rs
//! Syntax guard rules
//!
//! Decide which nodes may be wrapped without producing invalid code or
//! changing what a binding is visible to. Anything not explicitly listed as
//! wrappable is left alone.

use crate::ast::{Block, DeclarationKind, Statement, VariableDeclarator};
use crate::traverse::{BlockRole, DeclarationSite, ParentKind};

/// Declaration kinds whose declarators get their initializer wrapped.
/// `var` is wrapped at the statement level instead; `using` and
/// `await using` are not supported.
pub const WRAPPABLE_DECLARATION_KINDS: [DeclarationKind; 2] =
    [DeclarationKind::Let, DeclarationKind::Const];

/// How a block is handled when the walk reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRule {
    /// Body of an existing `try`; neither wrapped nor descended into
    Untouchable,
    /// Non-empty function body; one wrap decision for the whole function
    FunctionBody,
    /// Descend without a decision
    Traverse,
}

/// True if `statement` gets a wrap decision of its own.
pub fn is_wrappable_statement(statement: &Statement, parent: ParentKind) -> bool {
    match statement {
        Statement::Expression(_)
        | Statement::If(_)
        | Statement::Switch(_)
        | Statement::With(_) => true,
        // Wrapping a labeled loop would separate `continue label` from its
        // target; the label is wrapped instead.
        Statement::Loop(_) => parent != ParentKind::Labeled,
        Statement::Labeled(labeled) => labeled.body.is_loop(),
        // `var` bindings are hoisted, so wrapping the statement keeps them
        // visible to later code.
        Statement::VariableDeclaration(declaration) => {
            declaration.kind == DeclarationKind::Var && parent != ParentKind::Loop
        }
        _ => false,
    }
}

pub fn classify_block(block: &Block, role: BlockRole) -> BlockRule {
    match role {
        BlockRole::TryBlock | BlockRole::Finalizer => BlockRule::Untouchable,
        BlockRole::FunctionBody if !block.is_empty() => BlockRule::FunctionBody,
        _ => BlockRule::Traverse,
    }
}

/// True if the initializer of `declarator` gets a wrap decision.
pub fn is_wrappable_declarator(
    declarator: &VariableDeclarator,
    kind: DeclarationKind,
    site: DeclarationSite,
) -> bool {
    let Some(init) = &declarator.init else {
        return false;
    };
    // Literals and `undefined` cannot throw.
    if init.is_literal() || init.is_undefined() {
        return false;
    }
    site == DeclarationSite::Statement && WRAPPABLE_DECLARATION_KINDS.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Loop, Statement, VariableDeclarator};

    fn call() -> Expression {
        Expression::call_ident("compute", vec![])
    }

    fn while_loop() -> Statement {
        Statement::Loop(Loop::While {
            test: Expression::ident("x"),
            body: Box::new(Statement::Empty),
        })
    }

    #[test]
    fn test_labeled_loops_wrap_the_label() {
        assert!(!is_wrappable_statement(&while_loop(), ParentKind::Labeled));
        assert!(is_wrappable_statement(&while_loop(), ParentKind::Block));
        assert!(is_wrappable_statement(
            &Statement::labeled("outer", while_loop()),
            ParentKind::Program
        ));
        assert!(!is_wrappable_statement(
            &Statement::labeled("outer", Statement::block(vec![])),
            ParentKind::Program
        ));
    }

    #[test]
    fn test_only_var_statements_outside_loops() {
        let var = Statement::declaration(
            DeclarationKind::Var,
            vec![VariableDeclarator::new("a", Some(call()))],
        );
        let let_ = Statement::declaration(
            DeclarationKind::Let,
            vec![VariableDeclarator::new("a", Some(call()))],
        );
        assert!(is_wrappable_statement(&var, ParentKind::Block));
        assert!(!is_wrappable_statement(&var, ParentKind::Loop));
        assert!(!is_wrappable_statement(&let_, ParentKind::Block));
    }

    #[test]
    fn test_unclassified_statements_are_left_alone() {
        for statement in [
            Statement::Return(Some(call())),
            Statement::Throw(call()),
            Statement::Break(None),
            Statement::Empty,
            Statement::block(vec![]),
            Statement::marker(0.5),
        ] {
            assert!(!is_wrappable_statement(&statement, ParentKind::Block));
        }
    }

    #[test]
    fn test_block_rules() {
        let body = Block::new(vec![Statement::Return(None)]);
        assert_eq!(classify_block(&body, BlockRole::TryBlock), BlockRule::Untouchable);
        assert_eq!(classify_block(&body, BlockRole::Finalizer), BlockRule::Untouchable);
        assert_eq!(classify_block(&body, BlockRole::FunctionBody), BlockRule::FunctionBody);
        assert_eq!(
            classify_block(&Block::default(), BlockRole::FunctionBody),
            BlockRule::Traverse
        );
        assert_eq!(classify_block(&body, BlockRole::CatchBody), BlockRule::Traverse);
    }

    #[test]
    fn test_declarators_that_cannot_throw_are_skipped() {
        let site = DeclarationSite::Statement;
        let kind = DeclarationKind::Let;
        assert!(!is_wrappable_declarator(&VariableDeclarator::new("a", None), kind, site));
        assert!(!is_wrappable_declarator(
            &VariableDeclarator::new("a", Some(Expression::number(1.0))),
            kind,
            site
        ));
        assert!(!is_wrappable_declarator(
            &VariableDeclarator::new("a", Some(Expression::ident("undefined"))),
            kind,
            site
        ));
        assert!(is_wrappable_declarator(
            &VariableDeclarator::new("a", Some(Expression::ident("other"))),
            kind,
            site
        ));
    }

    #[test]
    fn test_declarator_kinds_and_sites() {
        let declarator = VariableDeclarator::new("a", Some(call()));
        assert!(is_wrappable_declarator(&declarator, DeclarationKind::Const, DeclarationSite::Statement));
        assert!(!is_wrappable_declarator(&declarator, DeclarationKind::Var, DeclarationSite::Statement));
        assert!(!is_wrappable_declarator(&declarator, DeclarationKind::Using, DeclarationSite::Statement));
        assert!(!is_wrappable_declarator(&declarator, DeclarationKind::AwaitUsing, DeclarationSite::Statement));
        assert!(!is_wrappable_declarator(&declarator, DeclarationKind::Let, DeclarationSite::LoopHead));
        assert!(!is_wrappable_declarator(&declarator, DeclarationKind::Let, DeclarationSite::LoopBody));
    }
}
