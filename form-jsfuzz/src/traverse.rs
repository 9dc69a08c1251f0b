// form-jsfuzz/src/traverse.rs
//! Depth-first traversal with entry/exit hooks
//!
//! Hooks run in strict pre/post-order: a node's entry hook runs before any of
//! its children are visited and its exit hook runs after all of them.
//! Returning [`Visit::SkipSubtree`] from an entry hook suppresses both the
//! descent and the node's own exit hook, so a hook that replaced its node in
//! place can return it to keep the replacement out of the current pass.

use crate::ast::{
    ArrowBody, Block, DeclarationKind, Expression, ForHead, ForInit, Function, Loop,
    PositionMarker, Program, Statement, VariableDeclaration, VariableDeclarator,
};

/// Result of an entry hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    SkipSubtree,
}

/// Syntactic parent of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Program,
    Block,
    SwitchCase,
    Labeled,
    Loop,
    If,
    With,
}

/// What a block is the body of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRole {
    /// Free-standing block statement
    Statement,
    FunctionBody,
    TryBlock,
    CatchBody,
    Finalizer,
}

/// Where a variable declaration appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationSite {
    /// Ordinary declaration statement
    Statement,
    /// `for` initializer or `for-in`/`for-of` left-hand side
    LoopHead,
    /// Declaration statement used directly as a loop body
    LoopBody,
}

/// Hooks invoked by [`traverse`]. All hooks default to doing nothing.
pub trait Visitor {
    fn enter_program(&mut self, _program: &mut Program) {}

    fn exit_program(&mut self, _program: &mut Program) {}

    fn enter_statement(&mut self, _statement: &mut Statement, _parent: ParentKind) -> Visit {
        Visit::Continue
    }

    fn exit_statement(&mut self, _statement: &mut Statement, _parent: ParentKind) {}

    fn enter_block(&mut self, _block: &mut Block, _role: BlockRole) -> Visit {
        Visit::Continue
    }

    fn enter_declarator(
        &mut self,
        _declarator: &mut VariableDeclarator,
        _kind: DeclarationKind,
        _site: DeclarationSite,
    ) -> Visit {
        Visit::Continue
    }

    fn exit_declarator(
        &mut self,
        _declarator: &mut VariableDeclarator,
        _kind: DeclarationKind,
        _site: DeclarationSite,
    ) {
    }

    /// Called when the walk reaches a position marker, before its entry hook
    fn visit_marker(&mut self, _marker: &PositionMarker) {}
}

/// Walk a whole compilation unit
pub fn traverse<V: Visitor + ?Sized>(program: &mut Program, visitor: &mut V) {
    visitor.enter_program(program);
    for statement in &mut program.body {
        walk_statement(visitor, statement, ParentKind::Program);
    }
    visitor.exit_program(program);
}

pub fn walk_statement<V: Visitor + ?Sized>(
    visitor: &mut V,
    statement: &mut Statement,
    parent: ParentKind,
) {
    if let Statement::Marker(marker) = statement {
        visitor.visit_marker(marker);
    }
    if visitor.enter_statement(statement, parent) == Visit::SkipSubtree {
        return;
    }
    walk_statement_children(visitor, statement, parent);
    visitor.exit_statement(statement, parent);
}

fn walk_statement_children<V: Visitor + ?Sized>(
    visitor: &mut V,
    statement: &mut Statement,
    parent: ParentKind,
) {
    match statement {
        Statement::Expression(expression) | Statement::Throw(expression) => {
            walk_expression(visitor, expression)
        }
        Statement::Return(argument) => {
            if let Some(argument) = argument {
                walk_expression(visitor, argument);
            }
        }
        Statement::Block(block) => walk_block(visitor, block, BlockRole::Statement),
        Statement::If(branch) => {
            walk_expression(visitor, &mut branch.test);
            walk_statement(visitor, &mut branch.consequent, ParentKind::If);
            if let Some(alternate) = &mut branch.alternate {
                walk_statement(visitor, alternate, ParentKind::If);
            }
        }
        Statement::Labeled(labeled) => {
            walk_statement(visitor, &mut labeled.body, ParentKind::Labeled)
        }
        Statement::Loop(iteration) => walk_loop(visitor, iteration),
        Statement::Switch(switch) => {
            walk_expression(visitor, &mut switch.discriminant);
            for case in &mut switch.cases {
                if let Some(test) = &mut case.test {
                    walk_expression(visitor, test);
                }
                for statement in &mut case.consequent {
                    walk_statement(visitor, statement, ParentKind::SwitchCase);
                }
            }
        }
        Statement::With(with) => {
            walk_expression(visitor, &mut with.object);
            walk_statement(visitor, &mut with.body, ParentKind::With);
        }
        Statement::VariableDeclaration(declaration) => {
            let site = if parent == ParentKind::Loop {
                DeclarationSite::LoopBody
            } else {
                DeclarationSite::Statement
            };
            walk_declaration(visitor, declaration, site);
        }
        Statement::FunctionDeclaration(function) => walk_function(visitor, function),
        Statement::Try(handler) => {
            walk_block(visitor, &mut handler.block, BlockRole::TryBlock);
            if let Some(clause) = &mut handler.handler {
                walk_block(visitor, &mut clause.body, BlockRole::CatchBody);
            }
            if let Some(finalizer) = &mut handler.finalizer {
                walk_block(visitor, finalizer, BlockRole::Finalizer);
            }
        }
        Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Empty
        | Statement::Marker(_) => {}
    }
}

fn walk_loop<V: Visitor + ?Sized>(visitor: &mut V, iteration: &mut Loop) {
    match iteration {
        Loop::While { test, body } => {
            walk_expression(visitor, test);
            walk_statement(visitor, body, ParentKind::Loop);
        }
        Loop::DoWhile { body, test } => {
            walk_statement(visitor, body, ParentKind::Loop);
            walk_expression(visitor, test);
        }
        Loop::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Declaration(declaration)) => {
                    walk_declaration(visitor, declaration, DeclarationSite::LoopHead)
                }
                Some(ForInit::Expression(expression)) => walk_expression(visitor, expression),
                None => {}
            }
            if let Some(test) = test {
                walk_expression(visitor, test);
            }
            if let Some(update) = update {
                walk_expression(visitor, update);
            }
            walk_statement(visitor, body, ParentKind::Loop);
        }
        Loop::ForIn { left, right, body } | Loop::ForOf { left, right, body, .. } => {
            match left {
                ForHead::Declaration(declaration) => {
                    walk_declaration(visitor, declaration, DeclarationSite::LoopHead)
                }
                ForHead::Target(target) => walk_expression(visitor, target),
            }
            walk_expression(visitor, right);
            walk_statement(visitor, body, ParentKind::Loop);
        }
    }
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &mut Block, role: BlockRole) {
    if visitor.enter_block(block, role) == Visit::SkipSubtree {
        return;
    }
    for statement in &mut block.body {
        walk_statement(visitor, statement, ParentKind::Block);
    }
}

pub fn walk_declaration<V: Visitor + ?Sized>(
    visitor: &mut V,
    declaration: &mut VariableDeclaration,
    site: DeclarationSite,
) {
    let kind = declaration.kind;
    for declarator in &mut declaration.declarations {
        if visitor.enter_declarator(declarator, kind, site) == Visit::SkipSubtree {
            continue;
        }
        if let Some(init) = &mut declarator.init {
            walk_expression(visitor, init);
        }
        visitor.exit_declarator(declarator, kind, site);
    }
}

fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, function: &mut Function) {
    walk_block(visitor, &mut function.body, BlockRole::FunctionBody);
}

/// Expressions have no hooks of their own; they are walked to reach the
/// bodies of nested functions.
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &mut Expression) {
    match expression {
        Expression::Identifier(_) | Expression::Literal(_) => {}
        Expression::Array(elements) => {
            for element in elements {
                walk_expression(visitor, element);
            }
        }
        Expression::Call { callee, arguments } => {
            walk_expression(visitor, callee);
            for argument in arguments {
                walk_expression(visitor, argument);
            }
        }
        Expression::Member {
            object, property, ..
        } => {
            walk_expression(visitor, object);
            walk_expression(visitor, property);
        }
        Expression::Unary { argument, .. } | Expression::Await(argument) => {
            walk_expression(visitor, argument)
        }
        Expression::Binary { left, right, .. } => {
            walk_expression(visitor, left);
            walk_expression(visitor, right);
        }
        Expression::Assign { target, value } => {
            walk_expression(visitor, target);
            walk_expression(visitor, value);
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
        } => {
            walk_expression(visitor, test);
            walk_expression(visitor, consequent);
            walk_expression(visitor, alternate);
        }
        Expression::Arrow(arrow) => match &mut arrow.body {
            ArrowBody::Block(block) => walk_block(visitor, block, BlockRole::FunctionBody),
            ArrowBody::Expression(body) => walk_expression(visitor, body),
        },
        Expression::Function(function) => walk_function(visitor, function),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IfStatement, TryStatement, CatchClause};

    /// Records the hook sequence as readable events
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn enter_statement(&mut self, statement: &mut Statement, parent: ParentKind) -> Visit {
            self.events
                .push(format!("enter {} in {:?}", statement.kind_name(), parent));
            if self.skip == Some(statement.kind_name()) {
                Visit::SkipSubtree
            } else {
                Visit::Continue
            }
        }

        fn exit_statement(&mut self, statement: &mut Statement, _parent: ParentKind) {
            self.events.push(format!("exit {}", statement.kind_name()));
        }

        fn enter_block(&mut self, _block: &mut Block, role: BlockRole) -> Visit {
            self.events.push(format!("block {:?}", role));
            Visit::Continue
        }

        fn enter_declarator(
            &mut self,
            declarator: &mut VariableDeclarator,
            _kind: DeclarationKind,
            site: DeclarationSite,
        ) -> Visit {
            self.events
                .push(format!("enter declarator {} at {:?}", declarator.id, site));
            Visit::Continue
        }

        fn visit_marker(&mut self, marker: &PositionMarker) {
            self.events
                .push(format!("marker {:?}", marker.source_fraction));
        }
    }

    fn nested_if() -> Program {
        Program::new(vec![Statement::If(IfStatement {
            test: Expression::ident("a"),
            consequent: Box::new(Statement::block(vec![Statement::expression(
                Expression::call_ident("b", vec![]),
            )])),
            alternate: None,
        })])
    }

    #[test]
    fn test_pre_and_post_order() {
        let mut program = nested_if();
        let mut recorder = Recorder::default();
        traverse(&mut program, &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "enter IfStatement in Program",
                "enter BlockStatement in If",
                "block Statement",
                "enter ExpressionStatement in Block",
                "exit ExpressionStatement",
                "exit BlockStatement",
                "exit IfStatement",
            ]
        );
    }

    #[test]
    fn test_skip_suppresses_children_and_exit() {
        let mut program = nested_if();
        let mut recorder = Recorder {
            skip: Some("IfStatement"),
            ..Default::default()
        };
        traverse(&mut program, &mut recorder);
        assert_eq!(recorder.events, vec!["enter IfStatement in Program"]);
    }

    #[test]
    fn test_block_roles_and_declaration_sites() {
        let mut program = Program::new(vec![
            Statement::marker(0.5),
            Statement::Loop(Loop::For {
                init: Some(ForInit::Declaration(VariableDeclaration {
                    kind: DeclarationKind::Let,
                    declarations: vec![VariableDeclarator::new("i", Some(Expression::number(0.0)))],
                })),
                test: None,
                update: None,
                body: Box::new(Statement::declaration(
                    DeclarationKind::Var,
                    vec![VariableDeclarator::new("v", None)],
                )),
            }),
            Statement::Try(TryStatement {
                block: Block::default(),
                handler: Some(CatchClause {
                    param: None,
                    body: Block::default(),
                }),
                finalizer: Some(Block::default()),
            }),
            Statement::FunctionDeclaration(Function::default()),
        ]);
        let mut recorder = Recorder::default();
        traverse(&mut program, &mut recorder);
        let events = recorder.events;
        assert!(events.contains(&"marker Some(0.5)".to_string()));
        assert!(events.contains(&"enter declarator i at LoopHead".to_string()));
        assert!(events.contains(&"enter declarator v at LoopBody".to_string()));
        assert!(events.contains(&"block TryBlock".to_string()));
        assert!(events.contains(&"block CatchBody".to_string()));
        assert!(events.contains(&"block Finalizer".to_string()));
        assert!(events.contains(&"block FunctionBody".to_string()));
    }

    #[test]
    fn test_function_bodies_inside_expressions_are_reached() {
        let callback = Expression::Arrow(crate::ast::ArrowFunction {
            params: vec![],
            body: ArrowBody::Block(Block::new(vec![Statement::Return(None)])),
            is_async: false,
        });
        let mut program = Program::new(vec![Statement::expression(Expression::call_ident(
            "run",
            vec![callback],
        ))]);
        let mut recorder = Recorder::default();
        traverse(&mut program, &mut recorder);
        assert!(recorder.events.contains(&"block FunctionBody".to_string()));
        assert!(recorder
            .events
            .contains(&"enter ReturnStatement in Block".to_string()));
    }
}
