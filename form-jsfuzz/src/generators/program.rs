// form-jsfuzz/src/generators/program.rs
//! Generator for random, syntactically valid programs
//!
//! Covers every statement kind the try/catch guards classify: loops with and
//! without labels, `var` declarations as loop bodies and loop heads, lexical
//! declarations with literal and computed initializers, async functions
//! awaiting in initializers, and existing try statements.

use crate::ast::{
    ArrowBody, ArrowFunction, BinaryOperator, Block, CatchClause, DeclarationKind, Expression,
    ForHead, ForInit, Function, IfStatement, Literal, Loop, Program, Statement, SwitchCase,
    SwitchStatement, TryStatement, UnaryOperator, VariableDeclaration, VariableDeclarator,
    WithStatement,
};
use crate::generators::Generator;
use crate::random::RandomSource;

/// Free identifiers the generated code refers to. They are expected to be
/// provided by the fuzz library prepended to each test case.
const GLOBALS: [&str; 4] = ["a", "b", "obj", "items"];
const FUNCTIONS: [&str; 3] = ["compute", "g", "h"];

/// Generator for [`Program`]s
#[derive(Debug, Clone)]
pub struct ProgramGenerator {
    max_depth: usize,
    max_statements: usize,
}

impl Default for ProgramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramGenerator {
    pub fn new() -> Self {
        Self {
            max_depth: 3,
            max_statements: 8,
        }
    }

    /// Maximum nesting depth of compound statements
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Maximum number of statements per statement list (at least one)
    pub fn with_max_statements(mut self, max_statements: usize) -> Self {
        self.max_statements = max_statements.max(1);
        self
    }
}

impl Generator<Program> for ProgramGenerator {
    fn generate(&self, rng: &mut dyn RandomSource) -> Program {
        let mut builder = Builder {
            rng,
            max_depth: self.max_depth,
            max_statements: self.max_statements,
            next_id: 0,
            scope: Scope::default(),
        };
        let count = 1 + builder.rng.index(self.max_statements);
        let mut body = Vec::with_capacity(count * 2);
        for i in 0..count {
            body.push(Statement::marker(i as f64 / count as f64));
            body.push(builder.statement(0));
        }
        Program::new(body)
    }
}

/// What the statement being built is nested in
#[derive(Debug, Clone, Default)]
struct Scope {
    in_loop: bool,
    /// Labels of enclosing labeled loops
    labels: Vec<String>,
    in_function: bool,
    in_async: bool,
}

struct Builder<'a> {
    rng: &'a mut dyn RandomSource,
    max_depth: usize,
    max_statements: usize,
    next_id: usize,
    scope: Scope,
}

impl Builder<'_> {
    fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        name
    }

    fn pick<'s>(&mut self, options: &[&'s str]) -> &'s str {
        options[self.rng.index(options.len())]
    }

    /// Statement in a statement list, where declarations are allowed
    fn statement(&mut self, depth: usize) -> Statement {
        if depth >= self.max_depth {
            return self.simple_statement();
        }
        match self.rng.index(13) {
            0 => self.if_statement(depth),
            1 => Statement::Block(self.block(depth + 1)),
            2 | 3 => self.loop_statement(depth),
            4 => self.labeled_loop(depth),
            5 => self.switch_statement(depth),
            6 => self.function_declaration(depth),
            7 => self.try_statement(depth),
            8 => Statement::With(WithStatement {
                object: Expression::ident("obj"),
                body: Box::new(self.sub_statement(depth + 1)),
            }),
            _ => self.simple_statement(),
        }
    }

    /// Statement in a single-statement slot, e.g. an `if` branch or a loop
    /// body, where lexical declarations are not allowed
    fn sub_statement(&mut self, depth: usize) -> Statement {
        if depth >= self.max_depth {
            return self.expression_statement();
        }
        match self.rng.index(6) {
            0 | 1 | 2 => Statement::Block(self.block(depth)),
            3 => self.declaration(DeclarationKind::Var),
            4 => self.if_statement(depth),
            _ => self.expression_statement(),
        }
    }

    fn simple_statement(&mut self) -> Statement {
        match self.rng.index(9) {
            0 => self.declaration(DeclarationKind::Var),
            1 => self.declaration(DeclarationKind::Let),
            2 => self.declaration(DeclarationKind::Const),
            3 if self.scope.in_loop => self.jump(),
            4 if self.scope.in_function => Statement::Return(Some(self.expression(1))),
            5 => Statement::Throw(Expression::call_ident("Error", vec![Expression::string("boom")])),
            _ => self.expression_statement(),
        }
    }

    fn expression_statement(&mut self) -> Statement {
        let expression = match self.rng.index(3) {
            0 => Expression::Assign {
                target: Box::new(Expression::ident(self.pick(&GLOBALS[..2]))),
                value: Box::new(self.expression(1)),
            },
            _ => self.call(1),
        };
        Statement::expression(expression)
    }

    fn jump(&mut self) -> Statement {
        let label = if !self.scope.labels.is_empty() && self.rng.choose(0.5) {
            let index = self.rng.index(self.scope.labels.len());
            Some(self.scope.labels[index].clone())
        } else {
            None
        };
        if self.rng.choose(0.5) {
            Statement::Continue(label)
        } else {
            Statement::Break(label)
        }
    }

    fn statements(&mut self, depth: usize) -> Vec<Statement> {
        let count = 1 + self.rng.index(self.max_statements.min(4));
        (0..count).map(|_| self.statement(depth)).collect()
    }

    fn block(&mut self, depth: usize) -> Block {
        Block::new(self.statements(depth))
    }

    fn if_statement(&mut self, depth: usize) -> Statement {
        let test = self.condition();
        let consequent = Box::new(self.sub_statement(depth + 1));
        let alternate = if self.rng.choose(0.3) {
            Some(Box::new(self.sub_statement(depth + 1)))
        } else {
            None
        };
        Statement::If(IfStatement {
            test,
            consequent,
            alternate,
        })
    }

    fn loop_body(&mut self, depth: usize) -> Box<Statement> {
        let saved = self.scope.in_loop;
        self.scope.in_loop = true;
        let body = self.sub_statement(depth + 1);
        self.scope.in_loop = saved;
        Box::new(body)
    }

    fn loop_statement(&mut self, depth: usize) -> Statement {
        let iteration = match self.rng.index(5) {
            0 => Loop::While {
                test: self.condition(),
                body: self.loop_body(depth),
            },
            1 => Loop::DoWhile {
                body: self.loop_body(depth),
                test: self.condition(),
            },
            2 => {
                let counter = self.fresh("i");
                let kind = if self.rng.choose(0.5) {
                    DeclarationKind::Let
                } else {
                    DeclarationKind::Var
                };
                Loop::For {
                    init: Some(ForInit::Declaration(VariableDeclaration {
                        kind,
                        declarations: vec![VariableDeclarator::new(
                            counter.clone(),
                            Some(Expression::number(0.0)),
                        )],
                    })),
                    test: Some(Expression::binary(
                        BinaryOperator::Lt,
                        Expression::ident(counter.clone()),
                        Expression::number(3.0),
                    )),
                    update: Some(Expression::Assign {
                        target: Box::new(Expression::ident(counter.clone())),
                        value: Box::new(Expression::binary(
                            BinaryOperator::Add,
                            Expression::ident(counter),
                            Expression::number(1.0),
                        )),
                    }),
                    body: self.loop_body(depth),
                }
            }
            3 => Loop::ForIn {
                left: self.for_head(),
                right: Expression::ident("obj"),
                body: self.loop_body(depth),
            },
            _ => Loop::ForOf {
                left: self.for_head(),
                right: Expression::ident("items"),
                body: self.loop_body(depth),
                is_await: false,
            },
        };
        Statement::Loop(iteration)
    }

    fn for_head(&mut self) -> ForHead {
        let kind = match self.rng.index(3) {
            0 => DeclarationKind::Var,
            1 => DeclarationKind::Let,
            _ => DeclarationKind::Const,
        };
        let id = self.fresh("k");
        ForHead::Declaration(VariableDeclaration {
            kind,
            declarations: vec![VariableDeclarator::new(id, None)],
        })
    }

    fn labeled_loop(&mut self, depth: usize) -> Statement {
        let label = self.fresh("outer");
        self.scope.labels.push(label.clone());
        let body = self.loop_statement(depth);
        self.scope.labels.pop();
        Statement::labeled(label, body)
    }

    fn switch_statement(&mut self, depth: usize) -> Statement {
        let count = 1 + self.rng.index(3);
        let mut cases: Vec<SwitchCase> = (0..count)
            .map(|i| SwitchCase {
                test: Some(Expression::number(i as f64)),
                consequent: self.statements(depth + 1),
            })
            .collect();
        if self.rng.choose(0.5) {
            cases.push(SwitchCase {
                test: None,
                consequent: vec![self.expression_statement()],
            });
        }
        Statement::Switch(SwitchStatement {
            discriminant: self.expression(1),
            cases,
        })
    }

    fn function_declaration(&mut self, depth: usize) -> Statement {
        let is_async = self.rng.choose(0.4);
        let id = self.fresh("f");
        Statement::FunctionDeclaration(self.function(Some(id), is_async, depth))
    }

    fn function(&mut self, id: Option<String>, is_async: bool, depth: usize) -> Function {
        let params: Vec<String> = (0..self.rng.index(3)).map(|_| self.fresh("p")).collect();
        let saved = std::mem::replace(
            &mut self.scope,
            Scope {
                in_function: true,
                in_async: is_async,
                ..Scope::default()
            },
        );
        // Empty bodies are kept to cover the ineligible case.
        let body = if self.rng.choose(0.1) {
            Block::default()
        } else {
            self.block(depth + 1)
        };
        self.scope = saved;
        Function {
            id,
            params,
            body,
            is_async,
            is_generator: false,
        }
    }

    fn try_statement(&mut self, depth: usize) -> Statement {
        let block = self.block(depth + 1);
        let handler = CatchClause {
            param: Some("err".to_string()),
            body: self.block(depth + 1),
        };
        let finalizer = if self.rng.choose(0.3) {
            Some(self.block(depth + 1))
        } else {
            None
        };
        Statement::Try(TryStatement {
            block,
            handler: Some(handler),
            finalizer,
        })
    }

    fn declaration(&mut self, kind: DeclarationKind) -> Statement {
        let count = 1 + self.rng.index(2);
        let declarations = (0..count)
            .map(|_| {
                let id = self.fresh("v");
                let init = if kind != DeclarationKind::Const && self.rng.choose(0.15) {
                    None
                } else {
                    Some(self.initializer())
                };
                VariableDeclarator::new(id, init)
            })
            .collect();
        Statement::declaration(kind, declarations)
    }

    fn initializer(&mut self) -> Expression {
        match self.rng.index(6) {
            0 => self.literal(),
            1 => Expression::ident("undefined"),
            _ if self.scope.in_async && self.rng.choose(0.4) => {
                Expression::await_expr(self.call(1))
            }
            _ => self.expression(1),
        }
    }

    fn literal(&mut self) -> Expression {
        match self.rng.index(4) {
            0 => Expression::number((self.rng.random() * 100.0).floor()),
            1 => Expression::string(self.pick(&["x", "hello", ""])),
            2 => Expression::Literal(Literal::Boolean(self.rng.choose(0.5))),
            _ => Expression::Literal(Literal::Null),
        }
    }

    fn condition(&mut self) -> Expression {
        match self.rng.index(3) {
            0 => Expression::call_ident("cond", vec![]),
            1 => Expression::binary(
                BinaryOperator::Lt,
                Expression::ident(self.pick(&GLOBALS[..2])),
                Expression::number(10.0),
            ),
            _ => Expression::Unary {
                operator: UnaryOperator::Not,
                argument: Box::new(Expression::ident(self.pick(&GLOBALS[..2]))),
            },
        }
    }

    fn call(&mut self, depth: usize) -> Expression {
        let callee = self.pick(&FUNCTIONS);
        let count = self.rng.index(3);
        let arguments = (0..count).map(|_| self.expression(depth + 1)).collect();
        if self.rng.choose(0.2) {
            Expression::call(Expression::member(Expression::ident("obj"), callee), arguments)
        } else {
            Expression::call_ident(callee, arguments)
        }
    }

    fn expression(&mut self, depth: usize) -> Expression {
        if depth >= self.max_depth {
            return match self.rng.index(2) {
                0 => Expression::ident(self.pick(&GLOBALS)),
                _ => self.literal(),
            };
        }
        match self.rng.index(8) {
            0 => Expression::ident(self.pick(&GLOBALS)),
            1 => self.literal(),
            2 | 3 => self.call(depth),
            4 => {
                let operator = match self.rng.index(4) {
                    0 => BinaryOperator::Add,
                    1 => BinaryOperator::Mul,
                    2 => BinaryOperator::StrictEq,
                    _ => BinaryOperator::Or,
                };
                Expression::binary(
                    operator,
                    self.expression(depth + 1),
                    self.expression(depth + 1),
                )
            }
            5 => Expression::Conditional {
                test: Box::new(self.condition()),
                consequent: Box::new(self.expression(depth + 1)),
                alternate: Box::new(self.expression(depth + 1)),
            },
            6 => {
                // Arrow with a block body reaches nested function bodies.
                let function = self.function(None, false, self.max_depth.saturating_sub(1));
                Expression::Arrow(ArrowFunction {
                    params: function.params,
                    body: ArrowBody::Block(function.body),
                    is_async: false,
                })
            }
            _ => Expression::Array(vec![self.expression(depth + 1), self.literal()]),
        }
    }
}
