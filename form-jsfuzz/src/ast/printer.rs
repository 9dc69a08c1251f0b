// form-jsfuzz/src/ast/printer.rs
//! Source printer for syntax trees
//!
//! Output is a pure function of the tree, so equal trees always print to
//! byte-identical source.

use super::{
    ArrowBody, ArrowFunction, BinaryOperator, Block, Expression, ForHead, ForInit, Function,
    Literal, Loop, Program, Statement, UnaryOperator, VariableDeclaration,
};

/// Layout of the printed source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrintStyle {
    /// One statement per line, two-space indentation
    #[default]
    Pretty,
    /// Everything on a single line, e.g. `try { f(); } catch (e) {}`
    Compact,
}

const ASSIGN: u8 = 2;
const CONDITIONAL: u8 = 3;
const UNARY: u8 = 15;
const LEFT_HAND_SIDE: u8 = 18;
const PRIMARY: u8 = 20;

/// Render a whole compilation unit
pub fn print_program(program: &Program, style: PrintStyle) -> String {
    let mut printer = Printer::new(style);
    printer.program(program);
    printer.finish()
}

/// Render a single statement
pub fn print_statement(statement: &Statement, style: PrintStyle) -> String {
    let mut printer = Printer::new(style);
    printer.statement(statement);
    printer.finish()
}

/// Render a single expression
pub fn print_expression(expression: &Expression) -> String {
    let mut printer = Printer::new(PrintStyle::Compact);
    printer.expression(expression, 0);
    printer.finish()
}

fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Identifier(_)
        | Expression::Literal(_)
        | Expression::Array(_)
        | Expression::Function(_) => PRIMARY,
        Expression::Call { .. } | Expression::Member { .. } => LEFT_HAND_SIDE,
        Expression::Unary { .. } | Expression::Await(_) => UNARY,
        Expression::Binary { operator, .. } => operator.precedence(),
        Expression::Conditional { .. } => CONDITIONAL,
        Expression::Assign { .. } | Expression::Arrow(_) => ASSIGN,
    }
}

/// An expression statement must not begin with the `function` keyword.
fn starts_with_function(expression: &Expression) -> bool {
    match expression {
        Expression::Function(_) => true,
        Expression::Binary { operator, left, .. } => {
            precedence(left) >= operator.precedence() && starts_with_function(left)
        }
        Expression::Conditional { test, .. } => {
            precedence(test) > CONDITIONAL && starts_with_function(test)
        }
        Expression::Assign { target, .. } => {
            precedence(target) >= LEFT_HAND_SIDE && starts_with_function(target)
        }
        _ => false,
    }
}

/// `??` cannot be mixed with `&&` or `||` without parentheses.
fn mixes_nullish(parent: BinaryOperator, child: &Expression) -> bool {
    match child {
        Expression::Binary { operator, .. } => {
            parent.is_logical()
                && operator.is_logical()
                && ((parent == BinaryOperator::Nullish) != (*operator == BinaryOperator::Nullish))
        }
        _ => false,
    }
}

/// True when a trailing `else` would bind to an inner `if` of `statement`.
fn ends_with_open_if(statement: &Statement) -> bool {
    match statement {
        Statement::If(inner) => match &inner.alternate {
            None => true,
            Some(alternate) => ends_with_open_if(alternate),
        },
        Statement::Labeled(labeled) => ends_with_open_if(&labeled.body),
        Statement::With(with) => ends_with_open_if(&with.body),
        Statement::Loop(Loop::DoWhile { .. }) => false,
        Statement::Loop(inner) => ends_with_open_if(inner.body()),
        _ => false,
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

struct Printer {
    style: PrintStyle,
    out: String,
    indent: usize,
}

impl Printer {
    fn new(style: PrintStyle) -> Self {
        Self {
            style,
            out: String::new(),
            indent: 0,
        }
    }

    fn finish(self) -> String {
        match self.style {
            PrintStyle::Pretty => self.out,
            PrintStyle::Compact => self.out.trim_end().to_string(),
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn line_break(&mut self) {
        match self.style {
            PrintStyle::Pretty => {
                self.out.push('\n');
                for _ in 0..self.indent {
                    self.out.push_str("  ");
                }
            }
            PrintStyle::Compact => self.out.push(' '),
        }
    }

    fn program(&mut self, program: &Program) {
        for comment in &program.comments {
            match self.style {
                PrintStyle::Pretty => {
                    self.push("// ");
                    self.push(&comment.replace('\n', " "));
                    self.push("\n");
                }
                PrintStyle::Compact => {
                    self.push("/* ");
                    self.push(&comment.replace("*/", "* /"));
                    self.push(" */ ");
                }
            }
        }
        let mut first = true;
        for statement in program.body.iter().filter(|s| !s.is_marker()) {
            if !first {
                self.line_break();
            }
            first = false;
            self.statement(statement);
        }
        if self.style == PrintStyle::Pretty && !first {
            self.push("\n");
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Expression(expression) => {
                if starts_with_function(expression) {
                    self.push("(");
                    self.expression(expression, 0);
                    self.push(")");
                } else {
                    self.expression(expression, 0);
                }
                self.push(";");
            }
            Statement::Block(block) => self.block(block),
            Statement::If(branch) => {
                self.push("if (");
                self.expression(&branch.test, 0);
                self.push(") ");
                if branch.alternate.is_some() && ends_with_open_if(&branch.consequent) {
                    self.statement_list(std::slice::from_ref(branch.consequent.as_ref()));
                } else {
                    self.statement(&branch.consequent);
                }
                if let Some(alternate) = &branch.alternate {
                    self.push(" else ");
                    self.statement(alternate);
                }
            }
            Statement::Labeled(labeled) => {
                self.push(&labeled.label);
                self.push(": ");
                self.statement(&labeled.body);
            }
            Statement::Loop(iteration) => self.loop_statement(iteration),
            Statement::Switch(switch) => {
                self.push("switch (");
                self.expression(&switch.discriminant, 0);
                self.push(") ");
                if switch.cases.is_empty() {
                    self.push("{}");
                    return;
                }
                self.push("{");
                self.indent += 1;
                for case in &switch.cases {
                    self.line_break();
                    match &case.test {
                        Some(test) => {
                            self.push("case ");
                            self.expression(test, 0);
                            self.push(":");
                        }
                        None => self.push("default:"),
                    }
                    self.indent += 1;
                    for statement in case.consequent.iter().filter(|s| !s.is_marker()) {
                        self.line_break();
                        self.statement(statement);
                    }
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.line_break();
                self.push("}");
            }
            Statement::With(with) => {
                self.push("with (");
                self.expression(&with.object, 0);
                self.push(") ");
                self.statement(&with.body);
            }
            Statement::VariableDeclaration(declaration) => {
                self.declaration(declaration);
                self.push(";");
            }
            Statement::FunctionDeclaration(function) => self.function(function),
            Statement::Return(argument) => {
                self.push("return");
                if let Some(argument) = argument {
                    self.push(" ");
                    self.expression(argument, 0);
                }
                self.push(";");
            }
            Statement::Throw(argument) => {
                self.push("throw ");
                self.expression(argument, 0);
                self.push(";");
            }
            Statement::Break(label) => self.jump("break", label.as_deref()),
            Statement::Continue(label) => self.jump("continue", label.as_deref()),
            Statement::Try(handler) => {
                self.push("try ");
                self.block(&handler.block);
                if let Some(clause) = &handler.handler {
                    self.push(" catch ");
                    if let Some(param) = &clause.param {
                        self.push("(");
                        self.push(param);
                        self.push(") ");
                    }
                    self.block(&clause.body);
                }
                if let Some(finalizer) = &handler.finalizer {
                    self.push(" finally ");
                    self.block(finalizer);
                }
            }
            // Markers in a single-statement position keep the slot valid.
            Statement::Empty | Statement::Marker(_) => self.push(";"),
        }
    }

    fn jump(&mut self, keyword: &str, label: Option<&str>) {
        self.push(keyword);
        if let Some(label) = label {
            self.push(" ");
            self.push(label);
        }
        self.push(";");
    }

    fn block(&mut self, block: &Block) {
        self.statement_list(&block.body);
    }

    fn statement_list(&mut self, statements: &[Statement]) {
        let mut printable = statements.iter().filter(|s| !s.is_marker()).peekable();
        if printable.peek().is_none() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for statement in printable {
            self.line_break();
            self.statement(statement);
        }
        self.indent -= 1;
        self.line_break();
        self.push("}");
    }

    fn loop_statement(&mut self, iteration: &Loop) {
        match iteration {
            Loop::While { test, body } => {
                self.push("while (");
                self.expression(test, 0);
                self.push(") ");
                self.statement(body);
            }
            Loop::DoWhile { body, test } => {
                self.push("do ");
                self.statement(body);
                self.push(" while (");
                self.expression(test, 0);
                self.push(");");
            }
            Loop::For {
                init,
                test,
                update,
                body,
            } => {
                self.push("for (");
                match init {
                    Some(ForInit::Declaration(declaration)) => self.declaration(declaration),
                    Some(ForInit::Expression(expression)) => self.expression(expression, 0),
                    None => {}
                }
                self.push(";");
                if let Some(test) = test {
                    self.push(" ");
                    self.expression(test, 0);
                }
                self.push(";");
                if let Some(update) = update {
                    self.push(" ");
                    self.expression(update, 0);
                }
                self.push(") ");
                self.statement(body);
            }
            Loop::ForIn { left, right, body } => {
                self.push("for (");
                self.for_head(left);
                self.push(" in ");
                self.expression(right, 0);
                self.push(") ");
                self.statement(body);
            }
            Loop::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                self.push(if *is_await { "for await (" } else { "for (" });
                self.for_head(left);
                self.push(" of ");
                self.expression(right, ASSIGN);
                self.push(") ");
                self.statement(body);
            }
        }
    }

    fn for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Declaration(declaration) => self.declaration(declaration),
            ForHead::Target(target) => self.expression(target, LEFT_HAND_SIDE),
        }
    }

    fn declaration(&mut self, declaration: &VariableDeclaration) {
        self.push(declaration.kind.as_str());
        self.push(" ");
        for (index, declarator) in declaration.declarations.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.push(&declarator.id);
            if let Some(init) = &declarator.init {
                self.push(" = ");
                self.expression(init, ASSIGN);
            }
        }
    }

    fn function(&mut self, function: &Function) {
        if function.is_async {
            self.push("async ");
        }
        self.push("function");
        if function.is_generator {
            self.push("*");
        }
        self.push(" ");
        if let Some(id) = &function.id {
            self.push(id);
        }
        self.push("(");
        self.push(&function.params.join(", "));
        self.push(") ");
        self.block(&function.body);
    }

    fn arrow(&mut self, arrow: &ArrowFunction) {
        if arrow.is_async {
            self.push("async ");
        }
        self.push("(");
        self.push(&arrow.params.join(", "));
        self.push(") => ");
        match &arrow.body {
            ArrowBody::Block(block) => self.block(block),
            ArrowBody::Expression(expression) => self.expression(expression, ASSIGN),
        }
    }

    /// Print `expression`, parenthesized if it binds looser than `min`.
    fn expression(&mut self, expression: &Expression, min: u8) {
        let parenthesize = precedence(expression) < min;
        if parenthesize {
            self.push("(");
        }
        self.expression_inner(expression);
        if parenthesize {
            self.push(")");
        }
    }

    fn parenthesized(&mut self, expression: &Expression) {
        self.push("(");
        self.expression(expression, 0);
        self.push(")");
    }

    fn expression_inner(&mut self, expression: &Expression) {
        match expression {
            Expression::Identifier(name) => self.push(name),
            Expression::Literal(literal) => self.literal(literal),
            Expression::Array(elements) => {
                self.push("[");
                self.arguments(elements);
                self.push("]");
            }
            Expression::Call { callee, arguments } => {
                if matches!(callee.as_ref(), Expression::Function(_) | Expression::Arrow(_)) {
                    self.parenthesized(callee);
                } else {
                    self.expression(callee, LEFT_HAND_SIDE);
                }
                self.push("(");
                self.arguments(arguments);
                self.push(")");
            }
            Expression::Member {
                object,
                property,
                computed,
            } => {
                let force = matches!(
                    object.as_ref(),
                    Expression::Function(_)
                        | Expression::Arrow(_)
                        | Expression::Literal(Literal::Number(_))
                );
                if force {
                    self.parenthesized(object);
                } else {
                    self.expression(object, LEFT_HAND_SIDE);
                }
                match (computed, property.as_ref()) {
                    (false, Expression::Identifier(name)) => {
                        self.push(".");
                        self.push(name);
                    }
                    _ => {
                        self.push("[");
                        self.expression(property, 0);
                        self.push("]");
                    }
                }
            }
            Expression::Unary { operator, argument } => {
                self.push(operator.as_str());
                if operator.is_keyword() {
                    self.push(" ");
                }
                let signed = matches!(operator, UnaryOperator::Minus | UnaryOperator::Plus);
                let clash = signed
                    && match argument.as_ref() {
                        Expression::Unary { operator, .. } => {
                            matches!(operator, UnaryOperator::Minus | UnaryOperator::Plus)
                        }
                        Expression::Literal(Literal::Number(value)) => value.is_sign_negative(),
                        _ => false,
                    };
                if clash {
                    self.parenthesized(argument);
                } else {
                    self.expression(argument, UNARY);
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let binding = operator.precedence();
                if precedence(left) < binding || mixes_nullish(*operator, left) {
                    self.parenthesized(left);
                } else {
                    self.expression(left, 0);
                }
                self.push(" ");
                self.push(operator.as_str());
                self.push(" ");
                if precedence(right) <= binding || mixes_nullish(*operator, right) {
                    self.parenthesized(right);
                } else {
                    self.expression(right, 0);
                }
            }
            Expression::Assign { target, value } => {
                self.expression(target, LEFT_HAND_SIDE);
                self.push(" = ");
                self.expression(value, ASSIGN);
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test, CONDITIONAL + 1);
                self.push(" ? ");
                self.expression(consequent, ASSIGN);
                self.push(" : ");
                self.expression(alternate, ASSIGN);
            }
            Expression::Await(argument) => {
                self.push("await ");
                self.expression(argument, UNARY);
            }
            Expression::Arrow(arrow) => self.arrow(arrow),
            Expression::Function(function) => self.function(function),
        }
    }

    fn arguments(&mut self, arguments: &[Expression]) {
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.expression(argument, ASSIGN);
        }
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Number(value) => self.push(&format_number(*value)),
            Literal::String(value) => self.push(&quote(value)),
            Literal::Boolean(value) => self.push(if *value { "true" } else { "false" }),
            Literal::Null => self.push("null"),
        }
    }
}
