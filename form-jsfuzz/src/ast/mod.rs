// form-jsfuzz/src/ast/mod.rs
//! Syntax tree model for the ECMAScript subset handled by the corpus mutators
//!
//! Programs are stored in the corpus as JSON (serde's default enum
//! representation) and rendered back to source with [`printer`].

pub mod printer;

use serde::{Deserialize, Serialize};

pub use printer::{print_program, PrintStyle};

/// Root of one compilation unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    /// Diagnostic annotations, printed as leading comments
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Program {
    pub fn new(body: Vec<Statement>) -> Self {
        Self {
            body,
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Expression(Expression),
    Block(Block),
    If(IfStatement),
    Labeled(LabeledStatement),
    Loop(Loop),
    Switch(SwitchStatement),
    With(WithStatement),
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(Function),
    Return(Option<Expression>),
    Throw(Expression),
    Break(Option<String>),
    Continue(Option<String>),
    Try(TryStatement),
    Empty,
    /// Placeholder left by an upstream pass; prints as nothing
    Marker(PositionMarker),
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Self::Expression(expression)
    }

    pub fn block(body: Vec<Statement>) -> Self {
        Self::Block(Block::new(body))
    }

    pub fn declaration(kind: DeclarationKind, declarations: Vec<VariableDeclarator>) -> Self {
        Self::VariableDeclaration(VariableDeclaration { kind, declarations })
    }

    pub fn labeled(label: impl Into<String>, body: Statement) -> Self {
        Self::Labeled(LabeledStatement {
            label: label.into(),
            body: Box::new(body),
        })
    }

    pub fn marker(source_fraction: f64) -> Self {
        Self::Marker(PositionMarker {
            source_fraction: Some(source_fraction),
        })
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, Self::Loop(_))
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }

    /// Name of the node kind, used in logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Expression(_) => "ExpressionStatement",
            Self::Block(_) => "BlockStatement",
            Self::If(_) => "IfStatement",
            Self::Labeled(_) => "LabeledStatement",
            Self::Loop(l) => l.kind_name(),
            Self::Switch(_) => "SwitchStatement",
            Self::With(_) => "WithStatement",
            Self::VariableDeclaration(_) => "VariableDeclaration",
            Self::FunctionDeclaration(_) => "FunctionDeclaration",
            Self::Return(_) => "ReturnStatement",
            Self::Throw(_) => "ThrowStatement",
            Self::Break(_) => "BreakStatement",
            Self::Continue(_) => "ContinueStatement",
            Self::Try(_) => "TryStatement",
            Self::Empty => "EmptyStatement",
            Self::Marker(_) => "Marker",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub body: Vec<Statement>,
}

impl Block {
    pub fn new(body: Vec<Statement>) -> Self {
        Self { body }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    pub label: String,
    pub body: Box<Statement>,
}

/// All iteration statements. Labels on these need special care since
/// `continue label` must target an iteration statement directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Loop {
    While {
        test: Expression,
        body: Box<Statement>,
    },
    DoWhile {
        body: Box<Statement>,
        test: Expression,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expression>,
        update: Option<Expression>,
        body: Box<Statement>,
    },
    ForIn {
        left: ForHead,
        right: Expression,
        body: Box<Statement>,
    },
    ForOf {
        left: ForHead,
        right: Expression,
        body: Box<Statement>,
        #[serde(default)]
        is_await: bool,
    },
}

impl Loop {
    pub fn body(&self) -> &Statement {
        match self {
            Self::While { body, .. }
            | Self::DoWhile { body, .. }
            | Self::For { body, .. }
            | Self::ForIn { body, .. }
            | Self::ForOf { body, .. } => body,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::While { .. } => "WhileStatement",
            Self::DoWhile { .. } => "DoWhileStatement",
            Self::For { .. } => "ForStatement",
            Self::ForIn { .. } => "ForInStatement",
            Self::ForOf { .. } => "ForOfStatement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Expression),
}

/// Left-hand side of `for-in` and `for-of`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForHead {
    Declaration(VariableDeclaration),
    Target(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` for the `default` clause
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithStatement {
    pub object: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
    Using,
    AwaitUsing,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Using => "using",
            Self::AwaitUsing => "await using",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
}

/// A single `name = init` pair of a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: String,
    pub init: Option<Expression>,
}

impl VariableDeclarator {
    pub fn new(id: impl Into<String>, init: Option<Expression>) -> Self {
        Self {
            id: id.into(),
            init,
        }
    }
}

/// Function declarations and function expressions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: Option<String>,
    pub params: Vec<String>,
    pub body: Block,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStatement {
    pub block: Block,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<String>,
    pub body: Block,
}

/// Fraction of the original source consumed up to this point, if known
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionMarker {
    pub source_fraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Identifier(String),
    Literal(Literal),
    Array(Vec<Expression>),
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Member {
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
    },
    Unary {
        operator: UnaryOperator,
        argument: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    /// Suspension expression; only valid inside async functions
    Await(Box<Expression>),
    Arrow(ArrowFunction),
    Function(Function),
}

impl Expression {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn number(value: f64) -> Self {
        Self::Literal(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Shorthand for calling a plain identifier, e.g. `compute()`
    pub fn call_ident(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self::call(Self::ident(name), arguments)
    }

    pub fn member(object: Expression, property: impl Into<String>) -> Self {
        Self::Member {
            object: Box::new(object),
            property: Box::new(Self::ident(property)),
            computed: false,
        }
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn await_expr(argument: Expression) -> Self {
        Self::Await(Box::new(argument))
    }

    /// Parameterless arrow returning `body`, i.e. `() => body`
    pub fn thunk(body: Expression) -> Self {
        Self::Arrow(ArrowFunction {
            params: Vec::new(),
            body: ArrowBody::Expression(Box::new(body)),
            is_async: false,
        })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// True for the bare identifier `undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Identifier(name) if name == "undefined")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::TypeOf => "typeof",
            Self::Void => "void",
            Self::Delete => "delete",
        }
    }

    /// Keyword operators need a space before their operand
    pub fn is_keyword(self) -> bool {
        matches!(self, Self::TypeOf | Self::Void | Self::Delete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    And,
    Or,
    Nullish,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::StrictEq => "===",
            Self::StrictNe => "!==",
            Self::And => "&&",
            Self::Or => "||",
            Self::Nullish => "??",
        }
    }

    /// Binding power, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            Self::Nullish | Self::Or => 4,
            Self::And => 5,
            Self::Eq | Self::Ne | Self::StrictEq | Self::StrictNe => 9,
            Self::Lt | Self::Gt | Self::Le | Self::Ge => 10,
            Self::Add | Self::Sub => 12,
            Self::Mul | Self::Div | Self::Mod => 13,
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Nullish)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowFunction {
    pub params: Vec<String>,
    pub body: ArrowBody,
    #[serde(default)]
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    Block(Block),
    Expression(Box<Expression>),
}
