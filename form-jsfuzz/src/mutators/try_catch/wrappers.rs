// form-jsfuzz/src/mutators/try_catch/wrappers.rs
//! Wrapper builders
//!
//! Statements are wrapped as `try { S } catch (e) {}`. Initializers of
//! block-scoped bindings are wrapped as `__wrapTC(() => E)` instead, since a
//! `try` around `let x = ...` would hide `x` from the code after it.

use crate::ast::{Block, CatchClause, Expression, Statement, TryStatement};
use crate::constants;

/// Instantiates the wrapper snippets with the configured identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperTemplate {
    /// Runtime helper evaluating a thunk and swallowing its exceptions
    pub helper_name: String,
    /// Binding of the generated catch clauses
    pub catch_param: String,
}

impl Default for WrapperTemplate {
    fn default() -> Self {
        Self::new(constants::WRAP_HELPER_NAME, constants::CATCH_PARAM)
    }
}

impl WrapperTemplate {
    pub fn new(helper_name: impl Into<String>, catch_param: impl Into<String>) -> Self {
        Self {
            helper_name: helper_name.into(),
            catch_param: catch_param.into(),
        }
    }

    fn try_catch(&self, block: Block) -> TryStatement {
        TryStatement {
            block,
            handler: Some(CatchClause {
                param: Some(self.catch_param.clone()),
                body: Block::default(),
            }),
            finalizer: None,
        }
    }

    /// `try { statement } catch (e) {}`
    pub fn statement(&self, statement: Statement) -> Statement {
        Statement::Try(self.try_catch(Block::new(vec![statement])))
    }

    /// `{ try <block> catch (e) {} }`, keeping a block where one is required
    /// (e.g. function bodies).
    pub fn block(&self, block: Block) -> Block {
        Block::new(vec![Statement::Try(self.try_catch(block))])
    }

    /// `__wrapTC(() => init)`. An awaited initializer keeps its `await`
    /// outside the synchronous thunk: `await x` becomes
    /// `await __wrapTC(() => x)`.
    pub fn initializer(&self, init: Expression) -> Expression {
        match init {
            Expression::Await(argument) => Expression::await_expr(self.helper_call(*argument)),
            init => self.helper_call(init),
        }
    }

    fn helper_call(&self, body: Expression) -> Expression {
        Expression::call_ident(self.helper_name.clone(), vec![Expression::thunk(body)])
    }
}

/// Wrap a statement with the default template, for use by other mutators
pub fn wrap_try_catch(statement: Statement) -> Statement {
    WrapperTemplate::default().statement(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::printer::{print_expression, print_statement, PrintStyle};

    fn compute() -> Expression {
        Expression::call_ident("compute", vec![])
    }

    #[test]
    fn test_statement_wrapper() {
        let wrapped = wrap_try_catch(Statement::expression(compute()));
        assert_eq!(
            print_statement(&wrapped, PrintStyle::Compact),
            "try { compute(); } catch (e) {}"
        );
    }

    #[test]
    fn test_block_wrapper_keeps_block() {
        let template = WrapperTemplate::default();
        let body = Block::new(vec![Statement::Return(Some(compute()))]);
        let wrapped = Statement::Block(template.block(body));
        assert_eq!(
            print_statement(&wrapped, PrintStyle::Compact),
            "{ try { return compute(); } catch (e) {} }"
        );
    }

    #[test]
    fn test_initializer_wrapper() {
        let template = WrapperTemplate::default();
        assert_eq!(
            print_expression(&template.initializer(compute())),
            "__wrapTC(() => compute())"
        );
    }

    #[test]
    fn test_await_stays_outside_thunk() {
        let template = WrapperTemplate::new("wrapTC", "err");
        let wrapped = template.initializer(Expression::await_expr(compute()));
        assert_eq!(print_expression(&wrapped), "await wrapTC(() => compute())");
    }

    #[test]
    fn test_custom_catch_param() {
        let template = WrapperTemplate::new("wrapTC", "err");
        let wrapped = template.statement(Statement::Empty);
        assert_eq!(
            print_statement(&wrapped, PrintStyle::Compact),
            "try { ; } catch (err) {}"
        );
    }
}
