#[cfg(test)]
mod try_catch_scenario_tests {
    use form_jsfuzz::ast::{
        ArrowBody, ArrowFunction, Block, CatchClause, DeclarationKind, Expression, ForInit,
        Function, IfStatement, Loop, Statement, TryStatement, VariableDeclaration,
        VariableDeclarator,
    };
    use form_jsfuzz::{
        print_program, MutationStats, PrintStyle, Program, ScriptedRandom, TryCatchConfig,
        TryCatchMutator,
    };

    // --- Helper Functions ---

    // The first draw of every pass is the deviation check; 0.5 keeps the
    // configured probabilities.
    const KEEP_DEFAULTS: f64 = 0.5;

    fn call(name: &str) -> Expression {
        Expression::call_ident(name, vec![])
    }

    fn call_statement(name: &str) -> Statement {
        Statement::expression(call(name))
    }

    fn let_statement(kind: DeclarationKind, id: &str, init: Expression) -> Statement {
        Statement::declaration(kind, vec![VariableDeclarator::new(id, Some(init))])
    }

    fn while_loop(body: Vec<Statement>) -> Statement {
        Statement::Loop(Loop::While {
            test: call("cond"),
            body: Box::new(Statement::block(body)),
        })
    }

    fn function(id: &str, is_async: bool, body: Vec<Statement>) -> Statement {
        Statement::FunctionDeclaration(Function {
            id: Some(id.to_string()),
            body: Block::new(body),
            is_async,
            ..Function::default()
        })
    }

    fn mutate(program: &mut Program, draws: Vec<f64>) -> (MutationStats, usize) {
        mutate_with(TryCatchMutator::new(), program, draws)
    }

    fn mutate_with(
        mutator: TryCatchMutator,
        program: &mut Program,
        draws: Vec<f64>,
    ) -> (MutationStats, usize) {
        let mut rng = ScriptedRandom::new(draws);
        let stats = mutator.mutate_with_stats(program, &mut rng);
        (stats, rng.draws_consumed())
    }

    fn compact(program: &Program) -> String {
        print_program(program, PrintStyle::Compact)
    }

    // --- Scenarios ---

    #[test]
    fn test_skip_band_late_in_source() {
        let mut program = Program::new(vec![
            Statement::marker(0.9),
            let_statement(DeclarationKind::Let, "x", call("compute")),
        ]);
        let (stats, _) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.01]);
        assert_eq!(compact(&program), "let x = compute();");
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_wrap_band_declarator() {
        let mut program = Program::new(vec![let_statement(
            DeclarationKind::Let,
            "x",
            call("compute"),
        )]);
        mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(compact(&program), "let x = __wrapTC(() => compute());");
    }

    #[test]
    fn test_configured_helper_name() {
        let config = TryCatchConfig {
            helper_name: "wrapTC".to_string(),
            ..TryCatchConfig::default()
        };
        let mutator = TryCatchMutator::with_config(config).unwrap();
        let mut program = Program::new(vec![let_statement(
            DeclarationKind::Let,
            "x",
            call("compute"),
        )]);
        mutate_with(mutator, &mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(compact(&program), "let x = wrapTC(() => compute());");
    }

    #[test]
    fn test_deferred_declarator_is_wrapped_at_exit() {
        let mut program = Program::new(vec![let_statement(
            DeclarationKind::Const,
            "x",
            call("compute"),
        )]);
        let (stats, _) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.9]);
        assert_eq!(compact(&program), "const x = __wrapTC(() => compute());");
        assert_eq!(stats.deferred, 1);
        assert_eq!(stats.wrapped_late, 1);
    }

    #[test]
    fn test_loop_wrapped_now_is_not_nested() {
        let mut program = Program::new(vec![while_loop(vec![call_statement("body")])]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(
            compact(&program),
            "try { while (cond()) { body(); } } catch (e) {}"
        );
        assert_eq!(draws, 2);
        assert_eq!(stats.wrapped(), 1);
    }

    #[test]
    fn test_deferred_loop_nests_handlers() {
        let mut program = Program::new(vec![while_loop(vec![call_statement("body")])]);
        let (stats, _) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.9, 0.9]);
        assert_eq!(
            compact(&program),
            "try { while (cond()) { try { body(); } catch (e) {} } } catch (e) {}"
        );
        assert_eq!(stats.deferred, 2);
        assert_eq!(stats.wrapped_late, 2);
    }

    #[test]
    fn test_labeled_loop_wraps_the_label() {
        let labeled = || {
            Statement::labeled(
                "outer",
                Statement::Loop(Loop::For {
                    init: None,
                    test: None,
                    update: None,
                    body: Box::new(Statement::block(vec![Statement::Continue(Some(
                        "outer".to_string(),
                    ))])),
                }),
            )
        };
        let expected = "try { outer: for (;;) { continue outer; } } catch (e) {}";

        let mut program = Program::new(vec![labeled()]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(compact(&program), expected);
        assert_eq!((stats.wrapped_now, draws), (1, 2));

        // Deferred: the loop itself gets no decision, the label is wrapped
        // at exit.
        let mut program = Program::new(vec![labeled()]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.9]);
        assert_eq!(compact(&program), expected);
        assert_eq!((stats.wrapped_late, draws), (1, 2));
    }

    #[test]
    fn test_await_initializer_keeps_await_outside() {
        let mut program = Program::new(vec![function(
            "f",
            true,
            vec![let_statement(
                DeclarationKind::Let,
                "x",
                Expression::await_expr(call("g")),
            )],
        )]);
        mutate(&mut program, vec![KEEP_DEFAULTS, 0.9, 0.3]);
        assert_eq!(
            compact(&program),
            "async function f() { let x = await __wrapTC(() => g()); }"
        );
    }

    #[test]
    fn test_function_body_wrapped_as_a_whole() {
        let mut program = Program::new(vec![function(
            "f",
            false,
            vec![Statement::Return(Some(call("g")))],
        )]);
        mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(
            compact(&program),
            "function f() { try { return g(); } catch (e) {} }"
        );
    }

    #[test]
    fn test_empty_function_body_is_ineligible() {
        let mut program = Program::new(vec![function("f", false, vec![])]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(compact(&program), "function f() {}");
        assert_eq!((stats.decisions, draws), (0, 1));
    }

    #[test]
    fn test_var_statement_wrapped_whole() {
        let mut program = Program::new(vec![let_statement(DeclarationKind::Var, "y", call("h"))]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(compact(&program), "try { var y = h(); } catch (e) {}");
        assert_eq!((stats.decisions, draws), (1, 2));
    }

    #[test]
    fn test_var_as_loop_body_is_ineligible() {
        let mut program = Program::new(vec![Statement::Loop(Loop::While {
            test: call("cond"),
            body: Box::new(let_statement(DeclarationKind::Var, "y", call("h"))),
        })]);
        let (stats, _) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.9]);
        assert_eq!(
            compact(&program),
            "try { while (cond()) var y = h(); } catch (e) {}"
        );
        assert_eq!(stats.decisions, 1);
    }

    #[test]
    fn test_loop_head_declarations_are_ineligible() {
        let mut program = Program::new(vec![Statement::Loop(Loop::For {
            init: Some(ForInit::Declaration(VariableDeclaration {
                kind: DeclarationKind::Let,
                declarations: vec![VariableDeclarator::new("i", Some(call("start")))],
            })),
            test: None,
            update: None,
            body: Box::new(Statement::Break(None)),
        })]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.9]);
        assert_eq!(
            compact(&program),
            "try { for (let i = start();;) break; } catch (e) {}"
        );
        assert_eq!((stats.decisions, draws), (1, 2));
    }

    #[test]
    fn test_literal_and_undefined_initializers_draw_nothing() {
        let mut program = Program::new(vec![
            let_statement(DeclarationKind::Let, "z", Expression::number(1.0)),
            let_statement(DeclarationKind::Const, "u", Expression::ident("undefined")),
            Statement::declaration(DeclarationKind::Let, vec![VariableDeclarator::new("w", None)]),
        ]);
        let before = program.clone();
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(program, before);
        assert_eq!((stats.decisions, draws), (0, 1));
    }

    #[test]
    fn test_existing_try_only_catch_body_is_visited() {
        let mut program = Program::new(vec![Statement::Try(TryStatement {
            block: Block::new(vec![call_statement("a")]),
            handler: Some(CatchClause {
                param: Some("err".to_string()),
                body: Block::new(vec![call_statement("b")]),
            }),
            finalizer: Some(Block::new(vec![call_statement("c")])),
        })]);
        let (stats, draws) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.3]);
        assert_eq!(
            compact(&program),
            "try { a(); } catch (err) { try { b(); } catch (e) {} } finally { c(); }"
        );
        assert_eq!((stats.decisions, draws), (1, 2));
    }

    #[test]
    fn test_deviation_is_annotated_on_the_unit() {
        let mut program = Program::new(vec![call_statement("f")]);
        let (stats, _) = mutate(&mut program, vec![0.01, 0.5, 0.2, 0.3]);
        assert!(stats.parameters_deviated);
        assert_eq!(
            compact(&program),
            "/* TryCatchMutator: Target skip probability 0.25 and toplevel probability 0.2 */ \
             try { f(); } catch (e) {}"
        );
    }

    #[test]
    fn test_position_regressions_are_ignored() {
        // The second marker would shrink the skip band if it were honored.
        let mut program = Program::new(vec![
            Statement::marker(0.9),
            Statement::marker(0.2),
            call_statement("f"),
        ]);
        let (stats, _) = mutate(&mut program, vec![KEEP_DEFAULTS, 0.04]);
        assert_eq!(compact(&program), "f();");
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_overfull_bands_leave_no_defer_band() {
        let config = TryCatchConfig {
            skip_probability: 0.5,
            toplevel_probability: 0.9,
            ..TryCatchConfig::default()
        };
        let mutator = TryCatchMutator::with_config(config).unwrap();
        let mut program = Program::new(vec![Statement::If(IfStatement {
            test: call("a"),
            consequent: Box::new(Statement::block(vec![call_statement("b")])),
            alternate: None,
        })]);
        let (stats, _) = mutate_with(mutator, &mut program, vec![KEEP_DEFAULTS, 0.99]);
        assert_eq!(compact(&program), "try { if (a()) { b(); } } catch (e) {}");
        assert_eq!(stats.deferred, 0);
    }

    #[test]
    fn test_deferred_declarator_with_arrow_body() {
        let arrow = Expression::Arrow(ArrowFunction {
            params: Vec::new(),
            body: ArrowBody::Block(Block::new(vec![call_statement("f")])),
            is_async: false,
        });
        let mut program = Program::new(vec![let_statement(DeclarationKind::Let, "x", arrow)]);
        mutate(&mut program, vec![KEEP_DEFAULTS, 0.9, 0.3]);
        assert_eq!(
            compact(&program),
            "let x = __wrapTC(() => () => { try { f(); } catch (e) {} });"
        );
    }
}
