#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;

    use sinterp::ast::{ExprKind, Stmt};
    use sinterp::ast_printer::AstPrinter;
    use sinterp::diagnostics::Diagnostics;
    use sinterp::parser::{Parser, MAX_ARITY};
    use sinterp::scanner::Scanner;

    fn parse(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let tokens = Scanner::new(source.as_bytes()).filter_map(Result::ok);
        let mut diagnostics = Diagnostics::new();
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        (statements, diagnostics)
    }

    fn printed(source: &str) -> Vec<String> {
        let (statements, diagnostics) = parse(source);
        assert!(
            !diagnostics.had_static_error(),
            "unexpected errors: {:?}",
            diagnostics.errors()
        );

        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.errors().iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(
            printed("1 + 2 * 3 - -4;"),
            vec!["(; (- (+ 1.0 (* 2.0 3.0)) (- 4.0)))"]
        );
        assert_eq!(
            printed("print (1 + 2) * 3;"),
            vec!["(print (* (group (+ 1.0 2.0)) 3.0))"]
        );
        assert_eq!(
            printed("a or b and !c == d;"),
            vec!["(; (or a (and b (== (! c) d))))"]
        );
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn test_calls_properties_and_set() {
        assert_eq!(
            printed("obj.field.method(1, \"two\")(); obj.x = 3;"),
            vec![
                "(; (call (call (. (. obj field) method) 1.0 two)))",
                "(; (= (. obj x) 3.0))",
            ]
        );
    }

    #[test]
    fn test_for_desugars_to_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn test_for_without_clauses_loops_on_true() {
        let (statements, diagnostics) = parse("for (;;) print 1;");
        assert!(!diagnostics.had_static_error());

        match &statements[0] {
            Stmt::While { condition, .. } => {
                assert!(matches!(condition.kind, ExprKind::Literal(_)));
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_class_and_function_declarations() {
        assert_eq!(
            printed("class Point { init(x, y) { this.x = x; } sum() { return this.x; } }"),
            vec![
                "(class Point (method init (x y) (; (= (. this x) x))) (method sum () (return (. this x))))"
            ]
        );
        assert_eq!(
            printed("fun f() { return; }"),
            vec!["(fun f () (return))"]
        );
    }

    #[test]
    fn test_if_else_and_var_without_initializer() {
        assert_eq!(
            printed("var a; if (a) print 1; else { print 2; }"),
            vec!["(var a)", "(if a (print 1.0) (block (print 2.0)))"]
        );
    }

    #[test]
    fn test_invalid_assignment_target_keeps_parsing() {
        let (statements, diagnostics) = parse("a + b = c; print 1;");

        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        let (statements, diagnostics) = parse("print 1");

        assert!(statements.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at end: Expect ';' after value."]
        );
    }

    #[test]
    fn test_synchronize_recovers_at_next_statement() {
        let (statements, diagnostics) = parse("var = 1;\nprint 2;\nvar x = ;\nprint 3;");

        assert_eq!(
            messages(&diagnostics),
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 3] Error at ';': Expect expression.",
            ]
        );

        let rendered: Vec<String> = statements.iter().map(AstPrinter::print_stmt).collect();
        assert_eq!(rendered, vec!["(print 2.0)", "(print 3.0)"]);
    }

    #[test]
    fn test_too_many_arguments_is_reported_but_not_fatal() {
        let args: Vec<String> = (0..=MAX_ARITY).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, diagnostics) = parse(&source);

        assert_eq!(statements.len(), 1);
        assert_eq!(diagnostics.errors().len(), 1);
        assert!(diagnostics.errors()[0]
            .to_string()
            .contains("Can't have more than 255 arguments."));
    }

    #[test]
    fn test_too_many_parameters_is_reported() {
        let params: Vec<String> = (0..=MAX_ARITY).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (statements, diagnostics) = parse(&source);

        assert_eq!(statements.len(), 1);
        assert!(diagnostics.errors()[0]
            .to_string()
            .contains("Can't have more than 255 parameters."));
    }

    #[test]
    fn test_max_arity_is_accepted() {
        let args: Vec<String> = (0..MAX_ARITY).map(|i| i.to_string()).collect();
        let (_, diagnostics) = parse(&format!("f({});", args.join(", ")));

        assert!(!diagnostics.had_static_error());
    }
}
