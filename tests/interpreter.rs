#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use sinterp::error::RuntimeErrorKind;
    use sinterp::session::{Session, SharedBuffer, Status};

    /// Run `source` in a fresh session; return status, printed lines and
    /// error messages.
    fn run(source: &str) -> (Status, Vec<String>, Vec<String>) {
        let out = SharedBuffer::new();
        let mut session = Session::with_output(Box::new(out.clone()));

        let status = session.run(source);
        let errors = session
            .diagnostics_mut()
            .drain()
            .into_iter()
            .map(|e| e.to_string())
            .collect();

        (status, lines(&out), errors)
    }

    fn lines(out: &SharedBuffer) -> Vec<String> {
        out.contents().lines().map(str::to_string).collect()
    }

    fn output(source: &str) -> Vec<String> {
        let (status, printed, errors) = run(source);
        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(status, Status::Ok);
        printed
    }

    fn runtime_kind(source: &str) -> RuntimeErrorKind {
        let mut session = Session::with_output(Box::new(SharedBuffer::new()));
        assert_eq!(session.run(source), Status::RuntimeError);

        let errors = session.diagnostics_mut().drain();
        assert_eq!(errors.len(), 1);
        errors[0]
            .runtime_kind()
            .expect("runtime error should carry a kind")
    }

    // ── values and operators ────────────────────────────────────────────

    #[test]
    fn test_arithmetic_printing() {
        assert_eq!(
            output("print 1 + 2; print 7 / 2; print -3 * 2; print 10 - 0.5;"),
            vec!["3", "3.5", "-6", "9.5"]
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            output("var a = \"foo\"; print a + \"bar\";"),
            vec!["foobar"]
        );
    }

    #[test]
    fn test_mixed_plus_is_type_error() {
        assert_eq!(runtime_kind("print \"a\" + 1;"), RuntimeErrorKind::Type);

        let (_, _, errors) = run("print \"a\" + 1;");
        assert_eq!(
            errors,
            vec!["Operands must be two numbers or two strings.\n[line 1]"]
        );
    }

    #[test]
    fn test_numeric_operand_errors() {
        assert_eq!(runtime_kind("print -\"x\";"), RuntimeErrorKind::Type);
        assert_eq!(runtime_kind("print 1 < \"2\";"), RuntimeErrorKind::Type);
        assert_eq!(runtime_kind("print nil * 2;"), RuntimeErrorKind::Type);
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(
            output("print !nil; print !false; print !0; print !\"\"; print !!true;"),
            vec!["true", "true", "false", "false", "true"]
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            output(
                "print 1 == 1; print \"a\" == \"a\"; print nil == false; print 1 != \"1\"; \
                 print nil == nil;"
            ),
            vec!["true", "true", "false", "true", "true"]
        );
    }

    #[test]
    fn test_comparison() {
        assert_eq!(
            output("print 1 < 2; print 2 <= 2; print 3 > 4; print 4 >= 5;"),
            vec!["true", "true", "false", "false"]
        );
    }

    #[test]
    fn test_negative_zero_display() {
        assert_eq!(output("print -0; print 0 * -1; print -0 == 0;"), vec!["-0", "-0", "true"]);
    }

    #[test]
    fn test_division_by_zero_is_infinity() {
        assert_eq!(
            output("print 1 / 0; print -1 / 0; print (0 / 0) == (0 / 0);"),
            vec!["Infinity", "-Infinity", "false"]
        );
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            output("print nil or \"yes\"; print \"first\" or \"second\"; print nil and 1; print 1 and 2;"),
            vec!["yes", "first", "nil", "2"]
        );
    }

    #[test]
    fn test_logical_short_circuit() {
        assert_eq!(
            output("var hit = false; fun mark() { hit = true; return true; } false and mark(); print hit; true or mark(); print hit;"),
            vec!["false", "false"]
        );
    }

    // ── variables and scope ─────────────────────────────────────────────

    #[test]
    fn test_shadowing_and_block_restore() {
        assert_eq!(
            output("var a = 1; { var a = 2; print a; } print a;"),
            vec!["2", "1"]
        );
    }

    #[test]
    fn test_assignment_reaches_enclosing_scope() {
        assert_eq!(
            output("var a = 1; { a = 2; } print a; var b; print b;"),
            vec!["2", "nil"]
        );
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            runtime_kind("print missing;"),
            RuntimeErrorKind::UndefinedVariable
        );
        assert_eq!(
            runtime_kind("missing = 1;"),
            RuntimeErrorKind::UndefinedVariable
        );

        let (_, _, errors) = run("\nprint missing;");
        assert_eq!(errors, vec!["Undefined variable 'missing'.\n[line 2]"]);
    }

    #[test]
    fn test_closure_sees_declaration_scope() {
        assert_eq!(
            output(
                "var a = \"global\"; { fun show() { print a; } show(); var a = \"block\"; show(); }"
            ),
            vec!["global", "global"]
        );
    }

    // ── control flow ────────────────────────────────────────────────────

    #[test]
    fn test_if_else() {
        assert_eq!(
            output("if (1 > 2) print \"a\"; else print \"b\"; if (nil) print \"c\";"),
            vec!["b"]
        );
    }

    #[test]
    fn test_while_and_for() {
        assert_eq!(
            output("var i = 0; while (i < 3) { print i; i = i + 1; } for (var j = 0; j < 2; j = j + 1) print j;"),
            vec!["0", "1", "2", "0", "1"]
        );
    }

    #[test]
    fn test_return_exits_loops_inside_functions() {
        assert_eq!(
            output("fun first() { for (var i = 0; ; i = i + 1) { if (i == 3) return i; } } print first();"),
            vec!["3"]
        );
    }

    // ── functions ───────────────────────────────────────────────────────

    #[test]
    fn test_recursion() {
        assert_eq!(
            output("fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(10);"),
            vec!["55"]
        );
    }

    #[test]
    fn test_bare_return_and_fall_through_yield_nil() {
        assert_eq!(
            output("fun a() { return; } fun b() {} print a(); print b();"),
            vec!["nil", "nil"]
        );
    }

    #[test]
    fn test_counters_are_independent() {
        let source = "fun makeCounter() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }
                      var c1 = makeCounter(); var c2 = makeCounter();
                      print c1(); print c1(); print c2();";

        assert_eq!(output(source), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_closures_share_captured_variable() {
        let source = "var get; var set;
                      { var x = 1; fun g() { return x; } fun s(v) { x = v; } get = g; set = s; }
                      set(5); print get();";

        assert_eq!(output(source), vec!["5"]);
    }

    #[test]
    fn test_closures_from_same_call_share_state() {
        let source = "var get; var set;
                      fun pair() {
                        var x = 0;
                        fun g() { return x; }
                        fun s(v) { x = v; }
                        get = g; set = s;
                      }
                      pair();
                      print get(); set(7); print get();
                      var oldGet = get;
                      pair();
                      print get(); print oldGet();";

        assert_eq!(output(source), vec!["0", "7", "0", "7"]);
    }

    #[test]
    fn test_unbounded_recursion_is_a_runtime_error() {
        assert_eq!(
            runtime_kind("fun f(n) { return f(n + 1); } f(0);"),
            RuntimeErrorKind::StackOverflow
        );

        let (status, _, errors) = run("fun f(n) { return f(n + 1); }\nf(0);");
        assert_eq!(status, Status::RuntimeError);
        assert_eq!(errors, vec!["Stack overflow.\n[line 1]"]);
    }

    #[test]
    fn test_session_usable_after_stack_overflow() {
        let out = SharedBuffer::new();
        let mut session = Session::with_output(Box::new(out.clone()));

        assert_eq!(session.run_line("var kept = \"still here\";"), Status::Ok);
        assert_eq!(
            session.run_line("fun down() { down(); } down();"),
            Status::RuntimeError
        );
        assert_eq!(
            session.run_line("fun count(n) { if (n == 0) return 0; return 1 + count(n - 1); } print count(500); print kept;"),
            Status::Ok
        );

        assert_eq!(lines(&out), vec!["500", "still here"]);
    }

    #[test]
    fn test_function_display() {
        assert_eq!(
            output("fun f() {} print f; print clock;"),
            vec!["<fn f>", "<native fn>"]
        );
    }

    #[test]
    fn test_clock_returns_a_number() {
        assert_eq!(output("print clock() > 0;"), vec!["true"]);
    }

    #[test]
    fn test_call_errors_have_distinct_kinds() {
        assert_eq!(
            runtime_kind("\"text\"();"),
            RuntimeErrorKind::NotCallable
        );
        assert_eq!(
            runtime_kind("fun f(a, b) {} f(1);"),
            RuntimeErrorKind::Arity
        );

        let (_, _, errors) = run("fun f(a, b) {} f(1);");
        assert_eq!(errors, vec!["Expected 2 arguments but got 1.\n[line 1]"]);
    }

    #[test]
    fn test_environment_restored_after_error_in_call() {
        let out = SharedBuffer::new();
        let mut session = Session::with_output(Box::new(out.clone()));

        assert_eq!(
            session.run("var a = \"outer\"; fun boom() { var a = \"inner\"; nil(); }"),
            Status::Ok
        );
        assert_eq!(session.run_line("boom();"), Status::RuntimeError);
        assert_eq!(session.run_line("print a;"), Status::Ok);

        assert_eq!(lines(&out), vec!["outer"]);
        assert!(session.diagnostics().had_runtime_error());
    }

    // ── classes ─────────────────────────────────────────────────────────

    #[test]
    fn test_fields_round_trip() {
        assert_eq!(
            output("class Box {} var b = Box(); b.value = 42; print b.value; print b; print Box;"),
            vec!["42", "Box instance", "Box"]
        );
    }

    #[test]
    fn test_undefined_property() {
        assert_eq!(
            runtime_kind("class A {} A().missing;"),
            RuntimeErrorKind::UndefinedProperty
        );

        let (_, _, errors) = run("class A {} A().missing;");
        assert_eq!(errors, vec!["Undefined property 'missing'.\n[line 1]"]);
    }

    #[test]
    fn test_property_on_non_instance() {
        assert_eq!(
            runtime_kind("var n = 1; print n.x;"),
            RuntimeErrorKind::NotAnInstance
        );
        assert_eq!(
            runtime_kind("var n = 1; n.x = 2;"),
            RuntimeErrorKind::NotAnInstance
        );
    }

    #[test]
    fn test_init_and_this() {
        let source = "class Point {
                        init(x, y) { this.x = x; this.y = y; }
                        sum() { return this.x + this.y; }
                      }
                      var p = Point(1, 2);
                      print p.sum();
                      var s = p.sum;
                      p.x = 10;
                      print s();";

        assert_eq!(output(source), vec!["3", "12"]);
    }

    #[test]
    fn test_init_arity_governs_class_call() {
        assert_eq!(
            runtime_kind("class P { init(a) {} } P();"),
            RuntimeErrorKind::Arity
        );
        assert_eq!(runtime_kind("class Q {} Q(1);"), RuntimeErrorKind::Arity);
    }

    #[test]
    fn test_init_returns_instance() {
        assert_eq!(
            output("class A { init() { this.v = 1; return; } } var a = A(); print a.init(); print a.init().v;"),
            vec!["A instance", "1"]
        );
    }

    #[test]
    fn test_fields_shadow_methods() {
        assert_eq!(
            output("class A { m() { return \"method\"; } } var a = A(); print a.m(); a.m = \"field\"; print a.m;"),
            vec!["method", "field"]
        );
    }

    #[test]
    fn test_methods_close_over_class_scope() {
        let source = "fun outer() { var tag = \"t\"; class C { show() { return tag; } } return C; }
                      print outer()().show();";

        assert_eq!(output(source), vec!["t"]);
    }
}
