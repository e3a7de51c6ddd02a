#[cfg(test)]
mod session_tests {
    use pretty_assertions::assert_eq;

    use sinterp::session::{Session, SharedBuffer, Status};

    fn session() -> (Session, SharedBuffer) {
        let out = SharedBuffer::new();
        (Session::with_output(Box::new(out.clone())), out)
    }

    #[test]
    fn test_static_error_blocks_whole_unit() {
        let (mut session, out) = session();

        let status = session.run("print 1;\nprint 2\nprint 3;");

        assert_eq!(status, Status::StaticError);
        assert_eq!(out.contents(), "");
        assert_eq!(status.exit_code(), 65);
    }

    #[test]
    fn test_parser_reports_every_broken_statement() {
        let (mut session, _) = session();

        session.run("var = 1;\nprint 2;\nprint (;\nprint 4;");

        let lines: Vec<Option<usize>> = session
            .diagnostics()
            .errors()
            .iter()
            .map(|e| e.line())
            .collect();
        assert_eq!(lines, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_lex_errors_do_not_stop_scanning() {
        let (mut session, _) = session();

        let status = session.run("var a = 1 @ 2;\nprint # a;");

        assert_eq!(status, Status::StaticError);

        let messages: Vec<String> = session
            .diagnostics()
            .errors()
            .iter()
            .filter(|e| matches!(e, sinterp::error::SinterpError::Lex { .. }))
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "[line 1] Error: Unexpected character: @",
                "[line 2] Error: Unexpected character: #",
            ]
        );
    }

    #[test]
    fn test_resolve_error_blocks_execution() {
        let (mut session, out) = session();

        let status = session.run("print \"before\"; { var a = a; }");

        assert_eq!(status, Status::StaticError);
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_runtime_error_stops_at_failing_statement() {
        let (mut session, out) = session();

        let status = session.run("print 1; print nil + 1; print 3;");

        assert_eq!(status, Status::RuntimeError);
        assert_eq!(status.exit_code(), 70);
        assert_eq!(out.contents(), "1\n");
    }

    #[test]
    fn test_repl_state_persists_across_lines() {
        let (mut session, out) = session();

        assert_eq!(session.run_line("var count = 0;"), Status::Ok);
        assert_eq!(
            session.run_line("fun bump() { count = count + 1; return count; }"),
            Status::Ok
        );
        assert_eq!(session.run_line("bump();"), Status::Ok);
        assert_eq!(session.run_line("print bump();"), Status::Ok);

        assert_eq!(out.contents(), "2\n");
    }

    #[test]
    fn test_repl_closures_keep_resolution_across_lines() {
        let (mut session, out) = session();

        session.run_line("fun make() { var n = 10; fun get() { return n; } return get; }");
        session.run_line("var g = make();");
        session.run_line("print g();");

        assert_eq!(out.contents(), "10\n");
    }

    #[test]
    fn test_repl_static_error_cleared_for_next_line() {
        let (mut session, out) = session();

        assert_eq!(session.run_line("print ;"), Status::StaticError);
        assert!(session.diagnostics().had_static_error());

        assert_eq!(session.run_line("print \"ok\";"), Status::Ok);
        assert!(!session.diagnostics().had_static_error());
        assert!(session.diagnostics().errors().is_empty());

        assert_eq!(out.contents(), "ok\n");
    }

    #[test]
    fn test_repl_runtime_flag_accumulates() {
        let (mut session, _) = session();

        assert_eq!(session.run_line("nil();"), Status::RuntimeError);
        assert_eq!(session.run_line("print 1;"), Status::Ok);

        assert!(session.diagnostics().had_runtime_error());
        assert_eq!(session.diagnostics_mut().drain().len(), 1);
    }

    #[test]
    fn test_parse_only_does_not_execute() {
        let (mut session, out) = session();

        let statements = session.parse("print 1; print 2;");

        assert_eq!(statements.len(), 2);
        assert_eq!(out.contents(), "");
    }
}
