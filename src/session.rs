//! Driver: source text in, effects out.
//!
//! A [`Session`] owns one interpreter and one [`Diagnostics`] and pushes each
//! unit of source (a file, or a REPL line) through scan → parse → resolve →
//! interpret.  Any static error stops the unit before it runs.  Globals,
//! closures and hop counts persist from one unit to the next.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::ast::Stmt;
use crate::diagnostics::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;

/// How a unit of source finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,

    /// Lex, parse or resolve errors; nothing was executed.
    StaticError,

    /// Execution started and stopped at a runtime error.
    RuntimeError,
}

impl Status {
    /// Conventional process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::StaticError => 65,
            Status::RuntimeError => 70,
        }
    }
}

pub struct Session {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Starting new session");

        Self {
            interpreter: Interpreter::with_output(out),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Scan `source` into tokens.  Lex errors are recorded and skipped; the
    /// result always ends with `EOF`.
    pub fn scan(&mut self, source: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for result in Scanner::new(source.as_bytes()) {
            match result {
                Ok(token) => tokens.push(token),
                Err(e) => self.diagnostics.report(e),
            }
        }

        debug!("Scanned {} tokens", tokens.len());

        tokens
    }

    /// Scan and parse without resolving or running.
    pub fn parse(&mut self, source: &str) -> Vec<Stmt> {
        let tokens: Vec<Token> = self.scan(source);

        Parser::new(tokens).parse(&mut self.diagnostics)
    }

    /// Run one unit of source to completion.
    pub fn run(&mut self, source: &str) -> Status {
        info!("Running unit of {} bytes", source.len());

        let statements: Vec<Stmt> = self.parse(source);

        if self.diagnostics.had_static_error() {
            info!("Syntax errors present, skipping resolution");
            return Status::StaticError;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements, &mut self.diagnostics);

        if self.diagnostics.had_static_error() {
            info!("Resolution errors present, skipping execution");
            return Status::StaticError;
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => Status::Ok,
            Err(e) => {
                debug!("Runtime debug: {}", e);
                self.diagnostics.report(e);
                Status::RuntimeError
            }
        }
    }

    /// REPL entry: forget the previous line's static errors, then run.
    pub fn run_line(&mut self, line: &str) -> Status {
        self.diagnostics.reset_static();
        self.run(line)
    }
}

/// In‑memory `print` sink that stays readable after being handed to a
/// session.  Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
