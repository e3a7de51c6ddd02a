//! Centralised error hierarchy for **sinterp**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This gives a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow` in the binary, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself; that is the job of the
//! session driver.

use std::fmt;
use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Token, TokenType};

/// Classifies runtime failures so callers can tell them apart without
/// matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Operand(s) of the wrong type for an operator.
    Type,

    /// Read or assignment of a name that is bound nowhere in the chain.
    UndefinedVariable,

    /// Property lookup that hit neither a field nor a method.
    UndefinedProperty,

    /// Call of a value that is neither a function nor a class.
    NotCallable,

    /// Argument count differs from the callee's arity.
    Arity,

    /// Property access on something other than an instance.
    NotAnInstance,

    /// Failure reported by host code inside a native function.
    Native,

    /// Call nesting passed [`MAX_CALL_DEPTH`](crate::interpreter::MAX_CALL_DEPTH).
    StackOverflow,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            RuntimeErrorKind::Type => "type error",
            RuntimeErrorKind::UndefinedVariable => "undefined variable",
            RuntimeErrorKind::UndefinedProperty => "undefined property",
            RuntimeErrorKind::NotCallable => "not callable",
            RuntimeErrorKind::Arity => "arity mismatch",
            RuntimeErrorKind::NotAnInstance => "not an instance",
            RuntimeErrorKind::Native => "native failure",
            RuntimeErrorKind::StackOverflow => "stack overflow",
        };

        f.write_str(name)
    }
}

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinterpError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.  `location` is either ` at 'lexeme'` or
    /// ` at end`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        location: String,
        line: usize,
    },

    /// Static‑analysis failure found by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        location: String,
        line: usize,
    },

    /// Runtime evaluation error, tagged with the line of the offending token.
    #[error("{message}\n[line {line}]")]
    Runtime {
        kind: RuntimeErrorKind,
        message: String,
        line: usize,
    },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops,
    /// including writes to the `print` sink.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// ` at 'lexeme'`, or ` at end` for the EOF marker.
fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl SinterpError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        SinterpError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        SinterpError::Parse {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        SinterpError::Resolve {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(kind: RuntimeErrorKind, token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: kind={}, line={}, msg={}",
            kind, token.line, message
        );

        SinterpError::Runtime {
            kind,
            message,
            line: token.line,
        }
    }

    /// The runtime kind, if this is a runtime error.
    pub fn runtime_kind(&self) -> Option<RuntimeErrorKind> {
        match self {
            SinterpError::Runtime { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Source line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            SinterpError::Lex { line, .. }
            | SinterpError::Parse { line, .. }
            | SinterpError::Resolve { line, .. }
            | SinterpError::Runtime { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Static errors are the ones that must stop a unit before execution.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            SinterpError::Lex { .. } | SinterpError::Parse { .. } | SinterpError::Resolve { .. }
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, SinterpError>;
