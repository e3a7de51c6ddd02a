//! Callable values: host‑implemented natives and user functions (closures).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::FunctionDecl;
use crate::class::Instance;
use crate::environment::{EnvRef, Environment};
use crate::error::{Result, RuntimeErrorKind, SinterpError};
use crate::interpreter::{Flow, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// Anything that can appear as the callee of a call expression.
pub trait Callable {
    /// Exact number of arguments the callee accepts.
    fn arity(&self) -> usize;

    /// Invoke with already‑evaluated arguments.  The interpreter has checked
    /// `arguments.len() == self.arity()` before calling; `call_site` is the
    /// closing paren, used to place errors.
    fn call(
        &self,
        interpreter: &mut Interpreter,
        call_site: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value>;
}

/// Function implemented by the host.  Failures come back as plain messages
/// and are turned into runtime errors at the call site.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> std::result::Result<Value, String>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// Seconds since the Unix epoch, as a number.
pub fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock",
        arity: 0,
        func: |_args: &[Value]| {
            let now = chrono::Utc::now();
            let seconds: f64 =
                now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0;

            debug!("Native function 'clock' returned: {}", seconds);

            Ok(Value::Number(seconds))
        },
    }
}

/// A user function: its declaration plus the environment it closed over.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,

    /// `init` methods always yield their `this`.
    is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// A copy of this method whose closure has `this` bound to `instance`.
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> Function {
        let environment: EnvRef = Environment::with_enclosing(Rc::clone(&self.closure));
        environment
            .borrow_mut()
            .define("this", Value::Instance(instance));

        Function::new(
            Rc::clone(&self.declaration),
            environment,
            self.is_initializer,
        )
    }

    /// `this` as bound by [`bind`](Self::bind); only meaningful for methods.
    fn bound_this(&self) -> Value {
        self.closure.borrow().get_here("this").unwrap_or(Value::Nil)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl Callable for Function {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        _call_site: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        // Parent is the closure, never the caller's environment.
        let environment: EnvRef = Environment::with_enclosing(Rc::clone(&self.closure));
        {
            let mut scope = environment.borrow_mut();
            for (param, argument) in self.declaration.params.iter().zip(arguments) {
                debug!("Binding parameter '{}' to {}", param.lexeme, argument);
                scope.define(&param.lexeme, argument);
            }
        }

        let flow: Flow = interpreter.execute_block(&self.declaration.body, environment)?;

        let result: Value = match flow {
            _ if self.is_initializer => self.bound_this(),
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        };

        info!("Function '{}' returned: {}", self.name(), result);

        Ok(result)
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        call_site: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        (self.func)(&arguments)
            .map_err(|message| SinterpError::runtime(RuntimeErrorKind::Native, call_site, message))
    }
}
