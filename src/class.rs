use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::error::{Result, RuntimeErrorKind, SinterpError};
use crate::function::{Callable, Function};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

/// Name of the method run on construction.
pub const INITIALIZER: &str = "init";

/// A class: its name and method table.  Methods close over the environment
/// the class was declared in; `this` is bound per access.
pub struct Class {
    name: String,
    methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(name: &str, methods: HashMap<String, Rc<Function>>) -> Self {
        Self {
            name: name.to_string(),
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        self.methods.get(name).cloned()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

// Implemented on the handle: instances keep a reference to their class.
impl Callable for Rc<Class> {
    /// Arity of `init`, or zero without one.
    fn arity(&self) -> usize {
        self.find_method(INITIALIZER).map_or(0, |init| init.arity())
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        call_site: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        debug!("Instantiating class '{}'", self.name);

        let instance: Rc<RefCell<Instance>> = Rc::new(RefCell::new(Instance::new(Rc::clone(self))));

        if let Some(init) = self.find_method(INITIALIZER) {
            init.bind(Rc::clone(&instance))
                .call(interpreter, call_site, arguments)?;
        }

        Ok(Value::Instance(instance))
    }
}

/// An object: its class plus fields created on first assignment.
pub struct Instance {
    class: Rc<Class>,
    fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// Fields shadow methods; a method comes back bound to `instance`.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Value> {
        let this = instance.borrow();

        if let Some(value) = this.fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = this.class.find_method(&name.lexeme) {
            debug!("Binding method '{}' to instance", name.lexeme);

            return Ok(Value::Function(Rc::new(method.bind(Rc::clone(instance)))));
        }

        Err(SinterpError::runtime(
            RuntimeErrorKind::UndefinedProperty,
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
