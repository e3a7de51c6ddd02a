//! Runtime scope chain.
//!
//! Each environment maps names to values and points at its enclosing
//! environment; the chain ends at the globals.  Environments are shared
//! (`Rc<RefCell<_>>`) because closures keep the scope they were declared in
//! alive after the block or call that created it has finished.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{Result, RuntimeErrorKind, SinterpError};
use crate::token::Token;
use crate::value::Value;

/// Shared handle to an environment.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A fresh global environment.
    pub fn new() -> EnvRef {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A fresh child of `enclosing`.
    pub fn with_enclosing(enclosing: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    /// Bind `name` in *this* environment, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Value bound in *this* environment only.
    pub fn get_here(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    /// Unresolved read: search outward until the name is found.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Unresolved write: search outward, fail if the name is bound nowhere.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Resolved read: look in exactly the environment `distance` hops out.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        let target: EnvRef = Self::ancestor(env, distance, name)?;
        let value = target.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| undefined(name))
    }

    /// Resolved write into exactly the environment `distance` hops out.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        let target: EnvRef = Self::ancestor(env, distance, name)?;
        target
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);

        Ok(())
    }

    /// Walk `distance` enclosing links without comparing names.
    fn ancestor(env: &EnvRef, distance: usize, name: &Token) -> Result<EnvRef> {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let next: Option<EnvRef> = current.borrow().enclosing.clone();

            current = match next {
                Some(next) => next,
                None => {
                    debug!(
                        "Scope chain shorter than {} hops while resolving '{}'",
                        distance, name.lexeme
                    );

                    return Err(undefined(name));
                }
            };
        }

        Ok(current)
    }
}

fn undefined(name: &Token) -> SinterpError {
    SinterpError::runtime(
        RuntimeErrorKind::UndefinedVariable,
        name,
        format!("Undefined variable '{}'.", name.lexeme),
    )
}
