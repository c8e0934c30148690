//! Lexical environment chain (spec §4.4). Grounded in the teacher's legacy
//! `interpreter/mod.rs::Scope` (`scope_stack: Vec<HashMap<...>>` with
//! `find`/`push`/`pop`/`set`/`update`), reshaped per spec's Design Notes into
//! singly-linked, reference-counted frames ("use reference-counted frames ...
//! to keep closures alive") instead of a flat stack, so a closure can retain
//! its defining scope after the enclosing call returns.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error on line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for RuntimeError {}

#[derive(Debug)]
struct Frame {
    values: RefCell<HashMap<String, Value>>,
    enclosing: Option<Environment>,
}

/// A handle to one lexical frame. Cloning shares the frame (spec §4.4: a
/// closure clones the `Environment` active at its creation, not the values
/// inside it), which is exactly what lets a returned closure keep mutating a
/// variable captured from its enclosing call after that call has returned.
#[derive(Debug, Clone)]
pub struct Environment(Rc<Frame>);

impl Environment {
    pub fn new_global() -> Self {
        Self(Rc::new(Frame {
            values: RefCell::new(HashMap::new()),
            enclosing: None,
        }))
    }

    pub fn new_enclosed(enclosing: &Environment) -> Self {
        Self(Rc::new(Frame {
            values: RefCell::new(HashMap::new()),
            enclosing: Some(enclosing.clone()),
        }))
    }

    /// Binds `name` in this frame, shadowing any outer binding of the same
    /// name. Re-declaring in the same frame silently replaces, matching the
    /// teacher's `Scope::set` semantics.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.values.borrow_mut().insert(name.into(), value);
    }

    pub fn get(&self, name: &str, line: usize) -> Result<Value, RuntimeError> {
        if let Some(value) = self.0.values.borrow().get(name) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &self.0.enclosing {
            return enclosing.get(name, line);
        }
        Err(RuntimeError {
            message: format!("Undefined variable '{name}'."),
            line,
        })
    }

    pub fn assign(&self, name: &str, value: Value, line: usize) -> Result<(), RuntimeError> {
        if self.0.values.borrow().contains_key(name) {
            self.0.values.borrow_mut().insert(name.to_owned(), value);
            return Ok(());
        }
        if let Some(enclosing) = &self.0.enclosing {
            return enclosing.assign(name, value, line);
        }
        Err(RuntimeError {
            message: format!("Undefined variable '{name}'."),
            line,
        })
    }

    /// Walks exactly `distance` links outward, per the resolver's computed
    /// depth (spec §5, §9) — never searches, so shadowing in a further-out
    /// scope cannot be mistaken for the resolved binding.
    fn ancestor(&self, distance: usize) -> Environment {
        let mut env = self.clone();
        for _ in 0..distance {
            env = env
                .0
                .enclosing
                .clone()
                .expect("resolver-computed distance must stay within the environment chain");
        }
        env
    }

    pub fn get_at(&self, distance: usize, name: &str, line: usize) -> Result<Value, RuntimeError> {
        let frame = self.ancestor(distance);
        frame.0.values.borrow().get(name).cloned().ok_or_else(|| RuntimeError {
            message: format!("Undefined variable '{name}'."),
            line,
        })
    }

    pub fn assign_at(
        &self,
        distance: usize,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<(), RuntimeError> {
        let frame = self.ancestor(distance);
        frame.0.values.borrow_mut().insert(name.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowed_inner_binding_does_not_leak_outward() {
        let global = Environment::new_global();
        global.define("a", Value::Integer(1));
        let inner = Environment::new_enclosed(&global);
        inner.define("a", Value::Integer(2));
        assert_eq!(inner.get("a", 1).unwrap(), Value::Integer(2));
        assert_eq!(global.get("a", 1).unwrap(), Value::Integer(1));
    }

    #[test]
    fn assign_walks_to_the_defining_frame() {
        let global = Environment::new_global();
        global.define("a", Value::Integer(1));
        let inner = Environment::new_enclosed(&global);
        inner.assign("a", Value::Integer(9), 1).unwrap();
        assert_eq!(global.get("a", 1).unwrap(), Value::Integer(9));
    }

    #[test]
    fn cloned_environment_shares_the_same_frame() {
        let global = Environment::new_global();
        global.define("a", Value::Integer(1));
        let captured = global.clone();
        global.assign("a", Value::Integer(5), 1).unwrap();
        assert_eq!(captured.get("a", 1).unwrap(), Value::Integer(5));
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let global = Environment::new_global();
        assert!(global.get("missing", 1).is_err());
    }
}
