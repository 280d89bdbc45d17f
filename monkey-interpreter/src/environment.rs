use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
struct EnvironmentCore {
    store: HashMap<Rc<str>, Rc<Object>>,
    outer: Option<Environment>,
}

/// One lexical scope, shared between the frame that created it and any
/// closure that captured it. The `outer` chain only ever points at
/// enclosing scopes, so it is acyclic.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            inner: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: Environment) -> Environment {
        Environment {
            inner: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        let core = self.inner.borrow();
        core.store
            .get(name)
            .cloned()
            .or_else(|| core.outer.as_ref().and_then(|outer| outer.get(name)))
    }

    // Always writes the local binding; outer scopes are never mutated
    // through an inner one.
    pub fn set(&mut self, name: Rc<str>, value: Rc<Object>) {
        self.inner.borrow_mut().store.insert(name, value);
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
