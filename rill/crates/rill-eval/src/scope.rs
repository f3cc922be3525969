//! The variable scope chain.

use crate::value::Value;
use rill_util::Symbol;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Scopes are shared and mutated through call frames, so they're reference
/// counted rather than owned - a closure's `captured_scope` and the scope a
/// caller is standing in can both point at the same [`Scope`].
pub type ScopeRef = Rc<RefCell<Scope>>;

pub struct Scope {
    bindings: FxHashMap<Symbol, Value>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn new(parent: Option<ScopeRef>) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            parent,
        }))
    }

    pub fn root() -> ScopeRef {
        Scope::new(None)
    }

    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Scope::new(Some(parent.clone()))
    }

    /// Walks to the outermost ancestor of `scope` - the global scope every
    /// nested call and loop body ultimately shares, and the one `run`
    /// evaluates sibling scripts against so their top-level bindings persist
    /// back into the caller.
    pub fn global_of(scope: &ScopeRef) -> ScopeRef {
        let parent = scope.borrow().parent.clone();
        match parent {
            Some(parent) => Scope::global_of(&parent),
            None => scope.clone(),
        }
    }

    /// Walks up the parent chain, returning the first binding found.
    pub fn get(&self, name: Symbol) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => None,
        }
    }

    /// Always binds in the current scope, shadowing any binding of the same
    /// name further up the chain.
    pub fn set(&mut self, name: Symbol, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Removes a binding from the current scope only; does not reach into
    /// parent scopes.
    pub fn remove(&mut self, name: Symbol) -> Option<Value> {
        self.bindings.remove(&name)
    }

    pub fn is_defined(&self, name: Symbol) -> bool {
        self.bindings.contains_key(&name) || self.parent.as_ref().is_some_and(|p| p.borrow().is_defined(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_in_same_scope() {
        let scope = Scope::root();
        let name = Symbol::intern("x");
        scope.borrow_mut().set(name, Value::int(42));
        match scope.borrow().get(name) {
            Some(Value::Number(n)) => assert_eq!(n.as_f64(), 42.0),
            _ => panic!("expected binding"),
        }
    }

    #[test]
    fn test_child_sees_parent_bindings() {
        let parent = Scope::root();
        let name = Symbol::intern("x");
        parent.borrow_mut().set(name, Value::int(1));
        let child = Scope::child(&parent);
        assert!(child.borrow().get(name).is_some());
    }

    #[test]
    fn test_child_set_does_not_leak_to_parent() {
        let parent = Scope::root();
        let child = Scope::child(&parent);
        let name = Symbol::intern("y");
        child.borrow_mut().set(name, Value::int(1));
        assert!(parent.borrow().get(name).is_none());
    }

    #[test]
    fn test_remove_only_touches_current_scope() {
        let parent = Scope::root();
        let name = Symbol::intern("z");
        parent.borrow_mut().set(name, Value::int(1));
        let child = Scope::child(&parent);
        child.borrow_mut().remove(name);
        assert!(parent.borrow().get(name).is_some());
    }

    #[test]
    fn test_global_of_walks_to_outermost_ancestor() {
        let root = Scope::root();
        let child = Scope::child(&root);
        let grandchild = Scope::child(&child);
        assert!(Rc::ptr_eq(&Scope::global_of(&grandchild), &root));
        assert!(Rc::ptr_eq(&Scope::global_of(&root), &root));
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let parent = Scope::root();
        let name = Symbol::intern("x");
        parent.borrow_mut().set(name, Value::int(1));
        let child = Scope::child(&parent);
        child.borrow_mut().set(name, Value::int(2));
        match child.borrow().get(name) {
            Some(Value::Number(n)) => assert_eq!(n.as_f64(), 2.0),
            _ => panic!("expected shadowed binding"),
        }
        match parent.borrow().get(name) {
            Some(Value::Number(n)) => assert_eq!(n.as_f64(), 1.0),
            _ => panic!("expected original binding"),
        }
    }
}
