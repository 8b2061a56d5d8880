//! The per-Context scope map. Plain reference-counted interior mutability:
//! a Birdiescript scope is just a name→value table, and a Block's captured
//! scope is simply a cloned `Rc` pointing at the same table — a Block owns
//! a captured scope map, and the Context that invokes it borrows that map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Scope(Rc<RefCell<HashMap<String, Value>>>);

impl Scope {
    pub fn new_root() -> Self {
        Scope(Rc::new(RefCell::new(HashMap::new())))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    pub fn set(&self, name: &str, value: Value) {
        self.0.borrow_mut().insert(name.to_string(), value);
    }

    pub fn remove(&self, name: &str) {
        self.0.borrow_mut().remove(name);
    }

    /// Whether this scope and `other` are the same underlying table (used
    /// to detect a non-scoped block's redirected writes).
    pub fn same_table(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
