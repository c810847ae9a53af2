//! Shared variable bindings.

use std::sync::{Arc, PoisonError, RwLock};

use super::dynamic::Value;

/// A handle to caller-owned variable storage.
///
/// The engine keeps a clone of the handle in its symbol table and in every
/// compiled program that reads the variable. Updating the value through any
/// clone is visible to the next `calc()` without recompiling.
///
/// ```
/// use xpr_core::{Engine, Variable};
///
/// let mut engine = Engine::default();
/// let a = Variable::new(1.0);
/// engine.define_var("a", a.clone()).unwrap();
/// engine.set_formula("a * 2");
/// assert_eq!(engine.calc().unwrap().as_float(), Some(2.0));
///
/// a.set(21.0);
/// assert_eq!(engine.calc().unwrap().as_float(), Some(42.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Variable(Arc<RwLock<Value>>);

impl Variable {
    pub fn new(value: impl Into<Value>) -> Self {
        Variable(Arc::new(RwLock::new(value.into())))
    }

    #[inline]
    pub fn get(&self) -> Value {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, value: impl Into<Value>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = value.into();
    }

    /// Whether both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
