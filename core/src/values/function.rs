//! Callable values: user functions and unary operators.
//!
//! A [`Callable`] is a closed set of shapes, one per supported arity plus a
//! variadic form. The VM and the parser dispatch on the variant, so a
//! callback is always invoked with exactly the argument count it declared.

use core::fmt;
use std::sync::Arc;

use super::dynamic::Value;
use crate::api::ParserError;

pub type Fn1 = dyn Fn(&Value) -> Result<Value, ParserError> + Send + Sync;
pub type Fn2 = dyn Fn(&Value, &Value) -> Result<Value, ParserError> + Send + Sync;
pub type Fn3 = dyn Fn(&Value, &Value, &Value) -> Result<Value, ParserError> + Send + Sync;
pub type Fn4 =
    dyn Fn(&Value, &Value, &Value, &Value) -> Result<Value, ParserError> + Send + Sync;
pub type Fn5 = dyn Fn(&Value, &Value, &Value, &Value, &Value) -> Result<Value, ParserError>
    + Send
    + Sync;
pub type FnN = dyn Fn(&[Value]) -> Result<Value, ParserError> + Send + Sync;

/// A registered callback.
///
/// # Example
///
/// ```
/// use xpr_core::{Callable, Value};
///
/// let hypot = Callable::fixed2(|a, b| Ok(Value::float(a.to_float()?.hypot(b.to_float()?))));
/// assert_eq!(hypot.arity(), 2);
/// assert_eq!(
///     hypot.call(&[Value::float(3.0), Value::float(4.0)]).unwrap(),
///     Value::float(5.0)
/// );
/// ```
#[derive(Clone)]
pub enum Callable {
    Fixed1(Arc<Fn1>),
    Fixed2(Arc<Fn2>),
    Fixed3(Arc<Fn3>),
    Fixed4(Arc<Fn4>),
    Fixed5(Arc<Fn5>),
    /// Accepts one or more arguments.
    Variadic(Arc<FnN>),
}

impl Callable {
    pub fn fixed1(
        f: impl Fn(&Value) -> Result<Value, ParserError> + Send + Sync + 'static,
    ) -> Self {
        Callable::Fixed1(Arc::new(f))
    }

    pub fn fixed2(
        f: impl Fn(&Value, &Value) -> Result<Value, ParserError> + Send + Sync + 'static,
    ) -> Self {
        Callable::Fixed2(Arc::new(f))
    }

    pub fn fixed3(
        f: impl Fn(&Value, &Value, &Value) -> Result<Value, ParserError> + Send + Sync + 'static,
    ) -> Self {
        Callable::Fixed3(Arc::new(f))
    }

    pub fn fixed4(
        f: impl Fn(&Value, &Value, &Value, &Value) -> Result<Value, ParserError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Callable::Fixed4(Arc::new(f))
    }

    pub fn fixed5(
        f: impl Fn(&Value, &Value, &Value, &Value, &Value) -> Result<Value, ParserError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Callable::Fixed5(Arc::new(f))
    }

    pub fn variadic(
        f: impl Fn(&[Value]) -> Result<Value, ParserError> + Send + Sync + 'static,
    ) -> Self {
        Callable::Variadic(Arc::new(f))
    }

    /// Declared argument count, `-1` for variadic callables.
    pub fn arity(&self) -> i32 {
        match self {
            Callable::Fixed1(_) => 1,
            Callable::Fixed2(_) => 2,
            Callable::Fixed3(_) => 3,
            Callable::Fixed4(_) => 4,
            Callable::Fixed5(_) => 5,
            Callable::Variadic(_) => -1,
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Callable::Variadic(_))
    }

    /// Invoke the callback.
    ///
    /// # Panics
    ///
    /// Panics if `args` is shorter than a fixed arity. The parser checks the
    /// argument count before any call is made or emitted.
    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value, ParserError> {
        debug_assert!(
            self.is_variadic() || args.len() == self.arity() as usize,
            "called with {} arguments, declared {}",
            args.len(),
            self.arity()
        );
        match self {
            Callable::Fixed1(f) => f(&args[0]),
            Callable::Fixed2(f) => f(&args[0], &args[1]),
            Callable::Fixed3(f) => f(&args[0], &args[1], &args[2]),
            Callable::Fixed4(f) => f(&args[0], &args[1], &args[2], &args[3]),
            Callable::Fixed5(f) => f(&args[0], &args[1], &args[2], &args[3], &args[4]),
            Callable::Variadic(f) => f(args),
        }
    }

    /// Whether both callables wrap the same closure.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Fixed1(a), Callable::Fixed1(b)) => Arc::ptr_eq(a, b),
            (Callable::Fixed2(a), Callable::Fixed2(b)) => Arc::ptr_eq(a, b),
            (Callable::Fixed3(a), Callable::Fixed3(b)) => Arc::ptr_eq(a, b),
            (Callable::Fixed4(a), Callable::Fixed4(b)) => Arc::ptr_eq(a, b),
            (Callable::Fixed5(a), Callable::Fixed5(b)) => Arc::ptr_eq(a, b),
            (Callable::Variadic(a), Callable::Variadic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity() {
            -1 => f.write_str("Callable(variadic)"),
            n => write!(f, "Callable({n})"),
        }
    }
}

/// A function or operator entry in the symbol table.
#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub callable: Callable,
    /// `false` marks the result as volatile: calls are never folded into
    /// constants and run on every evaluation.
    pub optimizable: bool,
}

impl FunctionDef {
    pub fn new(callable: Callable, optimizable: bool) -> Self {
        Self {
            callable,
            optimizable,
        }
    }
}
