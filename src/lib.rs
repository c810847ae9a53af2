//! xpr - a fast, embeddable math expression engine
//!
//! # Quick Start
//!
//! ```
//! use xpr::{Engine, Value, Variable};
//!
//! let mut engine = Engine::default();
//! let a = Variable::new(1.0);
//! engine.define_var("a", a.clone()).unwrap();
//! engine.set_formula("2*a + sum(1, 2, 3)");
//! assert_eq!(engine.calc().unwrap(), Value::float(8.0));
//!
//! // Later evaluations run the compiled bytecode.
//! a.set(0.5);
//! assert_eq!(engine.calc().unwrap(), Value::float(7.0));
//! ```
//!
//! # Native functions
//!
//! ```
//! use xpr::{Callable, Engine, Value};
//!
//! let mut engine = Engine::default();
//! let hypot = Callable::fixed2(|x, y| Ok(Value::float(x.to_float()?.hypot(y.to_float()?))));
//! engine.define_fun("hypot", hypot, true).unwrap();
//! engine.set_formula("hypot(3, 4)");
//! assert_eq!(engine.calc().unwrap(), Value::float(5.0));
//! ```

// Error rendering utilities
pub mod error_renderer;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

pub use xpr_core::api::{Engine, EngineOptions, Environment, ErrorCode, ParserError, VarFactory};
pub use xpr_core::values::{self, Callable, FunctionDef, Value, Variable};
