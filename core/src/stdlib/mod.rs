//! xpr standard library
//!
//! - math: trigonometric, logarithmic and aggregate functions, `_pi`, `_e`
//!   and the unary minus operator
//! - string: length and number/string conversion
//!
//! Every stdlib function is optimizable: calls with constant arguments are
//! folded at compile time.

use crate::api::{Environment, ParserError};

pub mod math;
pub mod string;

pub use math::register_math_functions;
pub use string::register_string_functions;

/// Register every stdlib function, constant and operator in `env`.
///
/// Fails only if a name conflicts with something already registered.
pub fn register_stdlib(env: &mut Environment) -> Result<(), ParserError> {
    register_math_functions(env)?;
    register_string_functions(env)?;
    Ok(())
}
