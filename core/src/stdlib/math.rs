//! Math functions and constants.
//!
//! Constants: _pi, _e
//! Functions: sin, cos, tan, asin, acos, atan, sinh, cosh, tanh, asinh,
//!            acosh, atanh, log2, log10, log, ln, exp, sqrt, sign, rint, abs
//! Variadic:  sum, avg, min, max
//! Infix:     - (unary minus)

use crate::api::{Environment, ErrorCode, ParserError};
use crate::values::{Callable, FunctionDef, Value};

fn float_arg(value: &Value, name: &'static str) -> Result<f64, ParserError> {
    value
        .as_float()
        .ok_or_else(|| ParserError::new(ErrorCode::TypeMismatch).with_token(name))
}

/// Register a pure `f64 -> f64` function.
fn unary(env: &mut Environment, name: &'static str, f: fn(f64) -> f64) -> Result<(), ParserError> {
    let callable = Callable::fixed1(move |x| Ok(Value::float(f(float_arg(x, name)?))));
    env.define_fun(name, FunctionDef::new(callable, true))
}

/// Like [`unary`], failing with [`ErrorCode::DomainError`] outside `domain`.
fn partial(
    env: &mut Environment,
    name: &'static str,
    f: fn(f64) -> f64,
    domain: fn(f64) -> bool,
) -> Result<(), ParserError> {
    let callable = Callable::fixed1(move |x| {
        let x = float_arg(x, name)?;
        if !domain(x) {
            return Err(ParserError::new(ErrorCode::DomainError).with_token(name));
        }
        Ok(Value::float(f(x)))
    });
    env.define_fun(name, FunctionDef::new(callable, true))
}

fn variadic(
    env: &mut Environment,
    name: &'static str,
    f: fn(&[f64]) -> f64,
) -> Result<(), ParserError> {
    let callable = Callable::variadic(move |args| {
        let xs = args
            .iter()
            .map(|arg| float_arg(arg, name))
            .collect::<Result<smallvec::SmallVec<[f64; 8]>, _>>()?;
        Ok(Value::float(f(&xs)))
    });
    env.define_fun(name, FunctionDef::new(callable, true))
}

fn positive(x: f64) -> bool {
    x > 0.0
}

fn unit_interval(x: f64) -> bool {
    (-1.0..=1.0).contains(&x)
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Round half up.
fn rint(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub fn register_math_functions(env: &mut Environment) -> Result<(), ParserError> {
    // ========================================================================
    // Constants
    // ========================================================================

    env.define_const("_pi", Value::float(core::f64::consts::PI))?;
    env.define_const("_e", Value::float(core::f64::consts::E))?;

    // ========================================================================
    // Trigonometric
    // ========================================================================

    unary(env, "sin", f64::sin)?;
    unary(env, "cos", f64::cos)?;
    unary(env, "tan", f64::tan)?;
    partial(env, "asin", f64::asin, unit_interval)?;
    partial(env, "acos", f64::acos, unit_interval)?;
    unary(env, "atan", f64::atan)?;
    unary(env, "sinh", f64::sinh)?;
    unary(env, "cosh", f64::cosh)?;
    unary(env, "tanh", f64::tanh)?;
    unary(env, "asinh", f64::asinh)?;
    partial(env, "acosh", f64::acosh, |x| x >= 1.0)?;
    partial(env, "atanh", f64::atanh, |x| x > -1.0 && x < 1.0)?;

    // ========================================================================
    // Exponential and logarithmic
    // ========================================================================

    partial(env, "log2", f64::log2, positive)?;
    partial(env, "log10", f64::log10, positive)?;
    partial(env, "log", f64::ln, positive)?;
    partial(env, "ln", f64::ln, positive)?;
    unary(env, "exp", f64::exp)?;
    partial(env, "sqrt", f64::sqrt, |x| x >= 0.0)?;

    // ========================================================================
    // Misc
    // ========================================================================

    unary(env, "sign", sign)?;
    unary(env, "rint", rint)?;
    unary(env, "abs", f64::abs)?;

    variadic(env, "sum", |xs| xs.iter().sum())?;
    variadic(env, "avg", |xs| xs.iter().sum::<f64>() / xs.len() as f64)?;
    variadic(env, "min", |xs| xs.iter().copied().fold(f64::INFINITY, f64::min))?;
    variadic(env, "max", |xs| xs.iter().copied().fold(f64::NEG_INFINITY, f64::max))?;

    // ========================================================================
    // Operators
    // ========================================================================

    let negate = Callable::fixed1(|x| Ok(Value::float(-float_arg(x, "-")?)));
    env.define_infix_op("-", FunctionDef::new(negate, true))?;

    Ok(())
}

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;
