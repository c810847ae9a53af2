//! Tests for the math functions

use crate::api::{Engine, ErrorCode, ParserError};
use crate::values::Value;

fn eval(formula: &str) -> Result<Value, ParserError> {
    let mut engine = Engine::default();
    engine.set_formula(formula);
    engine.calc()
}

fn eval_float(formula: &str) -> f64 {
    eval(formula)
        .unwrap_or_else(|e| panic!("{formula}: {e}"))
        .as_float()
        .unwrap()
}

#[test]
fn test_constants() {
    assert_eq!(eval_float("_pi"), core::f64::consts::PI);
    assert_eq!(eval_float("_e"), core::f64::consts::E);
}

#[test]
fn test_trigonometry() {
    assert_eq!(eval_float("sin(0)"), 0.0);
    assert_eq!(eval_float("cos(0)"), 1.0);
    assert!((eval_float("tan(_pi/4)") - 1.0).abs() < 1e-12);
    assert!((eval_float("asin(1)") - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert_eq!(eval_float("atan(0)"), 0.0);
    assert_eq!(eval_float("tanh(0)"), 0.0);
}

#[test]
fn test_logarithms() {
    assert_eq!(eval_float("log2(8)"), 3.0);
    assert!((eval_float("log10(1000)") - 3.0).abs() < 1e-12);
    assert_eq!(eval_float("ln(1)"), 0.0);
    assert!((eval_float("log(_e)") - 1.0).abs() < 1e-12);
    assert_eq!(eval_float("exp(0)"), 1.0);
}

#[test]
fn test_rounding_and_sign() {
    assert_eq!(eval_float("rint(2.5)"), 3.0);
    assert_eq!(eval_float("rint(-2.5)"), -2.0);
    assert_eq!(eval_float("sign(-3)"), -1.0);
    assert_eq!(eval_float("sign(0)"), 0.0);
    assert_eq!(eval_float("abs(-4)"), 4.0);
}

#[test]
fn test_variadic_aggregates() {
    assert_eq!(eval_float("sum(1,2,3)"), 6.0);
    assert_eq!(eval_float("sum(7)"), 7.0);
    assert_eq!(eval_float("avg(1,2,3,4)"), 2.5);
    assert_eq!(eval_float("min(3,-1,2)"), -1.0);
    assert_eq!(eval_float("max(3,-1,2)"), 3.0);
}

#[test]
fn test_domain_errors() {
    for formula in ["sqrt(-1)", "log(0)", "ln(-2)", "asin(2)", "acosh(0)"] {
        let err = eval(formula).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DomainError, "{formula}");
    }
    assert_eq!(eval("sqrt(-1)").unwrap_err().token(), "sqrt");
}

#[test]
fn test_string_argument_is_a_type_mismatch() {
    let err = eval("sin(\"x\")").unwrap_err();
    assert_eq!(err.code(), ErrorCode::TypeMismatch);
    assert_eq!(err.token(), "sin");
}

#[test]
fn test_unary_minus() {
    assert_eq!(eval_float("-3"), -3.0);
    assert_eq!(eval_float("-(-3)"), 3.0);
    assert_eq!(eval_float("2*-3"), -6.0);
    // Sign binds tighter than any binary operator.
    assert_eq!(eval_float("-2^2"), 4.0);
}
