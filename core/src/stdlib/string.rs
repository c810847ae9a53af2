//! String functions.
//!
//! - strlen counts codepoints, not bytes
//! - str formats a number the way `Display` does
//! - num parses a string, failing with a domain error on malformed input

use crate::api::{Environment, ErrorCode, ParserError};
use crate::values::{Callable, FunctionDef, Value};

fn str_arg<'v>(value: &'v Value, name: &'static str) -> Result<&'v str, ParserError> {
    value
        .as_str()
        .ok_or_else(|| ParserError::new(ErrorCode::TypeMismatch).with_token(name))
}

pub fn register_string_functions(env: &mut Environment) -> Result<(), ParserError> {
    let strlen = Callable::fixed1(|s| Ok(Value::float(str_arg(s, "strlen")?.chars().count() as f64)));
    env.define_fun("strlen", FunctionDef::new(strlen, true))?;

    let str = Callable::fixed1(|x| match x {
        Value::Float(_) => Ok(Value::from(x.to_string())),
        Value::Str(_) => Ok(x.clone()),
    });
    env.define_fun("str", FunctionDef::new(str, true))?;

    let num = Callable::fixed1(|s| {
        str_arg(s, "num")?
            .trim()
            .parse::<f64>()
            .map(Value::float)
            .map_err(|_| ParserError::new(ErrorCode::DomainError).with_token("num"))
    });
    env.define_fun("num", FunctionDef::new(num, true))?;

    Ok(())
}

#[cfg(test)]
#[path = "string_test.rs"]
mod string_test;
