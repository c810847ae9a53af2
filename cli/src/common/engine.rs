//! Shared engine setup with stdlib.

use xpr::{Engine, EngineOptions, ParserError, Value, Variable};

use crate::cli::EngineArgs;

/// Build an engine with the standard library loaded and the options the
/// command line selected.
pub fn build_engine(args: EngineArgs) -> Engine {
    Engine::with_stdlib(EngineOptions {
        optimizer: !args.no_optimizer,
        bytecode: !args.no_bytecode,
    })
}

/// Numbers become floats, anything else a string. Surrounding double
/// quotes are stripped.
pub fn parse_value(text: &str) -> Value {
    let text = text.trim();
    if let Ok(x) = text.parse::<f64>() {
        return Value::float(x);
    }
    let unquoted = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    Value::str(unquoted)
}

/// Assign `value` to the variable `name`, defining it on first use.
///
/// Existing variables are updated in place so a compiled program keeps
/// seeing them without recompiling.
pub fn bind_var(engine: &mut Engine, name: &str, value: Value) -> Result<(), ParserError> {
    match engine.variables().get(name) {
        Some(var) => {
            var.set(value);
            Ok(())
        }
        None => engine.define_var(name, Variable::new(value)),
    }
}

/// Strings are printed quoted so they can be told apart from numbers.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}
