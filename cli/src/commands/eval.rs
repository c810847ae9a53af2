//! The `eval` command - evaluate a formula.

use std::process::ExitCode;
use std::time::Instant;

use xpr::Engine;

use crate::cli::EvalArgs;
use crate::common::engine::{bind_var, build_engine, format_value, parse_value};
use crate::common::{CliResult, error};

/// Run the eval command.
pub fn run(args: EvalArgs, no_color: bool) -> ExitCode {
    match eval(&args) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error::render(&e, no_color);
            ExitCode::FAILURE
        }
    }
}

/// Evaluate according to `args`, returning the lines to print.
fn eval(args: &EvalArgs) -> CliResult<Vec<String>> {
    let mut engine = build_engine(args.engine);
    for (name, value) in &args.vars {
        bind_var(&mut engine, name, parse_value(value))?;
    }
    engine.set_formula(args.formula.as_str());

    if args.used_vars {
        return used_vars(&mut engine);
    }

    let start = Instant::now();
    let mut result = engine.calc()?;
    for _ in 1..args.repeat {
        result = engine.calc()?;
    }
    if args.repeat > 1 {
        let elapsed = start.elapsed();
        eprintln!(
            "{} evaluations in {elapsed:?} ({:?} each)",
            args.repeat,
            elapsed / args.repeat
        );
    }

    let mut lines = Vec::new();
    if args.dump_bytecode {
        match engine.bytecode() {
            Some(code) => lines.extend(code.to_string().lines().map(str::to_string)),
            None if engine.is_compiled() => lines.push("; constant".to_string()),
            None => lines.push("; not compiled".to_string()),
        }
    }
    lines.push(format_value(&result));
    Ok(lines)
}

fn used_vars(engine: &mut Engine) -> CliResult<Vec<String>> {
    let used = engine.used_variables()?;
    Ok(used
        .into_iter()
        .map(|(name, var)| match var {
            Some(var) => format!("{name} = {}", format_value(&var.get())),
            None => format!("{name} (undefined)"),
        })
        .collect())
}
