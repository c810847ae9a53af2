//! Command-line interface definitions.
//!
//! This module contains only clap struct definitions - no business logic.
//! All command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};

/// xpr - A fast, embeddable math expression engine
#[derive(Parser, Debug)]
#[command(name = "xpr", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a formula
    Eval(EvalArgs),

    /// Start interactive REPL
    Repl(ReplArgs),
}

/// Engine switches shared by all commands.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct EngineArgs {
    /// Do not fold constant sub-expressions
    #[arg(long)]
    pub no_optimizer: bool,

    /// Re-parse the formula on every evaluation instead of running bytecode
    #[arg(long)]
    pub no_bytecode: bool,
}

/// Arguments for the `eval` command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Formula to evaluate
    pub formula: String,

    /// Define a variable, e.g. `--var a=1.5` or `--var name=text`
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
    pub vars: Vec<(String, String)>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// List the variables the formula uses instead of evaluating it
    #[arg(long)]
    pub used_vars: bool,

    /// Evaluate the formula N times and report the elapsed time on stderr
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub repeat: u32,

    /// Print the compiled bytecode before the result
    #[arg(long)]
    pub dump_bytecode: bool,
}

/// Arguments for the `repl` command.
#[derive(Args, Debug)]
pub struct ReplArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

fn parse_binding(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{arg}`")),
    }
}
