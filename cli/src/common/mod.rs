//! Common utilities shared across CLI commands.

pub mod engine;
pub mod error;

pub use error::CliResult;
