//! Core of the xpr expression engine.
//!
//! The pipeline is: [`parser::TokenReader`] (lexer driven by
//! [`parser::SyntaxFlags`]) → [`parser::parse`] (shunting-yard with inline
//! constant folding) → [`compiler::BytecodeBuilder`] → [`vm::Code`] executed by
//! [`vm::VM`]. [`api::Engine`] ties it together and caches the compiled program.

pub mod api;
pub mod compiler;
pub mod parser;
pub mod stdlib;
pub mod values;
pub mod vm;

pub use api::{Engine, EngineOptions, ErrorCode, ParserError};
pub use values::{Callable, Value, Variable};
