//! Formula front end: tokenizer, grammar flags and the parser that
//! evaluates and compiles in a single pass.

pub mod flags;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;

pub use flags::{SyntaxFlags, TokenClass};
pub use lexer::{ReadMode, TokenReader, UsedVariables};
pub use parser::{ParseOptions, ParseOutput, parse};
pub use token::{BinaryOp, Token, TokenKind};
