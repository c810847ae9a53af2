pub mod dynamic;
pub mod function;
pub mod variable;

pub use dynamic::Value;
pub use function::{Callable, FunctionDef};
pub use variable::Variable;
