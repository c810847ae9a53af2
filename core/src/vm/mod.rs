mod code;
mod instruction_set;
#[allow(clippy::module_inception)]
mod vm;

pub use code::Code;
pub use instruction_set::Instruction;
pub use vm::VM;
