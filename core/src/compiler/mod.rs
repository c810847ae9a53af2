pub mod bytecode;

pub use bytecode::BytecodeBuilder;

/// Highest slot index a program may use. Slot 0 is never written.
pub const MAX_SLOTS: usize = 99;
