use core::fmt;

use super::instruction_set::Instruction;
use crate::values::{Callable, Value, Variable};

/// A compiled formula.
///
/// The program holds its own handles to the variables and callbacks it uses,
/// so it stays valid until the engine recompiles, whatever happens to the
/// symbol tables in between.
#[derive(Debug, Clone, Default)]
pub struct Code {
    pub instructions: Vec<Instruction>,
    pub variables: Vec<Variable>,
    pub functions: Vec<Callable>,
    /// Slots the VM needs, slot 0 included.
    pub num_slots: usize,
}

impl Code {
    /// The value of a program that is a single literal.
    pub fn as_constant(&self) -> Option<&Value> {
        match self.instructions.as_slice() {
            [Instruction::Val { value, .. }, Instruction::End] => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ip, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{ip:>4}  {instruction}")?;
        }
        Ok(())
    }
}
