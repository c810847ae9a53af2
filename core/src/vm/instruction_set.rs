use core::fmt;

use crate::parser::BinaryOp;
use crate::values::Value;

/// One step of a compiled formula.
///
/// Every instruction names the slot it writes. Operands are read from that
/// slot and the ones directly above it: a binary operator at slot `s` reads
/// `s` and `s + 1`, a call at slot `s` reads `argc` consecutive slots
/// starting at `s`.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Load the current value of `variables[var]`.
    Var { slot: usize, var: usize },
    Val { slot: usize, value: Value },
    BinOp { slot: usize, op: BinaryOp },
    /// Call `functions[func]`. Negative `argc` marks a variadic call.
    Call { slot: usize, func: usize, argc: i32 },
    PostfixOp { slot: usize, func: usize },
    InfixOp { slot: usize, func: usize },
    End,
}

impl Instruction {
    /// Highest slot the instruction touches.
    pub fn highest_slot(&self) -> usize {
        match self {
            Instruction::Var { slot, .. }
            | Instruction::Val { slot, .. }
            | Instruction::PostfixOp { slot, .. }
            | Instruction::InfixOp { slot, .. } => *slot,
            Instruction::BinOp { slot, .. } => slot + 1,
            Instruction::Call { slot, argc, .. } => slot + argc.unsigned_abs() as usize - 1,
            Instruction::End => 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Var { slot, var } => write!(f, "[{slot}] VAR     #{var}"),
            Instruction::Val { slot, value: Value::Str(s) } => {
                write!(f, "[{slot}] VAL     {s:?}")
            }
            Instruction::Val { slot, value } => write!(f, "[{slot}] VAL     {value}"),
            Instruction::BinOp { slot, op } => write!(f, "[{slot}] BINOP   {op}"),
            Instruction::Call { slot, func, argc } => {
                write!(f, "[{slot}] CALL    #{func} argc={argc}")
            }
            Instruction::PostfixOp { slot, func } => write!(f, "[{slot}] POSTFIX #{func}"),
            Instruction::InfixOp { slot, func } => write!(f, "[{slot}] INFIX   #{func}"),
            Instruction::End => f.write_str("END"),
        }
    }
}
