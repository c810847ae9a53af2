use super::MAX_SLOTS;
use crate::api::{ErrorCode, ParserError};
use crate::parser::BinaryOp;
use crate::values::{Callable, Value, Variable};
use crate::vm::{Code, Instruction};

/// Emits slot-addressed bytecode while the parser reduces the formula.
///
/// The builder tracks the depth of the operand stack the program will use at
/// runtime. Slot 1 is the bottom of that stack and receives the result.
#[derive(Debug, Default)]
pub struct BytecodeBuilder {
    instructions: Vec<Instruction>,
    variables: Vec<Variable>,
    functions: Vec<Callable>,
    stack_pos: usize,
}

impl BytecodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Current operand stack depth.
    pub fn stack_pos(&self) -> usize {
        self.stack_pos
    }

    pub fn add_val(&mut self, value: Value) {
        self.stack_pos += 1;
        self.instructions.push(Instruction::Val {
            slot: self.stack_pos,
            value,
        });
    }

    pub fn add_var(&mut self, var: &Variable) {
        self.stack_pos += 1;
        let var = self.intern_variable(var);
        self.instructions.push(Instruction::Var {
            slot: self.stack_pos,
            var,
        });
    }

    pub fn add_bin_op(&mut self, op: BinaryOp) {
        debug_assert!(self.stack_pos >= 2, "binary operator needs two operands");
        self.stack_pos -= 1;
        self.instructions.push(Instruction::BinOp {
            slot: self.stack_pos,
            op,
        });
    }

    /// Call with `argc` arguments; a negative count marks a variadic call
    /// with `-argc` arguments.
    pub fn add_fun(&mut self, callable: &Callable, argc: i32) {
        let n = argc.unsigned_abs() as usize;
        debug_assert!(n >= 1 && self.stack_pos >= n, "call needs {n} operands");
        self.stack_pos = self.stack_pos + 1 - n;
        let func = self.intern_function(callable);
        self.instructions.push(Instruction::Call {
            slot: self.stack_pos,
            func,
            argc,
        });
    }

    pub fn add_postfix_op(&mut self, callable: &Callable) {
        let func = self.intern_function(callable);
        self.instructions.push(Instruction::PostfixOp {
            slot: self.stack_pos,
            func,
        });
    }

    pub fn add_infix_op(&mut self, callable: &Callable) {
        let func = self.intern_function(callable);
        self.instructions.push(Instruction::InfixOp {
            slot: self.stack_pos,
            func,
        });
    }

    /// Replace the last `operands` instructions, which must all be literals,
    /// with the literal `value`.
    ///
    /// # Panics
    ///
    /// Panics if one of the replaced instructions is not a literal.
    pub fn fold(&mut self, operands: usize, value: Value) {
        for _ in 0..operands {
            match self.instructions.pop() {
                Some(Instruction::Val { .. }) => {}
                other => panic!("cannot fold non-constant instruction {other:?}"),
            }
        }
        self.stack_pos -= operands;
        tracing::trace!(operands, %value, "Folded constant");
        self.add_val(value);
    }

    /// Terminate the program.
    ///
    /// Fails with [`ErrorCode::FormulaTooComplex`] when the program would
    /// need more than [`MAX_SLOTS`] evaluation slots.
    pub fn finish(mut self) -> Result<Code, ParserError> {
        let highest = self
            .instructions
            .iter()
            .map(Instruction::highest_slot)
            .max()
            .unwrap_or(0);
        if highest > MAX_SLOTS {
            tracing::warn!(highest, "Formula exceeds the slot limit");
            return Err(ParserError::new(ErrorCode::FormulaTooComplex));
        }
        self.instructions.push(Instruction::End);

        Ok(Code {
            instructions: self.instructions,
            variables: self.variables,
            functions: self.functions,
            num_slots: highest + 1,
        })
    }

    fn intern_variable(&mut self, var: &Variable) -> usize {
        if let Some(index) = self.variables.iter().position(|v| v.ptr_eq(var)) {
            return index;
        }
        self.variables.push(var.clone());
        self.variables.len() - 1
    }

    fn intern_function(&mut self, callable: &Callable) -> usize {
        if let Some(index) = self.functions.iter().position(|f| f.ptr_eq(callable)) {
            return index;
        }
        self.functions.push(callable.clone());
        self.functions.len() - 1
    }
}
