use super::instruction_set::Instruction;
use crate::api::ParserError;
use crate::values::Value;
use crate::vm::Code;

/// Executes a compiled formula against a slot array.
pub struct VM<'a, 'b> {
    code: &'a Code,
    slots: &'b mut [Value],
}

impl<'a, 'b> VM<'a, 'b> {
    /// # Panics
    ///
    /// Panics if `slots` is shorter than the program needs.
    pub fn new(code: &'a Code, slots: &'b mut [Value]) -> Self {
        assert!(
            slots.len() >= code.num_slots,
            "VM needs {} slots, got {}",
            code.num_slots,
            slots.len()
        );
        VM { code, slots }
    }

    /// Run `code`, growing `slots` as needed.
    pub fn execute(code: &'a Code, slots: &'b mut Vec<Value>) -> Result<Value, ParserError> {
        if slots.len() < code.num_slots {
            slots.resize(code.num_slots, Value::ZERO);
        }
        VM::new(code, slots).run()
    }

    /// The result is left in slot 1.
    pub fn run(&mut self) -> Result<Value, ParserError> {
        let code = self.code;
        for instruction in &code.instructions {
            match instruction {
                Instruction::Var { slot, var } => {
                    self.slots[*slot] = code.variables[*var].get();
                }
                Instruction::Val { slot, value } => {
                    self.slots[*slot] = value.clone();
                }
                Instruction::BinOp { slot, op } => {
                    let result = self.slots[*slot].binary(*op, &self.slots[*slot + 1])?;
                    self.slots[*slot] = result;
                }
                Instruction::Call { slot, func, argc } => {
                    let args = &self.slots[*slot..*slot + argc.unsigned_abs() as usize];
                    let result = code.functions[*func].call(args)?;
                    self.slots[*slot] = result;
                }
                Instruction::PostfixOp { slot, func } | Instruction::InfixOp { slot, func } => {
                    let arg = core::slice::from_ref(&self.slots[*slot]);
                    let result = code.functions[*func].call(arg)?;
                    self.slots[*slot] = result;
                }
                Instruction::End => break,
            }
        }
        Ok(self.slots[1].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::BinaryOp;
    use crate::values::{Callable, Variable};

    #[test]
    fn test_run_hand_written_program() {
        // (a + 2) * twice(a)
        let a = Variable::new(3.0);
        let twice = Callable::fixed1(|v| Ok(Value::float(v.to_float()? * 2.0)));
        let code = Code {
            instructions: vec![
                Instruction::Var { slot: 1, var: 0 },
                Instruction::Val {
                    slot: 2,
                    value: Value::float(2.0),
                },
                Instruction::BinOp {
                    slot: 1,
                    op: BinaryOp::Add,
                },
                Instruction::Var { slot: 2, var: 0 },
                Instruction::Call {
                    slot: 2,
                    func: 0,
                    argc: 1,
                },
                Instruction::BinOp {
                    slot: 1,
                    op: BinaryOp::Mul,
                },
                Instruction::End,
            ],
            variables: vec![a.clone()],
            functions: vec![twice],
            num_slots: 3,
        };

        let mut slots = Vec::new();
        assert_eq!(VM::execute(&code, &mut slots).unwrap(), Value::float(30.0));

        a.set(1.0);
        assert_eq!(VM::execute(&code, &mut slots).unwrap(), Value::float(6.0));
    }

    #[test]
    fn test_variadic_call_reads_all_arguments() {
        let sum = Callable::variadic(|args| {
            let mut total = 0.0;
            for arg in args {
                total += arg.to_float()?;
            }
            Ok(Value::float(total))
        });
        let code = Code {
            instructions: vec![
                Instruction::Val {
                    slot: 1,
                    value: Value::float(1.0),
                },
                Instruction::Val {
                    slot: 2,
                    value: Value::float(2.0),
                },
                Instruction::Val {
                    slot: 3,
                    value: Value::float(3.0),
                },
                Instruction::Call {
                    slot: 1,
                    func: 0,
                    argc: -3,
                },
                Instruction::End,
            ],
            variables: vec![],
            functions: vec![sum],
            num_slots: 4,
        };
        let mut slots = Vec::new();
        assert_eq!(VM::execute(&code, &mut slots).unwrap(), Value::float(6.0));
    }

    #[test]
    fn test_runtime_errors_propagate() {
        let code = Code {
            instructions: vec![
                Instruction::Val {
                    slot: 1,
                    value: Value::float(1.0),
                },
                Instruction::Val {
                    slot: 2,
                    value: Value::float(0.0),
                },
                Instruction::BinOp {
                    slot: 1,
                    op: BinaryOp::Div,
                },
                Instruction::End,
            ],
            variables: vec![],
            functions: vec![],
            num_slots: 3,
        };
        let err = VM::execute(&code, &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), crate::api::ErrorCode::DivByZero);
    }
}
