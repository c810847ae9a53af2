//! Shunting-yard parser.
//!
//! Parsing, evaluation and compilation happen in one pass: every operator is
//! applied to its operands the moment it is reduced, which yields the value of
//! the formula, and at the same time the bytecode for later evaluations is
//! emitted. Reductions whose operands are all constant are folded into a
//! single literal when the optimizer is on.

use smallvec::SmallVec;

use super::lexer::{ReadMode, TokenReader, UsedVariables};
use super::token::{BinaryOp, Token, TokenKind};
use crate::api::{Environment, ErrorCode, ParserError};
use crate::compiler::BytecodeBuilder;
use crate::values::{FunctionDef, Value, Variable};
use crate::vm::Code;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fold constant subexpressions while emitting bytecode.
    pub optimize: bool,
    pub mode: ReadMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            mode: ReadMode::Strict,
        }
    }
}

#[derive(Debug)]
pub struct ParseOutput {
    /// Result of the parse-time evaluation.
    pub value: Value,
    pub code: Code,
    /// Every name read as a variable.
    pub used: UsedVariables,
    /// Variables handed out by the variable factory.
    pub created: Vec<(String, Variable)>,
}

/// Parse `formula`, evaluating it and compiling it at the same time.
///
/// Errors carry the formula text.
pub fn parse(
    formula: &str,
    env: &Environment,
    options: ParseOptions,
) -> Result<ParseOutput, ParserError> {
    Parser::new(formula, env, options)
        .run()
        .map_err(|err| err.with_formula(formula))
}

struct Operand {
    value: Value,
    /// Depends on a variable or a non-optimizable callback.
    volatile: bool,
}

enum Pending<'a> {
    OpenParen,
    Binary { op: BinaryOp, pos: usize, text: &'a str },
    Function { def: FunctionDef, pos: usize, name: &'a str },
    Infix { def: FunctionDef, pos: usize, text: &'a str },
}

#[derive(Clone, Copy)]
enum Unary {
    Infix,
    Postfix,
}

struct Parser<'a> {
    reader: TokenReader<'a>,
    builder: BytecodeBuilder,
    operands: Vec<Operand>,
    operators: Vec<Pending<'a>>,
    /// Argument count of every open bracket, innermost last.
    arg_counts: Vec<usize>,
    optimize: bool,
    collecting: bool,
}

impl<'a> Parser<'a> {
    fn new(formula: &'a str, env: &'a Environment, options: ParseOptions) -> Self {
        Self {
            reader: TokenReader::new(formula, env, options.mode),
            builder: BytecodeBuilder::new(),
            operands: Vec::new(),
            operators: Vec::new(),
            arg_counts: Vec::new(),
            optimize: options.optimize,
            collecting: options.mode == ReadMode::CollectUndefined,
        }
    }

    fn run(mut self) -> Result<ParseOutput, ParserError> {
        let mut after_open = false;
        loop {
            let token = self.reader.read_next_token()?;
            let is_open = matches!(token.kind, TokenKind::OpenParen);
            let Token { kind, text, pos } = token;

            match kind {
                TokenKind::Val(value) => {
                    self.builder.add_val(value.clone());
                    self.operands.push(Operand {
                        value,
                        volatile: false,
                    });
                    self.apply_infix_ops()?;
                }
                TokenKind::Var(var) => {
                    self.builder.add_var(&var);
                    self.operands.push(Operand {
                        value: var.get(),
                        volatile: true,
                    });
                    self.apply_infix_ops()?;
                }
                TokenKind::OpenParen => {
                    self.arg_counts.push(1);
                    self.operators.push(Pending::OpenParen);
                }
                TokenKind::Comma => {
                    self.reduce_to_bracket()?;
                    if let Some(count) = self.arg_counts.last_mut() {
                        *count += 1;
                    }
                }
                TokenKind::CloseParen => self.close_bracket(after_open, pos, text)?,
                TokenKind::BinOp(op) => {
                    while self
                        .top_binary()
                        .is_some_and(|top| top.priority() >= op.priority())
                    {
                        self.apply_binary()?;
                    }
                    self.operators.push(Pending::Binary { op, pos, text });
                }
                TokenKind::Func(def) => {
                    self.operators.push(Pending::Function {
                        def,
                        pos,
                        name: text,
                    });
                }
                TokenKind::InfixOp(def) => {
                    self.operators.push(Pending::Infix { def, pos, text });
                }
                TokenKind::PostfixOp(def) => {
                    self.apply_unary(&def, Unary::Postfix, pos, text)?;
                }
                TokenKind::End => {
                    self.reduce_to_bracket()?;
                    break;
                }
            }
            after_open = is_open;
        }

        let result = self.pop_operand();
        debug_assert!(self.operands.is_empty(), "dangling operands");
        debug_assert!(self.operators.is_empty(), "dangling operators");

        let code = self.builder.finish()?;
        let (used, created) = self.reader.finish();
        Ok(ParseOutput {
            value: result.value,
            code,
            used,
            created,
        })
    }

    fn top_binary(&self) -> Option<BinaryOp> {
        match self.operators.last() {
            Some(Pending::Binary { op, .. }) => Some(*op),
            _ => None,
        }
    }

    fn pop_operand(&mut self) -> Operand {
        self.operands.pop().expect("operand stack underflow")
    }

    /// Apply a result, or in collection mode swallow the failure.
    fn evaluated(
        &self,
        result: Result<Value, ParserError>,
        pos: usize,
        text: &str,
    ) -> Result<Value, ParserError> {
        match result {
            Ok(value) => Ok(value),
            Err(_) if self.collecting => Ok(Value::ZERO),
            Err(err) => Err(err.locate(pos, text)),
        }
    }

    /// Reduce everything above the innermost open bracket.
    fn reduce_to_bracket(&mut self) -> Result<(), ParserError> {
        loop {
            match self.operators.last() {
                Some(Pending::Binary { .. }) => self.apply_binary()?,
                Some(Pending::Infix { .. }) => self.apply_pending_infix()?,
                Some(Pending::OpenParen) | None => return Ok(()),
                Some(Pending::Function { .. }) => unreachable!("function without argument list"),
            }
        }
    }

    fn close_bracket(&mut self, after_open: bool, pos: usize, text: &str) -> Result<(), ParserError> {
        self.reduce_to_bracket()?;

        let mut argc = self.arg_counts.pop().expect("lexer balances brackets");
        if after_open {
            // `f()`
            argc = 0;
        }
        match self.operators.pop() {
            Some(Pending::OpenParen) => {}
            _ => unreachable!("lexer balances brackets"),
        }

        if matches!(self.operators.last(), Some(Pending::Function { .. })) {
            self.apply_function(argc)?;
        } else if argc > 1 {
            return Err(ParserError::at(ErrorCode::UnexpectedArg, pos, text));
        }
        self.apply_infix_ops()
    }

    fn apply_binary(&mut self) -> Result<(), ParserError> {
        let Some(Pending::Binary { op, pos, text }) = self.operators.pop() else {
            unreachable!("apply_binary without a binary operator on top");
        };
        let rhs = self.pop_operand();
        let lhs = self.pop_operand();
        let value = self.evaluated(lhs.value.binary(op, &rhs.value), pos, text)?;
        let volatile = lhs.volatile || rhs.volatile;

        if self.optimize && !volatile {
            self.builder.fold(2, value.clone());
        } else {
            self.builder.add_bin_op(op);
        }
        self.operands.push(Operand { value, volatile });
        Ok(())
    }

    fn apply_function(&mut self, argc: usize) -> Result<(), ParserError> {
        let Some(Pending::Function { def, pos, name }) = self.operators.pop() else {
            unreachable!("apply_function without a function on top");
        };

        let arity = def.callable.arity();
        if arity >= 0 && argc > arity as usize {
            return Err(ParserError::at(ErrorCode::TooManyParams, pos, name));
        }
        if argc == 0 || (arity >= 0 && argc < arity as usize) {
            return Err(ParserError::at(ErrorCode::TooFewParams, pos, name));
        }

        let operands = self.operands.split_off(self.operands.len() - argc);
        let volatile = !def.optimizable || operands.iter().any(|o| o.volatile);
        let args: SmallVec<[Value; 5]> = operands.into_iter().map(|o| o.value).collect();
        let value = self.evaluated(def.callable.call(&args), pos, name)?;

        if self.optimize && !volatile {
            self.builder.fold(argc, value.clone());
        } else {
            let argc = argc as i32;
            let argc = if def.callable.is_variadic() { -argc } else { argc };
            self.builder.add_fun(&def.callable, argc);
        }
        self.operands.push(Operand { value, volatile });
        Ok(())
    }

    fn apply_pending_infix(&mut self) -> Result<(), ParserError> {
        let Some(Pending::Infix { def, pos, text }) = self.operators.pop() else {
            unreachable!("apply_pending_infix without an infix operator on top");
        };
        self.apply_unary(&def, Unary::Infix, pos, text)
    }

    /// Apply sign operators waiting for the operand that was just completed.
    fn apply_infix_ops(&mut self) -> Result<(), ParserError> {
        while matches!(self.operators.last(), Some(Pending::Infix { .. })) {
            self.apply_pending_infix()?;
        }
        Ok(())
    }

    fn apply_unary(
        &mut self,
        def: &FunctionDef,
        kind: Unary,
        pos: usize,
        text: &str,
    ) -> Result<(), ParserError> {
        let operand = self.pop_operand();
        let value = self.evaluated(
            def.callable.call(core::slice::from_ref(&operand.value)),
            pos,
            text,
        )?;
        let volatile = !def.optimizable || operand.volatile;

        if self.optimize && !volatile {
            self.builder.fold(1, value.clone());
        } else {
            match kind {
                Unary::Infix => self.builder.add_infix_op(&def.callable),
                Unary::Postfix => self.builder.add_postfix_op(&def.callable),
            }
        }
        self.operands.push(Operand { value, volatile });
        Ok(())
    }
}
