//! Formula tokenizer.
//!
//! The reader hands out one token at a time. Whether a token is legal at the
//! current position is decided here, from the [`SyntaxFlags`] left behind by
//! the previous token, so the parser never sees a misplaced token.

use std::collections::BTreeMap;

use super::flags::{SyntaxFlags, TokenClass};
use super::token::{BinaryOp, Token, TokenKind};
use crate::api::{Environment, ErrorCode, ParserError};
use crate::api::environment::{is_infix_char, is_name_char, is_operator_char};
use crate::values::{FunctionDef, Value, Variable};

/// How names that resolve to nothing are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Unknown names go to the variable factory, if any, and are otherwise
    /// an [`ErrorCode::UnassignableToken`].
    #[default]
    Strict,
    /// Unknown names read as a shared zero variable and are recorded as
    /// unresolved. The variable factory is never consulted.
    CollectUndefined,
}

#[derive(Clone, Copy)]
enum Builtin {
    Op(BinaryOp),
    Open,
    Close,
    Comma,
}

/// Built-in spellings, longest first so that `<=` wins over `<`.
const BUILTINS: &[(&str, Builtin)] = &[
    ("and", Builtin::Op(BinaryOp::And)),
    ("<=", Builtin::Op(BinaryOp::Le)),
    (">=", Builtin::Op(BinaryOp::Ge)),
    ("!=", Builtin::Op(BinaryOp::Ne)),
    ("<>", Builtin::Op(BinaryOp::Ne)),
    ("==", Builtin::Op(BinaryOp::Eq)),
    ("&&", Builtin::Op(BinaryOp::And)),
    ("||", Builtin::Op(BinaryOp::Or)),
    ("or", Builtin::Op(BinaryOp::Or)),
    ("=", Builtin::Op(BinaryOp::Eq)),
    ("<", Builtin::Op(BinaryOp::Lt)),
    (">", Builtin::Op(BinaryOp::Gt)),
    ("+", Builtin::Op(BinaryOp::Add)),
    ("-", Builtin::Op(BinaryOp::Sub)),
    ("*", Builtin::Op(BinaryOp::Mul)),
    ("/", Builtin::Op(BinaryOp::Div)),
    ("^", Builtin::Op(BinaryOp::Pow)),
    ("(", Builtin::Open),
    (")", Builtin::Close),
    (",", Builtin::Comma),
];

/// Names read from the formula, keyed by name. `None` marks a name that did
/// not resolve to a variable.
pub type UsedVariables = BTreeMap<String, Option<Variable>>;

pub struct TokenReader<'a> {
    formula: &'a str,
    env: &'a Environment,
    mode: ReadMode,
    pos: usize,
    flags: SyntaxFlags,
    brackets: usize,
    last: Option<TokenClass>,
    used: UsedVariables,
    created: Vec<(String, Variable)>,
    undefined: Variable,
}

impl<'a> TokenReader<'a> {
    pub fn new(formula: &'a str, env: &'a Environment, mode: ReadMode) -> Self {
        Self {
            formula,
            env,
            mode,
            pos: 0,
            flags: SyntaxFlags::START,
            brackets: 0,
            last: None,
            used: BTreeMap::new(),
            created: Vec::new(),
            undefined: Variable::default(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn flags(&self) -> SyntaxFlags {
        self.flags
    }

    /// Open bracket count.
    pub fn depth(&self) -> usize {
        self.brackets
    }

    /// Consume the reader, returning the variables it saw and the ones the
    /// variable factory created along the way.
    pub fn finish(self) -> (UsedVariables, Vec<(String, Variable)>) {
        (self.used, self.created)
    }

    /// Read the next token.
    ///
    /// Once the end has been returned every further call fails with
    /// [`ErrorCode::UnexpectedEof`].
    pub fn read_next_token(&mut self) -> Result<Token<'a>, ParserError> {
        self.skip_blanks();

        if let Some(token) = self.read_end()? {
            return Ok(token);
        }
        if let Some(token) = self.read_builtin()? {
            return Ok(token);
        }
        if let Some(token) = self.read_function()? {
            return Ok(token);
        }
        if let Some(token) = self.read_string()? {
            return Ok(token);
        }
        if let Some(token) = self.read_number()? {
            return Ok(token);
        }
        if let Some(token) = self.read_constant()? {
            return Ok(token);
        }
        if let Some(token) = self.read_variable()? {
            return Ok(token);
        }
        if let Some(token) = self.read_infix_op()? {
            return Ok(token);
        }
        if let Some(token) = self.read_postfix_op()? {
            return Ok(token);
        }
        if let Some(token) = self.read_undefined_variable()? {
            return Ok(token);
        }

        Err(ParserError::at(
            ErrorCode::UnassignableToken,
            self.pos,
            self.unassignable_text(),
        ))
    }

    fn rest(&self) -> &'a str {
        &self.formula[self.pos..]
    }

    fn skip_blanks(&mut self) {
        let bytes = self.formula.as_bytes();
        while let Some(b' ' | b'\t' | b'\r') = bytes.get(self.pos) {
            self.pos += 1;
        }
    }

    /// End offset of the run of bytes matching `class` starting at `from`.
    /// Every class is ASCII-only, so the result is a char boundary.
    fn scan(&self, from: usize, class: fn(u8) -> bool) -> usize {
        let bytes = self.formula.as_bytes();
        let mut end = from;
        while end < bytes.len() && class(bytes[end]) {
            end += 1;
        }
        end
    }

    /// Identifier at the current position.
    fn name(&self) -> Option<&'a str> {
        let end = self.scan(self.pos, is_name_char);
        (end > self.pos).then(|| &self.formula[self.pos..end])
    }

    /// Validate a token of `class` spanning up to `end`, advance past it and
    /// update the syntax flags.
    fn accept(
        &mut self,
        class: TokenClass,
        end: usize,
        kind: TokenKind,
    ) -> Result<Token<'a>, ParserError> {
        let start = self.pos;
        let text = &self.formula[start..end];
        if !self.flags.allows(class) {
            return Err(ParserError::at(class.unexpected(), start, text));
        }
        self.flags = SyntaxFlags::after(class, self.last == Some(TokenClass::Function));
        self.last = Some(class);
        self.pos = end;
        Ok(Token {
            kind,
            text,
            pos: start,
        })
    }

    fn read_end(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        if !matches!(self.formula.as_bytes().get(self.pos), None | Some(b'\n')) {
            return Ok(None);
        }
        if self.brackets > 0 {
            return Err(ParserError::at(ErrorCode::MissingParens, self.pos, ""));
        }
        self.accept(TokenClass::End, self.pos, TokenKind::End).map(Some)
    }

    fn read_builtin(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let rest = self.rest();
        for &(spelling, builtin) in BUILTINS {
            if !rest.starts_with(spelling) {
                continue;
            }
            let end = self.pos + spelling.len();
            // `and` must not match the start of `android`.
            let alphabetic = spelling.as_bytes()[0].is_ascii_alphabetic();
            if alphabetic && self.formula.as_bytes().get(end).is_some_and(|b| is_name_char(*b)) {
                continue;
            }

            let token = match builtin {
                Builtin::Op(op) => {
                    if self.flags.contains(SyntaxFlags::NO_OPERATOR) {
                        // No binary operator here, but it may be a sign.
                        if let Some(token) = self.read_infix_op()? {
                            return Ok(Some(token));
                        }
                        return Err(ParserError::at(
                            ErrorCode::UnexpectedOperator,
                            self.pos,
                            spelling,
                        ));
                    }
                    self.accept(TokenClass::BinaryOp, end, TokenKind::BinOp(op))?
                }
                Builtin::Open => {
                    let token = self.accept(TokenClass::OpenParen, end, TokenKind::OpenParen)?;
                    self.brackets += 1;
                    token
                }
                Builtin::Close => {
                    if self.brackets == 0 {
                        return Err(ParserError::at(ErrorCode::UnexpectedParens, self.pos, ")"));
                    }
                    let token = self.accept(TokenClass::CloseParen, end, TokenKind::CloseParen)?;
                    self.brackets -= 1;
                    token
                }
                Builtin::Comma => {
                    if self.brackets == 0 {
                        return Err(ParserError::at(ErrorCode::UnexpectedComma, self.pos, ","));
                    }
                    self.accept(TokenClass::Comma, end, TokenKind::Comma)?
                }
            };
            return Ok(Some(token));
        }
        Ok(None)
    }

    /// A registered function name followed by `(`.
    fn read_function(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let Some(name) = self.name() else {
            return Ok(None);
        };
        let Some(def) = self.env.functions().get(name) else {
            return Ok(None);
        };
        let end = self.pos + name.len();
        if !self.formula[end..].trim_start_matches([' ', '\t', '\r']).starts_with('(') {
            return Ok(None);
        }
        self.accept(TokenClass::Function, end, TokenKind::Func(def.clone()))
            .map(Some)
    }

    fn read_string(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        if !self.rest().starts_with('"') {
            return Ok(None);
        }

        let bytes = self.formula.as_bytes();
        let mut content = String::new();
        let mut run_start = self.pos + 1;
        let mut i = run_start;
        let end = loop {
            match bytes.get(i) {
                None => {
                    return Err(ParserError::at(
                        ErrorCode::UnterminatedString,
                        self.pos,
                        &self.formula[self.pos..],
                    ));
                }
                Some(b'\\') if bytes.get(i + 1) == Some(&b'"') => {
                    content.push_str(&self.formula[run_start..i]);
                    content.push('"');
                    i += 2;
                    run_start = i;
                }
                Some(b'"') => {
                    content.push_str(&self.formula[run_start..i]);
                    break i + 1;
                }
                Some(_) => i += 1,
            }
        };

        self.accept(TokenClass::String, end, TokenKind::Val(Value::from(content)))
            .map(Some)
    }

    fn read_number(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let Some(end) = scan_number(self.rest()) else {
            return Ok(None);
        };
        let end = self.pos + end;
        let Ok(number) = self.formula[self.pos..end].parse::<f64>() else {
            return Ok(None);
        };
        self.accept(TokenClass::Value, end, TokenKind::Val(Value::float(number)))
            .map(Some)
    }

    fn read_constant(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let Some(name) = self.name() else {
            return Ok(None);
        };
        let Some(value) = self.env.constants().get(name) else {
            return Ok(None);
        };
        let end = self.pos + name.len();
        self.accept(TokenClass::Value, end, TokenKind::Val(value.clone()))
            .map(Some)
    }

    fn read_variable(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let Some(name) = self.name() else {
            return Ok(None);
        };
        let Some(var) = self.env.variables().get(name) else {
            return Ok(None);
        };
        let end = self.pos + name.len();
        let token = self.accept(TokenClass::Variable, end, TokenKind::Var(var.clone()))?;
        self.used.insert(name.to_string(), Some(var.clone()));
        Ok(Some(token))
    }

    fn read_infix_op(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let run_end = self.scan(self.pos, is_infix_char);
        let Some((end, def)) =
            longest_prefix(self.env.infix_ops(), self.pos, &self.formula[self.pos..run_end])
        else {
            return Ok(None);
        };
        self.accept(TokenClass::InfixOp, end, TokenKind::InfixOp(def))
            .map(Some)
    }

    fn read_postfix_op(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let run_end = self.scan(self.pos, is_operator_char);
        let Some((end, def)) =
            longest_prefix(self.env.postfix_ops(), self.pos, &self.formula[self.pos..run_end])
        else {
            return Ok(None);
        };
        self.accept(TokenClass::PostfixOp, end, TokenKind::PostfixOp(def))
            .map(Some)
    }

    fn read_undefined_variable(&mut self) -> Result<Option<Token<'a>>, ParserError> {
        let Some(name) = self.name() else {
            return Ok(None);
        };
        if name.as_bytes()[0].is_ascii_digit() {
            return Ok(None);
        }
        let end = self.pos + name.len();

        // Created earlier in this same formula.
        if let Some((_, var)) = self.created.iter().find(|(n, _)| n == name) {
            let var = var.clone();
            let token = self.accept(TokenClass::Variable, end, TokenKind::Var(var.clone()))?;
            self.used.insert(name.to_string(), Some(var));
            return Ok(Some(token));
        }

        match self.mode {
            ReadMode::CollectUndefined => {
                let var = self.undefined.clone();
                let token = self.accept(TokenClass::Variable, end, TokenKind::Var(var))?;
                self.used.insert(name.to_string(), None);
                Ok(Some(token))
            }
            ReadMode::Strict => {
                let Some(factory) = self.env.var_factory() else {
                    return Ok(None);
                };
                // Check placement before asking the factory for storage.
                if !self.flags.allows(TokenClass::Variable) {
                    return Err(ParserError::at(ErrorCode::UnexpectedVar, self.pos, name));
                }
                let var = factory(name);
                tracing::debug!(name, "Variable created by factory");
                let token = self.accept(TokenClass::Variable, end, TokenKind::Var(var.clone()))?;
                self.used.insert(name.to_string(), Some(var.clone()));
                self.created.push((name.to_string(), var));
                Ok(Some(token))
            }
        }
    }

    fn unassignable_text(&self) -> &'a str {
        let rest = self.rest();
        let end = self.scan(self.pos, is_name_char);
        if end > self.pos {
            return &self.formula[self.pos..end];
        }
        let end = self.scan(self.pos, is_operator_char);
        if end > self.pos {
            return &self.formula[self.pos..end];
        }
        let len = rest.chars().next().map_or(0, char::len_utf8);
        &rest[..len]
    }
}

/// Longest registered name that is a prefix of `run`, with its end offset.
fn longest_prefix(
    table: &BTreeMap<String, FunctionDef>,
    start: usize,
    run: &str,
) -> Option<(usize, FunctionDef)> {
    (1..=run.len())
        .rev()
        .find_map(|len| table.get(&run[..len]).map(|def| (start + len, def.clone())))
}

/// Length of the numeric literal at the start of `text`.
///
/// Accepts `digits [. digits] [e [+-] digits]` and `. digits [...]`. The
/// exponent is only consumed when at least one digit follows it, so `2e`
/// reads as `2` followed by whatever `e` is.
fn scan_number(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        let mut end = from;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        end
    };

    let int_end = digits(0);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits(end + 1);
        if int_end == 0 && frac_end == end + 1 {
            return None;
        }
        end = frac_end;
    }
    if end == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    Some(end)
}
