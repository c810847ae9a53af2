//! Symbol tables: everything a formula can refer to by name.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::{ErrorCode, ParserError};
use crate::values::{FunctionDef, Value, Variable};

/// Supplies storage for names that resolve to nothing else.
pub type VarFactory = Arc<dyn Fn(&str) -> Variable + Send + Sync>;

/// Characters of function, variable and constant names. A name must not
/// start with a digit.
#[inline]
pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Characters of postfix operator names.
#[inline]
pub fn is_operator_char(b: u8) -> bool {
    b.is_ascii_alphabetic() || b"*^/?<>=#!$%&|~'_".contains(&b)
}

/// Characters of infix (sign) operator names.
#[inline]
pub fn is_infix_char(b: u8) -> bool {
    b"/+-*^?<>=#!$%&|~'_".contains(&b)
}

/// Spellings the lexer always reads as binary operators.
const RESERVED: [&str; 2] = ["and", "or"];

fn check_name(name: &str, valid: fn(u8) -> bool) -> Result<(), ParserError> {
    let bytes = name.as_bytes();
    let ok = !bytes.is_empty()
        && !bytes[0].is_ascii_digit()
        && bytes.iter().all(|b| valid(*b))
        && !RESERVED.contains(&name);
    if ok {
        Ok(())
    } else {
        Err(ParserError::new(ErrorCode::InvalidName).with_token(name))
    }
}

fn conflict(name: &str) -> ParserError {
    ParserError::new(ErrorCode::NameConflict).with_token(name)
}

/// The five name spaces of an engine plus the optional variable factory.
///
/// A constant may not share its name with a variable or a function. All
/// other overlaps are allowed; registering an existing name in the same
/// table replaces the old entry.
#[derive(Clone, Default)]
pub struct Environment {
    variables: BTreeMap<String, Variable>,
    constants: BTreeMap<String, Value>,
    functions: BTreeMap<String, FunctionDef>,
    postfix_ops: BTreeMap<String, FunctionDef>,
    infix_ops: BTreeMap<String, FunctionDef>,
    var_factory: Option<VarFactory>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_var(&mut self, name: &str, var: Variable) -> Result<(), ParserError> {
        check_name(name, is_name_char)?;
        if self.constants.contains_key(name) {
            return Err(conflict(name));
        }
        self.variables.insert(name.to_string(), var);
        Ok(())
    }

    pub fn define_const(&mut self, name: &str, value: Value) -> Result<(), ParserError> {
        check_name(name, is_name_char)?;
        if self.variables.contains_key(name) || self.functions.contains_key(name) {
            return Err(conflict(name));
        }
        self.constants.insert(name.to_string(), value);
        Ok(())
    }

    pub fn define_fun(&mut self, name: &str, def: FunctionDef) -> Result<(), ParserError> {
        check_name(name, is_name_char)?;
        if self.constants.contains_key(name) {
            return Err(conflict(name));
        }
        self.functions.insert(name.to_string(), def);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics in debug builds if the callback does not take one argument.
    pub fn define_postfix_op(&mut self, name: &str, def: FunctionDef) -> Result<(), ParserError> {
        debug_assert_eq!(def.callable.arity(), 1, "postfix operators are unary");
        check_name(name, is_operator_char)?;
        self.postfix_ops.insert(name.to_string(), def);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics in debug builds if the callback does not take one argument.
    pub fn define_infix_op(&mut self, name: &str, def: FunctionDef) -> Result<(), ParserError> {
        debug_assert_eq!(def.callable.arity(), 1, "infix operators are unary");
        check_name(name, is_infix_char)?;
        self.infix_ops.insert(name.to_string(), def);
        Ok(())
    }

    pub fn remove_var(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    pub fn remove_const(&mut self, name: &str) -> Option<Value> {
        self.constants.remove(name)
    }

    pub fn remove_fun(&mut self, name: &str) -> Option<FunctionDef> {
        self.functions.remove(name)
    }

    pub fn clear_vars(&mut self) {
        self.variables.clear();
    }

    pub fn clear_consts(&mut self) {
        self.constants.clear();
    }

    pub fn clear_funs(&mut self) {
        self.functions.clear();
    }

    pub fn clear_postfix_ops(&mut self) {
        self.postfix_ops.clear();
    }

    pub fn clear_infix_ops(&mut self) {
        self.infix_ops.clear();
    }

    pub fn set_var_factory(&mut self, factory: Option<VarFactory>) {
        self.var_factory = factory;
    }

    /// Record a variable the factory created while parsing.
    pub(crate) fn adopt_created(&mut self, name: String, var: Variable) {
        self.variables.entry(name).or_insert(var);
    }

    pub fn variables(&self) -> &BTreeMap<String, Variable> {
        &self.variables
    }

    pub fn constants(&self) -> &BTreeMap<String, Value> {
        &self.constants
    }

    pub fn functions(&self) -> &BTreeMap<String, FunctionDef> {
        &self.functions
    }

    pub fn postfix_ops(&self) -> &BTreeMap<String, FunctionDef> {
        &self.postfix_ops
    }

    pub fn infix_ops(&self) -> &BTreeMap<String, FunctionDef> {
        &self.infix_ops
    }

    pub fn var_factory(&self) -> Option<&VarFactory> {
        self.var_factory.as_ref()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .field("constants", &self.constants)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("postfix_ops", &self.postfix_ops.keys().collect::<Vec<_>>())
            .field("infix_ops", &self.infix_ops.keys().collect::<Vec<_>>())
            .field("var_factory", &self.var_factory.is_some())
            .finish()
    }
}
