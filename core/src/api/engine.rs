//! The xpr evaluation engine.

use std::sync::Arc;

use super::{EngineOptions, Environment, ParserError, VarFactory};
use crate::parser::{self, ParseOptions, ReadMode, UsedVariables};
use crate::stdlib;
use crate::values::{Callable, FunctionDef, Value, Variable};
use crate::vm::{Code, VM};

#[derive(Debug, Clone, Default)]
enum EvalState {
    /// The next `calc()` parses the formula.
    #[default]
    NeedsCompile,
    /// The formula folded to a literal.
    Constant(Value),
    Bytecode(Code),
}

/// Parses, compiles and evaluates one formula against a set of symbols.
///
/// The first [`calc`](Engine::calc) after any change parses the formula and
/// evaluates it in the same pass, leaving compiled bytecode behind. Later
/// calls run the bytecode, reading variables through their shared handles.
/// Every mutation of the formula, the symbols or the options invalidates the
/// compiled program.
///
/// # Example
///
/// ```
/// use xpr_core::{Engine, Value, Variable};
///
/// let mut engine = Engine::default();
/// let a = Variable::new(1.0);
/// engine.define_var("a", a.clone()).unwrap();
/// engine.set_formula("(1 + 2*a)");
/// assert_eq!(engine.calc().unwrap(), Value::float(3.0));
///
/// a.set(2.0);
/// assert_eq!(engine.calc().unwrap(), Value::float(5.0));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    formula: String,
    environment: Environment,
    options: EngineOptions,
    state: EvalState,
    slots: Vec<Value>,
}

static_assertions::assert_impl_all!(Engine: Send, Sync, Clone);

impl Default for Engine {
    fn default() -> Self {
        Engine::with_stdlib(EngineOptions::default())
    }
}

impl Engine {
    /// An engine with empty symbol tables.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            formula: String::new(),
            environment: Environment::new(),
            options,
            state: EvalState::NeedsCompile,
            slots: Vec::new(),
        }
    }

    /// An engine preloaded with the math and string functions, `_pi`, `_e`
    /// and unary minus.
    pub fn with_stdlib(options: EngineOptions) -> Self {
        let mut engine = Self::new(options);
        stdlib::register_stdlib(&mut engine.environment).expect("stdlib names are valid");
        engine
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn set_formula(&mut self, formula: impl Into<String>) {
        self.formula = formula.into();
        self.reset();
    }

    pub fn enable_optimizer(&mut self, enabled: bool) {
        self.options.optimizer = enabled;
        self.reset();
    }

    pub fn enable_bytecode(&mut self, enabled: bool) {
        self.options.bytecode = enabled;
        self.reset();
    }

    pub fn define_var(&mut self, name: &str, var: Variable) -> Result<(), ParserError> {
        self.environment.define_var(name, var)?;
        self.reset();
        Ok(())
    }

    pub fn define_const(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ParserError> {
        self.environment.define_const(name, value.into())?;
        self.reset();
        Ok(())
    }

    pub fn define_str_const(&mut self, name: &str, value: &str) -> Result<(), ParserError> {
        self.define_const(name, Value::str(value))
    }

    /// Register a function. Calls to an `optimizable` function with constant
    /// arguments are folded at compile time, so only mark functions without
    /// side effects whose result depends on nothing but the arguments.
    pub fn define_fun(
        &mut self,
        name: &str,
        callable: Callable,
        optimizable: bool,
    ) -> Result<(), ParserError> {
        self.environment
            .define_fun(name, FunctionDef::new(callable, optimizable))?;
        self.reset();
        Ok(())
    }

    /// Register a postfix operator such as a unit suffix.
    ///
    /// ```
    /// use xpr_core::{Engine, Value};
    ///
    /// let mut engine = Engine::default();
    /// engine
    ///     .define_postfix_op("m", |v| Ok(Value::float(v.to_float()? / 1000.0)), true)
    ///     .unwrap();
    /// engine.set_formula("1000m");
    /// assert_eq!(engine.calc().unwrap(), Value::float(1.0));
    /// ```
    pub fn define_postfix_op(
        &mut self,
        name: &str,
        f: impl Fn(&Value) -> Result<Value, ParserError> + Send + Sync + 'static,
        optimizable: bool,
    ) -> Result<(), ParserError> {
        self.environment
            .define_postfix_op(name, FunctionDef::new(Callable::fixed1(f), optimizable))?;
        self.reset();
        Ok(())
    }

    /// Register a prefix sign operator. Infix operators bind tighter than
    /// any binary operator, so with the built-in minus `-2^2` is `4`.
    pub fn define_infix_op(
        &mut self,
        name: &str,
        f: impl Fn(&Value) -> Result<Value, ParserError> + Send + Sync + 'static,
        optimizable: bool,
    ) -> Result<(), ParserError> {
        self.environment
            .define_infix_op(name, FunctionDef::new(Callable::fixed1(f), optimizable))?;
        self.reset();
        Ok(())
    }

    pub fn remove_var(&mut self, name: &str) {
        self.environment.remove_var(name);
        self.reset();
    }

    pub fn remove_const(&mut self, name: &str) {
        self.environment.remove_const(name);
        self.reset();
    }

    pub fn remove_fun(&mut self, name: &str) {
        self.environment.remove_fun(name);
        self.reset();
    }

    pub fn clear_vars(&mut self) {
        self.environment.clear_vars();
        self.reset();
    }

    pub fn clear_consts(&mut self) {
        self.environment.clear_consts();
        self.reset();
    }

    pub fn clear_funs(&mut self) {
        self.environment.clear_funs();
        self.reset();
    }

    pub fn clear_postfix_ops(&mut self) {
        self.environment.clear_postfix_ops();
        self.reset();
    }

    pub fn clear_infix_ops(&mut self) {
        self.environment.clear_infix_ops();
        self.reset();
    }

    /// Install a factory that supplies storage for unknown names instead of
    /// failing. Created variables are added to the variable table.
    ///
    /// ```
    /// use xpr_core::{Engine, Value, Variable};
    ///
    /// let mut engine = Engine::default();
    /// engine.set_var_factory(|_name| Variable::new(10.0));
    /// engine.set_formula("x + y");
    /// assert_eq!(engine.calc().unwrap(), Value::float(20.0));
    /// assert!(engine.variables().contains_key("x"));
    /// ```
    pub fn set_var_factory(&mut self, factory: impl Fn(&str) -> Variable + Send + Sync + 'static) {
        let factory: VarFactory = Arc::new(factory);
        self.environment.set_var_factory(Some(factory));
        self.reset();
    }

    pub fn clear_var_factory(&mut self) {
        self.environment.set_var_factory(None);
        self.reset();
    }

    pub fn variables(&self) -> &std::collections::BTreeMap<String, Variable> {
        self.environment.variables()
    }

    pub fn constants(&self) -> &std::collections::BTreeMap<String, Value> {
        self.environment.constants()
    }

    pub fn functions(&self) -> &std::collections::BTreeMap<String, FunctionDef> {
        self.environment.functions()
    }

    /// Whether a compiled program is cached.
    pub fn is_compiled(&self) -> bool {
        !matches!(self.state, EvalState::NeedsCompile)
    }

    /// The cached program, if the formula compiled to more than a literal.
    pub fn bytecode(&self) -> Option<&Code> {
        match &self.state {
            EvalState::Bytecode(code) => Some(code),
            _ => None,
        }
    }

    /// Evaluate the formula.
    pub fn calc(&mut self) -> Result<Value, ParserError> {
        match &self.state {
            EvalState::Constant(value) => Ok(value.clone()),
            EvalState::Bytecode(code) => VM::execute(code, &mut self.slots)
                .map_err(|err| err.with_formula(self.formula.as_str())),
            EvalState::NeedsCompile => self.parse_formula(),
        }
    }

    /// Names the formula reads as variables. Names that resolve to nothing
    /// map to `None`; the variable factory is not consulted.
    ///
    /// Evaluation errors are ignored while collecting, syntax errors are not.
    /// The compiled program is discarded.
    ///
    /// ```
    /// use xpr_core::{Engine, Variable};
    ///
    /// let mut engine = Engine::default();
    /// engine.define_var("a", Variable::new(0.0)).unwrap();
    /// engine.set_formula("a / b");
    /// let used = engine.used_variables().unwrap();
    /// assert!(used["a"].is_some());
    /// assert!(used["b"].is_none());
    /// ```
    pub fn used_variables(&mut self) -> Result<UsedVariables, ParserError> {
        self.reset();
        let options = ParseOptions {
            optimize: self.options.optimizer,
            mode: ReadMode::CollectUndefined,
        };
        let output = parser::parse(&self.formula, &self.environment, options)?;
        Ok(output.used)
    }

    fn reset(&mut self) {
        self.state = EvalState::NeedsCompile;
    }

    fn parse_formula(&mut self) -> Result<Value, ParserError> {
        let options = ParseOptions {
            optimize: self.options.optimizer,
            mode: ReadMode::Strict,
        };
        let output = parser::parse(&self.formula, &self.environment, options)?;

        for (name, var) in output.created {
            self.environment.adopt_created(name, var);
        }

        if self.options.bytecode {
            tracing::debug!(
                formula = %self.formula,
                instructions = output.code.instructions.len(),
                constant = output.code.as_constant().is_some(),
                "Compiled formula"
            );
            self.state = match output.code.as_constant() {
                Some(value) => EvalState::Constant(value.clone()),
                None => {
                    self.slots.resize(output.code.num_slots, Value::ZERO);
                    EvalState::Bytecode(output.code)
                }
            };
        }

        Ok(output.value)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
