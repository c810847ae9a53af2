use core::cmp::Ordering;
use core::fmt;

use ecow::EcoString;

use crate::api::{ErrorCode, ParserError};
use crate::parser::BinaryOp;

/// The operand and result type of every formula.
///
/// A value is either a float or a string. Booleans are floats (`1` / `0`)
/// and truthiness is "not equal to zero", so a string is always true.
/// Cloning is cheap: short strings are stored inline and long ones are
/// reference counted.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Float(f64),
    Str(EcoString),
}

static_assertions::const_assert!(core::mem::size_of::<Value>() <= 24);
static_assertions::assert_impl_all!(Value: Send, Sync);

impl Default for Value {
    fn default() -> Self {
        Value::ZERO
    }
}

impl Value {
    /// The float zero, also the binding of undefined identifiers while
    /// collecting used variables.
    pub const ZERO: Value = Value::Float(0.0);

    pub fn float(value: f64) -> Self {
        Value::Float(value)
    }

    pub fn str(value: &str) -> Self {
        Value::Str(EcoString::from(value))
    }

    pub fn bool(value: bool) -> Self {
        Value::Float(if value { 1.0 } else { 0.0 })
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            Value::Float(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Extract the float or fail with [`ErrorCode::TypeMismatch`].
    ///
    /// Intended for callbacks that only accept numbers.
    pub fn to_float(&self) -> Result<f64, ParserError> {
        self.as_float().ok_or_else(|| {
            ParserError::new(ErrorCode::TypeMismatch).with_token(self.type_name())
        })
    }

    pub fn truthy(&self) -> bool {
        *self != Value::ZERO
    }

    /// Apply one of the built-in binary operators.
    ///
    /// `+` concatenates two strings, comparisons order strings
    /// lexicographically, and `=`/`!=` compare values of different kinds as
    /// unequal. Everything else requires two floats.
    pub fn binary(&self, op: BinaryOp, rhs: &Value) -> Result<Value, ParserError> {
        use BinaryOp::*;
        use Value::{Float, Str};

        let mismatch = || ParserError::new(ErrorCode::TypeMismatch).with_token(op.symbol());

        match op {
            Eq => return Ok(Value::bool(self == rhs)),
            Ne => return Ok(Value::bool(self != rhs)),
            And => return Ok(Value::bool(self.truthy() && rhs.truthy())),
            Or => return Ok(Value::bool(self.truthy() || rhs.truthy())),
            Lt | Gt | Le | Ge => {
                let ordering = match (self, rhs) {
                    (Float(a), Float(b)) => a.partial_cmp(b),
                    (Str(a), Str(b)) => Some(a.cmp(b)),
                    _ => return Err(mismatch()),
                };
                // NaN compares false against everything.
                let result = match (op, ordering) {
                    (_, None) => false,
                    (Lt, Some(o)) => o == Ordering::Less,
                    (Gt, Some(o)) => o == Ordering::Greater,
                    (Le, Some(o)) => o != Ordering::Greater,
                    (Ge, Some(o)) => o != Ordering::Less,
                    _ => unreachable!(),
                };
                return Ok(Value::bool(result));
            }
            Add | Sub | Mul | Div | Pow => {}
        }

        match (self, rhs) {
            (Float(a), Float(b)) => match op {
                Add => Ok(Float(a + b)),
                Sub => Ok(Float(a - b)),
                Mul => Ok(Float(a * b)),
                Div if *b == 0.0 => Err(ParserError::new(ErrorCode::DivByZero)),
                Div => Ok(Float(a / b)),
                Pow => Ok(Float(a.powf(*b))),
                _ => unreachable!(),
            },
            (Str(a), Str(b)) if op == Add => {
                let mut joined = a.clone();
                joined.push_str(b);
                Ok(Str(joined))
            }
            _ => Err(mismatch()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(EcoString::from(value))
    }
}

impl From<EcoString> for Value {
    fn from(value: EcoString) -> Self {
        Value::Str(value)
    }
}
