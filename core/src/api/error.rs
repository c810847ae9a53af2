//! Public error type for the xpr engine.
//!
//! Every failure (bad registration, malformed formula, evaluation error) is
//! reported as a [`ParserError`]. The error keeps the raw message template
//! with `$TOK$` / `$POS$` placeholders next to the substituted message, so
//! callers can localize or re-render it.

/// Stable error kinds. The numeric values are part of the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// A binary or unary operator in a position where none is allowed.
    UnexpectedOperator = 0,
    /// Text that is not a known token.
    UnassignableToken = 1,
    /// The formula ended where more input was required.
    UnexpectedEof = 2,
    /// A comma outside of a function call, or in an illegal position.
    UnexpectedComma = 3,
    /// A parenthesized argument list that does not belong to a function.
    UnexpectedArg = 4,
    UnexpectedVal = 5,
    UnexpectedVar = 6,
    UnexpectedParens = 7,
    UnexpectedFun = 8,
    MissingParens = 9,
    UnterminatedString = 10,
    TooManyParams = 11,
    TooFewParams = 12,
    InvalidName = 13,
    /// A name registered as a constant and as a variable or function.
    NameConflict = 14,
    /// An operator or function was applied to the wrong kind of value.
    TypeMismatch = 15,
    DomainError = 16,
    DivByZero = 17,
    /// The formula needs more evaluation slots than a program may use.
    FormulaTooComplex = 18,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Message template with `$TOK$` and `$POS$` placeholders.
    pub fn template(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedOperator => "Unexpected operator \"$TOK$\" found at position $POS$",
            ErrorCode::UnassignableToken => "Unexpected token \"$TOK$\" found at position $POS$",
            ErrorCode::UnexpectedEof => "Unexpected end of formula at position $POS$",
            ErrorCode::UnexpectedComma => "Unexpected argument separator at position $POS$",
            ErrorCode::UnexpectedArg => "Unexpected argument list at position $POS$",
            ErrorCode::UnexpectedVal => "Unexpected value \"$TOK$\" found at position $POS$",
            ErrorCode::UnexpectedVar => "Unexpected variable \"$TOK$\" found at position $POS$",
            ErrorCode::UnexpectedParens => "Unexpected parenthesis \"$TOK$\" at position $POS$",
            ErrorCode::UnexpectedFun => "Unexpected function \"$TOK$\" at position $POS$",
            ErrorCode::MissingParens => "Missing closing parenthesis at position $POS$",
            ErrorCode::UnterminatedString => "Unterminated string starting at position $POS$",
            ErrorCode::TooManyParams => {
                "Too many parameters for function \"$TOK$\" at position $POS$"
            }
            ErrorCode::TooFewParams => {
                "Too few parameters for function \"$TOK$\" at position $POS$"
            }
            ErrorCode::InvalidName => "Invalid name \"$TOK$\"",
            ErrorCode::NameConflict => "Name conflict: \"$TOK$\" is already defined",
            ErrorCode::TypeMismatch => "Operand type mismatch for \"$TOK$\"",
            ErrorCode::DomainError => "Argument out of domain in \"$TOK$\"",
            ErrorCode::DivByZero => "Division by zero",
            ErrorCode::FormulaTooComplex => "Formula is too complex",
        }
    }
}

/// The single error type of the engine.
///
/// # Example
///
/// ```
/// use xpr_core::{Engine, ErrorCode};
///
/// let mut engine = Engine::with_stdlib(Default::default());
/// engine.set_formula("sin(8,8)");
/// let err = engine.calc().unwrap_err();
/// assert_eq!(err.code(), ErrorCode::TooManyParams);
/// assert_eq!(err.token(), "sin");
/// assert_eq!(err.formula(), "sin(8,8)");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParserError {
    code: ErrorCode,
    message: String,
    token: String,
    formula: String,
    pos: Option<usize>,
}

impl ParserError {
    pub fn new(code: ErrorCode) -> Self {
        let mut err = Self {
            code,
            message: String::new(),
            token: String::new(),
            formula: String::new(),
            pos: None,
        };
        err.render();
        err
    }

    /// An error at a position of the formula, naming the offending text.
    pub fn at(code: ErrorCode, pos: usize, token: impl Into<String>) -> Self {
        let mut err = Self::new(code);
        err.pos = Some(pos);
        err.token = token.into();
        err.render();
        err
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self.render();
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// Fill in position and token only if the error does not carry them yet.
    ///
    /// Errors raised by callbacks or value operations know nothing about
    /// the formula; the parser locates them at the token being applied.
    pub(crate) fn locate(mut self, pos: usize, token: &str) -> Self {
        if self.pos.is_none() {
            self.pos = Some(pos);
        }
        if self.token.is_empty() {
            self.token.push_str(token);
        }
        self.render();
        self
    }

    fn render(&mut self) {
        let pos = match self.pos {
            Some(pos) => pos.to_string(),
            None => "-1".to_string(),
        };
        self.message = self
            .code
            .template()
            .replace("$TOK$", &self.token)
            .replace("$POS$", &pos);
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The message after placeholder substitution.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn template(&self) -> &'static str {
        self.code.template()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Byte offset into the formula, `None` for errors that are not tied to
    /// a position (registration and evaluation errors).
    pub fn pos(&self) -> Option<usize> {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_substitution() {
        let err = ParserError::at(ErrorCode::UnexpectedOperator, 3, "*");
        assert_eq!(err.message(), "Unexpected operator \"*\" found at position 3");
        assert_eq!(
            err.template(),
            "Unexpected operator \"$TOK$\" found at position $POS$"
        );
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn test_unpositioned_errors_render_minus_one() {
        let err = ParserError::new(ErrorCode::UnexpectedEof);
        assert_eq!(err.pos(), None);
        assert_eq!(err.message(), "Unexpected end of formula at position -1");
    }

    #[test]
    fn test_locate_keeps_existing_fields() {
        let err = ParserError::new(ErrorCode::TypeMismatch)
            .with_token("+")
            .locate(7, "ignored");
        assert_eq!(err.pos(), Some(7));
        assert_eq!(err.token(), "+");
        assert_eq!(err.message(), "Operand type mismatch for \"+\"");
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::UnexpectedOperator.as_i32(), 0);
        assert_eq!(ErrorCode::TooManyParams.as_i32(), 11);
        assert_eq!(ErrorCode::FormulaTooComplex.as_i32(), 18);
    }
}
