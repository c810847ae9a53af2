//! The grammar of formulas, expressed as "what may come next" flags.
//!
//! After every token the lexer replaces the current [`SyntaxFlags`] with the
//! set of token classes that must not follow it. There is no other grammar
//! table: a token is legal exactly when its class is not forbidden.

use bitflags::bitflags;

use crate::api::ErrorCode;

bitflags! {
    /// Token classes that are illegal at the current position.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct SyntaxFlags: u16 {
        const NO_OPEN_PAREN = 1 << 0;
        const NO_CLOSE_PAREN = 1 << 1;
        const NO_VALUE = 1 << 2;
        const NO_VARIABLE = 1 << 3;
        const NO_COMMA = 1 << 4;
        const NO_FUNCTION = 1 << 5;
        const NO_OPERATOR = 1 << 6;
        const NO_POSTFIX_OP = 1 << 7;
        const NO_INFIX_OP = 1 << 8;
        const NO_END = 1 << 9;
    }
}

/// Coarse token categories the grammar distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    End,
    Comma,
    OpenParen,
    CloseParen,
    BinaryOp,
    /// Numeric literal or named constant.
    Value,
    /// String literal.
    String,
    Variable,
    Function,
    InfixOp,
    PostfixOp,
}

impl TokenClass {
    pub const ALL: [TokenClass; 11] = [
        TokenClass::End,
        TokenClass::Comma,
        TokenClass::OpenParen,
        TokenClass::CloseParen,
        TokenClass::BinaryOp,
        TokenClass::Value,
        TokenClass::String,
        TokenClass::Variable,
        TokenClass::Function,
        TokenClass::InfixOp,
        TokenClass::PostfixOp,
    ];

    /// The flag that rejects this class.
    pub fn forbidden_by(self) -> SyntaxFlags {
        match self {
            TokenClass::End => SyntaxFlags::NO_END,
            TokenClass::Comma => SyntaxFlags::NO_COMMA,
            TokenClass::OpenParen => SyntaxFlags::NO_OPEN_PAREN,
            TokenClass::CloseParen => SyntaxFlags::NO_CLOSE_PAREN,
            TokenClass::BinaryOp => SyntaxFlags::NO_OPERATOR,
            TokenClass::Value | TokenClass::String => SyntaxFlags::NO_VALUE,
            TokenClass::Variable => SyntaxFlags::NO_VARIABLE,
            TokenClass::Function => SyntaxFlags::NO_FUNCTION,
            TokenClass::InfixOp => SyntaxFlags::NO_INFIX_OP,
            TokenClass::PostfixOp => SyntaxFlags::NO_POSTFIX_OP,
        }
    }

    /// Error raised when this class shows up where it is forbidden.
    pub fn unexpected(self) -> ErrorCode {
        match self {
            TokenClass::End => ErrorCode::UnexpectedEof,
            TokenClass::Comma => ErrorCode::UnexpectedComma,
            TokenClass::OpenParen | TokenClass::CloseParen => ErrorCode::UnexpectedParens,
            TokenClass::BinaryOp | TokenClass::InfixOp | TokenClass::PostfixOp => {
                ErrorCode::UnexpectedOperator
            }
            TokenClass::Value | TokenClass::String => ErrorCode::UnexpectedVal,
            TokenClass::Variable => ErrorCode::UnexpectedVar,
            TokenClass::Function => ErrorCode::UnexpectedFun,
        }
    }
}

impl SyntaxFlags {
    /// Flags at the start of a formula: an operand or a sign must come first.
    pub const START: SyntaxFlags = SyntaxFlags::NO_OPERATOR
        .union(SyntaxFlags::NO_CLOSE_PAREN)
        .union(SyntaxFlags::NO_POSTFIX_OP)
        .union(SyntaxFlags::NO_COMMA)
        .union(SyntaxFlags::NO_END);

    /// An operand was just read: only operators, postfix operators, commas,
    /// closing brackets and the end may follow.
    const AFTER_OPERAND: SyntaxFlags = SyntaxFlags::NO_VALUE
        .union(SyntaxFlags::NO_VARIABLE)
        .union(SyntaxFlags::NO_FUNCTION)
        .union(SyntaxFlags::NO_OPEN_PAREN)
        .union(SyntaxFlags::NO_INFIX_OP);

    /// A new operand is required.
    const EXPECT_OPERAND: SyntaxFlags = SyntaxFlags::NO_CLOSE_PAREN
        .union(SyntaxFlags::NO_OPERATOR)
        .union(SyntaxFlags::NO_COMMA)
        .union(SyntaxFlags::NO_POSTFIX_OP)
        .union(SyntaxFlags::NO_END);

    #[inline]
    pub fn allows(self, class: TokenClass) -> bool {
        !self.intersects(class.forbidden_by())
    }

    /// Flags in effect after reading a token of `class`.
    ///
    /// `follows_function` is only consulted for `(`: the argument list of a
    /// function may be empty, so `)` stays legal there and the parser reports
    /// the arity error instead.
    pub fn after(class: TokenClass, follows_function: bool) -> SyntaxFlags {
        match class {
            TokenClass::End => SyntaxFlags::all(),
            TokenClass::OpenParen if follows_function => {
                SyntaxFlags::EXPECT_OPERAND.difference(SyntaxFlags::NO_CLOSE_PAREN)
            }
            TokenClass::OpenParen | TokenClass::Comma | TokenClass::BinaryOp => {
                SyntaxFlags::EXPECT_OPERAND
            }
            TokenClass::CloseParen | TokenClass::Value | TokenClass::Variable => {
                SyntaxFlags::AFTER_OPERAND
            }
            TokenClass::String => SyntaxFlags::AFTER_OPERAND.union(SyntaxFlags::NO_POSTFIX_OP),
            TokenClass::Function => SyntaxFlags::all().difference(SyntaxFlags::NO_OPEN_PAREN),
            TokenClass::InfixOp => SyntaxFlags::EXPECT_OPERAND.union(SyntaxFlags::NO_INFIX_OP),
            TokenClass::PostfixOp => SyntaxFlags::AFTER_OPERAND.union(SyntaxFlags::NO_POSTFIX_OP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_FLAGS: [SyntaxFlags; 10] = [
        SyntaxFlags::NO_OPEN_PAREN,
        SyntaxFlags::NO_CLOSE_PAREN,
        SyntaxFlags::NO_VALUE,
        SyntaxFlags::NO_VARIABLE,
        SyntaxFlags::NO_COMMA,
        SyntaxFlags::NO_FUNCTION,
        SyntaxFlags::NO_OPERATOR,
        SyntaxFlags::NO_POSTFIX_OP,
        SyntaxFlags::NO_INFIX_OP,
        SyntaxFlags::NO_END,
    ];

    #[test]
    fn test_every_flag_rejects_exactly_its_classes() {
        for flag in SINGLE_FLAGS {
            for class in TokenClass::ALL {
                let expected = class.forbidden_by() == flag;
                assert_eq!(
                    !flag.allows(class),
                    expected,
                    "flag {flag:?} vs class {class:?}"
                );
            }
        }
        for class in TokenClass::ALL {
            assert!(SyntaxFlags::empty().allows(class));
            assert!(!SyntaxFlags::all().allows(class));
        }
    }

    #[test]
    fn test_start_of_formula() {
        let start = SyntaxFlags::START;
        let allowed: Vec<_> = TokenClass::ALL
            .into_iter()
            .filter(|c| start.allows(*c))
            .collect();
        assert_eq!(
            allowed,
            [
                TokenClass::OpenParen,
                TokenClass::Value,
                TokenClass::String,
                TokenClass::Variable,
                TokenClass::Function,
                TokenClass::InfixOp,
            ]
        );
    }

    /// Full transition table: for every token class, which classes may follow.
    #[test]
    fn test_transition_table() {
        use TokenClass::*;

        let cases: &[(TokenClass, bool, &[TokenClass])] = &[
            (
                OpenParen,
                false,
                &[OpenParen, Value, String, Variable, Function, InfixOp],
            ),
            (
                OpenParen,
                true,
                &[OpenParen, CloseParen, Value, String, Variable, Function, InfixOp],
            ),
            (CloseParen, false, &[End, Comma, CloseParen, BinaryOp, PostfixOp]),
            (Comma, false, &[OpenParen, Value, String, Variable, Function, InfixOp]),
            (
                BinaryOp,
                false,
                &[OpenParen, Value, String, Variable, Function, InfixOp],
            ),
            (Value, false, &[End, Comma, CloseParen, BinaryOp, PostfixOp]),
            (String, false, &[End, Comma, CloseParen, BinaryOp]),
            (Variable, false, &[End, Comma, CloseParen, BinaryOp, PostfixOp]),
            (Function, false, &[OpenParen]),
            (InfixOp, false, &[OpenParen, Value, String, Variable, Function]),
            (PostfixOp, false, &[End, Comma, CloseParen, BinaryOp]),
            (End, false, &[]),
        ];

        for (class, follows_function, expected) in cases {
            let flags = SyntaxFlags::after(*class, *follows_function);
            for next in TokenClass::ALL {
                assert_eq!(
                    flags.allows(next),
                    expected.contains(&next),
                    "{next:?} after {class:?} (follows_function = {follows_function})"
                );
            }
        }
    }

    #[test]
    fn test_unexpected_codes() {
        assert_eq!(TokenClass::End.unexpected(), ErrorCode::UnexpectedEof);
        assert_eq!(TokenClass::Comma.unexpected(), ErrorCode::UnexpectedComma);
        assert_eq!(TokenClass::OpenParen.unexpected(), ErrorCode::UnexpectedParens);
        assert_eq!(TokenClass::CloseParen.unexpected(), ErrorCode::UnexpectedParens);
        assert_eq!(TokenClass::BinaryOp.unexpected(), ErrorCode::UnexpectedOperator);
        assert_eq!(TokenClass::InfixOp.unexpected(), ErrorCode::UnexpectedOperator);
        assert_eq!(TokenClass::PostfixOp.unexpected(), ErrorCode::UnexpectedOperator);
        assert_eq!(TokenClass::Value.unexpected(), ErrorCode::UnexpectedVal);
        assert_eq!(TokenClass::String.unexpected(), ErrorCode::UnexpectedVal);
        assert_eq!(TokenClass::Variable.unexpected(), ErrorCode::UnexpectedVar);
        assert_eq!(TokenClass::Function.unexpected(), ErrorCode::UnexpectedFun);
    }
}
