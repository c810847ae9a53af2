//! Lexer for highlighting and tracking nesting depth in the REPL.
//!
//! This is not the engine's tokenizer: it knows nothing about the symbols
//! defined in an engine and never fails. Every byte of the input belongs to
//! exactly one token.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    /// A string literal missing its closing quote. Runs to the end of input.
    Unterminated,
    Name,
    /// A name followed by `(`.
    Function,
    Operator,
    OpenParen,
    CloseParen,
    Comma,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

fn eat_while(chars: &mut Chars, pred: impl Fn(char) -> bool) {
    while chars.next_if(|(_, c)| pred(*c)).is_some() {}
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_operator_char(c: char) -> bool {
    !(is_name_char(c) || c.is_whitespace() || matches!(c, '"' | '(' | ')' | ','))
}

fn scan_string(chars: &mut Chars) -> TokenKind {
    let mut escaped = false;
    for (_, c) in chars.by_ref() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return TokenKind::String,
            _ => {}
        }
    }
    TokenKind::Unterminated
}

fn scan_number(chars: &mut Chars) {
    eat_while(chars, |c| c.is_ascii_digit() || c == '.');
    let mut lookahead = chars.clone();
    if lookahead.next_if(|(_, c)| matches!(c, 'e' | 'E')).is_none() {
        return;
    }
    lookahead.next_if(|(_, c)| matches!(c, '+' | '-'));
    if lookahead.peek().is_some_and(|(_, c)| c.is_ascii_digit()) {
        *chars = lookahead;
        eat_while(chars, |c| c.is_ascii_digit());
    }
}

/// Split `input` into tokens covering it completely.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            ',' => TokenKind::Comma,
            '"' => scan_string(&mut chars),
            c if c.is_whitespace() => {
                eat_while(&mut chars, char::is_whitespace);
                TokenKind::Blank
            }
            c if c.is_ascii_digit()
                || (c == '.' && chars.peek().is_some_and(|(_, n)| n.is_ascii_digit())) =>
            {
                scan_number(&mut chars);
                TokenKind::Number
            }
            c if is_name_char(c) => {
                eat_while(&mut chars, is_name_char);
                TokenKind::Name
            }
            _ => {
                eat_while(&mut chars, is_operator_char);
                TokenKind::Operator
            }
        };
        let end = chars.peek().map_or(input.len(), |(i, _)| *i);
        tokens.push(Token {
            kind,
            span: start..end,
        });
    }

    for i in 0..tokens.len() {
        let calls = tokens[i + 1..]
            .iter()
            .find(|t| t.kind != TokenKind::Blank)
            .is_some_and(|t| t.kind == TokenKind::OpenParen);
        if tokens[i].kind == TokenKind::Name && calls {
            tokens[i].kind = TokenKind::Function;
        }
    }

    tokens
}

/// Calculates the nesting depth of parentheses in the given buffer.
///
/// Returns `Some(depth)` where depth is the net nesting level (≥ 0),
/// or `None` if the buffer ends inside a string.
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let mut depth: isize = 0;
    for token in tokenize(buffer) {
        match token.kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => depth -= 1,
            TokenKind::Unterminated => return None,
            _ => {}
        }
    }
    Some(depth.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use TokenKind as K;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize(input)
            .into_iter()
            .filter(|t| t.kind != K::Blank)
            .map(|t| (t.kind, &input[t.span]))
            .collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            kinds("sum (a, 1.5e-3) >= \"x\\\"y\""),
            vec![
                (K::Function, "sum"),
                (K::OpenParen, "("),
                (K::Name, "a"),
                (K::Comma, ","),
                (K::Number, "1.5e-3"),
                (K::CloseParen, ")"),
                (K::Operator, ">="),
                (K::String, "\"x\\\"y\""),
            ]
        );
    }

    #[test]
    fn test_tokens_cover_the_input() {
        let input = "x := -2e 'é' \"abc";
        let tokens = tokenize(input);
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.span.start, pos);
            pos = token.span.end;
        }
        assert_eq!(pos, input.len());
        assert_eq!(tokens.last().unwrap().kind, K::Unterminated);
    }

    #[test]
    fn test_exponent_needs_digits() {
        assert_eq!(kinds("2e"), vec![(K::Number, "2"), (K::Name, "e")]);
        assert_eq!(kinds(".5E+2"), vec![(K::Number, ".5E+2")]);
    }

    #[test]
    fn test_calculate_depth() {
        assert_eq!(calculate_depth("1 + 2"), Some(0));
        assert_eq!(calculate_depth("sin((1"), Some(2));
        assert_eq!(calculate_depth("max(1, (2))"), Some(0));
        assert_eq!(calculate_depth("1)"), Some(0));
        assert_eq!(calculate_depth("\"(\""), Some(0));
        assert_eq!(calculate_depth("strlen(\"ab"), None);
    }
}
