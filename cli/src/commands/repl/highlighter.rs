//! Syntax highlighter for the REPL.

use std::collections::BTreeSet;

use nu_ansi_term::{Color, Style};
use reedline::StyledText;

use super::lexer::{TokenKind, tokenize};

fn style_of(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Number => Style::new().fg(Color::Cyan),
        TokenKind::String => Style::new().fg(Color::Green),
        TokenKind::Unterminated => Style::new().fg(Color::Green).italic(),
        TokenKind::Name => Style::new().fg(Color::Red),
        TokenKind::Function => Style::new().fg(Color::Blue),
        TokenKind::Operator => Style::new().fg(Color::Magenta),
        TokenKind::OpenParen | TokenKind::CloseParen | TokenKind::Comma | TokenKind::Blank => {
            Style::new().fg(Color::White)
        }
    }
}

fn error_style() -> Style {
    Style::new()
        .fg(Color::White)
        .on(Color::Rgb(0x80, 0x22, 0x3e))
}

/// Highlights a line by token class. Calls to functions the engine does not
/// know are marked as errors.
pub struct Highlighter {
    functions: BTreeSet<String>,
}

impl Highlighter {
    pub fn new(functions: impl IntoIterator<Item = String>) -> Self {
        Self {
            functions: functions.into_iter().collect(),
        }
    }
}

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();
        for token in tokenize(line) {
            let text = &line[token.span];
            let style = match token.kind {
                TokenKind::Function if !self.functions.contains(text) => error_style(),
                kind => style_of(kind),
            };
            output.push((style, text.to_string()));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::Highlighter as _;

    #[test]
    fn test_highlight_covers_the_line() {
        let highlighter = Highlighter::new(["sin".to_string()]);
        let line = "sin(a) + cos(1)";
        let styled = highlighter.highlight(line, 0);
        let text: String = styled.buffer.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(text, line);

        let style_for = |word: &str| {
            styled
                .buffer
                .iter()
                .find(|(_, s)| s == word)
                .map(|(style, _)| *style)
                .unwrap()
        };
        assert_eq!(style_for("sin"), style_of(TokenKind::Function));
        assert_eq!(style_for("cos"), error_style());
    }
}
