//! Error rendering using ariadne
//!
//! Formula errors that carry a position are rendered as a report pointing
//! at the offending token. Registration and evaluation errors have no
//! position and render as a single line.

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;
use xpr_core::{ErrorCode, ParserError};

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Use Unicode characters for rich visual output.
    #[default]
    Unicode,
    /// Use ASCII-only characters for compatibility.
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The name shown in the report header. Defaults to `<formula>`.
    pub filename: Option<&'a str>,
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Render an error to stderr using the default config.
///
/// # Example
/// ```no_run
/// use xpr::{Engine, render_error};
///
/// let mut engine = Engine::default();
/// engine.set_formula("1 + * 2");
/// if let Err(e) = engine.calc() {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &ParserError) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render an error to a writer with the given configuration.
///
/// # Example
/// ```
/// use xpr::{Engine, RenderConfig, render_error_to};
///
/// let mut engine = Engine::default();
/// engine.set_formula("(1 + 2");
/// let err = engine.calc().unwrap_err();
///
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, &mut buf, &config).unwrap();
/// assert!(String::from_utf8_lossy(&buf).contains("Missing closing parenthesis"));
/// ```
pub fn render_error_to(
    error: &ParserError,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let code = code_label(error.code());
    let source = error.formula();

    let Some(pos) = error.pos().filter(|_| !source.is_empty()) else {
        writeln!(writer, "[{code}] Error: {}", error.message())?;
        if let Some(help) = help(error.code()) {
            writeln!(writer, "Help: {help}")?;
        }
        return Ok(());
    };

    let filename = config.filename.unwrap_or("<formula>");
    let span = char_span(source, pos, error.token());

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let charset = match config.charset {
        CharSet::Unicode => ariadne::CharSet::Unicode,
        CharSet::Ascii => ariadne::CharSet::Ascii,
    };
    let ariadne_config = ariadne::Config::default()
        .with_color(config.color)
        .with_char_set(charset);

    let mut report = Report::build(ReportKind::Error, (filename, span.clone()))
        .with_message(error.message())
        .with_code(code)
        .with_config(ariadne_config)
        .with_label(
            Label::new((filename, span))
                .with_message(error.message())
                .with_color(colors.next()),
        );
    if let Some(help) = help(error.code()) {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((filename, Source::from(source)), &mut *writer)
}

fn code_label(code: ErrorCode) -> String {
    format!("E{:03}", code.as_i32())
}

/// Span of the token in characters. Positions are byte offsets.
fn char_span(source: &str, pos: usize, token: &str) -> std::ops::Range<usize> {
    let pos = pos.min(source.len());
    let start = source
        .char_indices()
        .take_while(|(i, _)| *i < pos)
        .count();
    let len = if pos < source.len() {
        token.chars().count().max(1)
    } else {
        0
    };
    start..start + len
}

fn help(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::UnassignableToken => {
            Some("Define it as a variable, constant or function before use")
        }
        ErrorCode::MissingParens => Some("Add the missing `)`"),
        ErrorCode::UnterminatedString => Some("Close the string with `\"`"),
        ErrorCode::TooManyParams | ErrorCode::TooFewParams => {
            Some("Check the number of arguments the function takes")
        }
        ErrorCode::UnexpectedComma => Some("Commas only separate function arguments"),
        ErrorCode::FormulaTooComplex => Some("Split the formula or reduce its nesting"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;
    use expect_test::{Expect, expect};

    const UNICODE_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.xpr"),
        charset: CharSet::Unicode,
    };

    const ASCII_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.xpr"),
        charset: CharSet::Ascii,
    };

    fn render_error_string(source: &str, config: &RenderConfig) -> String {
        let mut engine = Engine::default();
        engine.set_formula(source);
        match engine.calc() {
            Err(e) => {
                let mut buf = Vec::new();
                render_error_to(&e, &mut buf, config).unwrap();
                String::from_utf8_lossy(&buf).into_owned()
            }
            Ok(value) => panic!("Expected an error for {source}, got {value}"),
        }
    }

    fn check_error(source: &str, config: &RenderConfig, expected: Expect) {
        let output = render_error_string(source, config);
        expected.assert_eq(&output);
    }

    #[test]
    fn test_unknown_identifier_unicode() {
        check_error(
            "foo + 1",
            &UNICODE_CONFIG,
            expect![[r#"
                [E001] Error: Unexpected token "foo" found at position 0
                   ╭─[ test.xpr:1:1 ]
                   │
                 1 │ foo + 1
                   │ ─┬─  
                   │  ╰─── Unexpected token "foo" found at position 0
                   │ 
                   │ Help: Define it as a variable, constant or function before use
                ───╯
            "#]],
        );
    }

    #[test]
    fn test_unknown_identifier_ascii() {
        check_error(
            "foo + 1",
            &ASCII_CONFIG,
            expect![[r#"
                [E001] Error: Unexpected token "foo" found at position 0
                   ,-[ test.xpr:1:1 ]
                   |
                 1 | foo + 1
                   | ^|^  
                   |  `--- Unexpected token "foo" found at position 0
                   | 
                   | Help: Define it as a variable, constant or function before use
                ---'
            "#]],
        );
    }

    #[test]
    fn test_errors_without_position_render_one_line() {
        let output = render_error_string("1/0", &UNICODE_CONFIG);
        assert!(output.contains("Division by zero"), "{output}");

        let mut engine = Engine::default();
        let err = engine.define_const("9lives", 9.0).unwrap_err();
        let mut buf = Vec::new();
        render_error_to(&err, &mut buf, &UNICODE_CONFIG).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[E013] Error: Invalid name \"9lives\"\n"
        );
    }

    #[test]
    fn test_char_span() {
        assert_eq!(char_span("foo + 1", 0, "foo"), 0..3);
        assert_eq!(char_span("(1+", 3, ""), 3..3);
        assert_eq!(char_span("\"é\" + x", 7, "x"), 6..7);
    }

    #[test]
    fn test_charset_default_is_unicode() {
        assert_eq!(RenderConfig::default().charset, CharSet::Unicode);
    }
}
