//! The `repl` command - interactive REPL.
//!
//! Each line is a formula to evaluate, or a binding `name := formula` that
//! evaluates the formula and stores the result in the variable `name`.
//! Variables keep their storage across lines, so a rebinding is seen by
//! every later formula.

pub mod highlighter;
pub mod lexer;

use nu_ansi_term::Style;
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    FileBackedHistory, IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, ValidationResult, default_emacs_keybindings,
};
use xpr::{Engine, Value};

use crate::cli::ReplArgs;
use crate::common::engine::{bind_var, build_engine, format_value};
use crate::common::{CliResult, error};
use highlighter::Highlighter;
use lexer::calculate_depth;

/// A `reedline` validator that keeps reading while parentheses are open or
/// a string literal is unterminated.
///
/// Other syntax errors are left for the engine to report.
///
/// # Manual Newlines
///
/// Users can press `Alt + Enter` to insert a newline manually. A newline
/// ends the formula, so anything after it is ignored.
struct XprValidator;

impl reedline::Validator for XprValidator {
    fn validate(&self, input: &str) -> ValidationResult {
        match calculate_depth(input) {
            Some(0) => ValidationResult::Complete,
            _ => ValidationResult::Incomplete,
        }
    }
}

/// What a successfully interpreted line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Bound { name: String, value: Value },
}

/// Interpret one line of input against `engine`. Blank lines produce nothing.
pub fn interpret_line(engine: &mut Engine, line: &str) -> CliResult<Option<Outcome>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, formula) = match line.split_once(":=") {
        Some((name, formula)) => (Some(name.trim()), formula),
        None => (None, line),
    };

    engine.set_formula(formula);
    let value = engine.calc()?;

    let Some(name) = name else {
        return Ok(Some(Outcome::Value(value)));
    };
    bind_var(engine, name, value.clone())?;
    tracing::debug!(name, value = %value, "Bound variable");
    Ok(Some(Outcome::Bound {
        name: name.to_string(),
        value,
    }))
}

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(engine: &Engine) -> (Reedline, DefaultPrompt) {
    let functions: Vec<String> = engine.functions().keys().cloned().collect();
    let words: Vec<String> = functions
        .iter()
        .chain(engine.constants().keys())
        .cloned()
        .collect();

    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&['_']);
        completions.insert(words);
        completions
    });

    // Use the interactive menu to select options from the completer
    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);
    let edit_mode = Box::new(Emacs::new(keybindings));

    let history: Box<dyn reedline::History> = match dirs::config_dir()
        .map(|p| p.join("xpr/history"))
        .and_then(|p| FileBackedHistory::with_file(10000, p).ok())
    {
        Some(h) => Box::new(h),
        None => {
            tracing::warn!("Could not initialize history file, using in-memory history");
            Box::new(FileBackedHistory::default())
        }
    };

    let line_editor = Reedline::create()
        .with_highlighter(Box::new(Highlighter::new(functions)))
        .with_history(history)
        .with_validator(Box::new(XprValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(edit_mode);

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("  ".into()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

/// Run the REPL command.
pub fn run(args: ReplArgs, no_color: bool) -> std::io::Result<()> {
    let mut engine = build_engine(args.engine);
    let (mut line_editor, prompt) = setup_reedline(&engine);

    let style = Style::new().dimmed();
    println!(
        "xpr REPL. {}",
        style.paint("`name := formula` binds a variable; Ctrl+D to exit")
    );

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => match interpret_line(&mut engine, &buffer) {
                Ok(Some(Outcome::Value(value))) => println!("{}", format_value(&value)),
                Ok(Some(Outcome::Bound { name, value })) => {
                    println!("{name} = {}", format_value(&value))
                }
                Ok(None) => {}
                Err(e) => error::render(&e, no_color),
            },
            Signal::CtrlD => {
                println!("\nGoodbye!");
                return Ok(());
            }
            Signal::CtrlC => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EngineArgs;
    use pretty_assertions::assert_eq;
    use reedline::Validator;
    use xpr::ErrorCode;

    fn session(lines: &[&str]) -> Vec<CliResult<Option<Outcome>>> {
        let mut engine = build_engine(EngineArgs::default());
        lines
            .iter()
            .map(|line| interpret_line(&mut engine, line))
            .collect()
    }

    #[test]
    fn test_bindings_are_visible_to_later_lines() {
        let results = session(&["a := 2", "b := a * 3", "a + b", "a := 10", "a + b"]);
        let outcomes: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            outcomes,
            vec![
                Some(Outcome::Bound {
                    name: "a".to_string(),
                    value: Value::float(2.0)
                }),
                Some(Outcome::Bound {
                    name: "b".to_string(),
                    value: Value::float(6.0)
                }),
                Some(Outcome::Value(Value::float(8.0))),
                Some(Outcome::Bound {
                    name: "a".to_string(),
                    value: Value::float(10.0)
                }),
                Some(Outcome::Value(Value::float(16.0))),
            ]
        );
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let results = session(&["", "1 +", "x", "x := 1", "x"]);
        assert_eq!(results[0], Ok(None));
        assert_eq!(
            results[1].as_ref().unwrap_err().code(),
            ErrorCode::UnexpectedEof
        );
        assert_eq!(
            results[2].as_ref().unwrap_err().code(),
            ErrorCode::UnassignableToken
        );
        assert_eq!(results[4], Ok(Some(Outcome::Value(Value::float(1.0)))));
    }

    #[test]
    fn test_invalid_binding_name() {
        let results = session(&["2x := 1"]);
        assert_eq!(
            results[0].as_ref().unwrap_err().code(),
            ErrorCode::InvalidName
        );
    }

    #[test]
    fn test_validator() {
        let validator = XprValidator;
        assert!(matches!(
            validator.validate("sin(1"),
            ValidationResult::Incomplete
        ));
        assert!(matches!(
            validator.validate("\"abc"),
            ValidationResult::Incomplete
        ));
        assert!(matches!(
            validator.validate("1 + )"),
            ValidationResult::Complete
        ));
    }
}
