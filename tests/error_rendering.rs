//! Rendering of engine errors through the public `xpr` API.

use pretty_assertions::assert_eq;
use xpr::{CharSet, Engine, ErrorCode, ParserError, RenderConfig, Variable, render_error_to};

const PLAIN: RenderConfig = RenderConfig {
    color: false,
    filename: Some("calc.xpr"),
    charset: CharSet::Ascii,
};

fn render(error: &ParserError) -> String {
    let mut buf = Vec::new();
    render_error_to(error, &mut buf, &PLAIN).unwrap();
    String::from_utf8(buf).unwrap()
}

fn compile_error(formula: &str) -> ParserError {
    let mut engine = Engine::default();
    engine.set_formula(formula);
    engine.calc().unwrap_err()
}

#[test]
fn test_registration_errors_render_one_line() {
    let mut engine = Engine::default();
    let err = engine.define_var("or", Variable::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidName);
    assert_eq!(render(&err), "[E013] Error: Invalid name \"or\"\n");

    let err = engine.define_const("sin", 1.0).unwrap_err();
    assert_eq!(
        render(&err),
        "[E014] Error: Name conflict: \"sin\" is already defined\n"
    );
}

#[test]
fn test_runtime_errors_render_one_line() {
    let d = Variable::new(1.0);
    let mut engine = Engine::default();
    engine.define_var("d", d.clone()).unwrap();
    engine.set_formula("sum(1, 2) / d");
    engine.calc().unwrap();

    d.set(0.0);
    let err = engine.calc().unwrap_err();
    assert_eq!(err.pos(), None);
    assert_eq!(render(&err), "[E017] Error: Division by zero\n");
}

#[test]
fn test_located_errors_name_the_file_and_line() {
    let cases = [
        ("1 + sin(1, 2)", "[E011]", "calc.xpr:1:5"),
        ("(1 + 2", "[E009]", "calc.xpr:1:7"),
        ("1 + \"abc", "[E010]", "calc.xpr:1:5"),
    ];
    for (formula, code, location) in cases {
        let output = render(&compile_error(formula));
        let header: Vec<&str> = output.lines().take(2).collect();
        assert_eq!(
            (
                header[0].starts_with(&format!("{code} Error:")),
                header[1].contains(location),
            ),
            (true, true),
            "{formula}:\n{output}"
        );
        assert!(output.contains(formula), "{output}");
    }
}
