//! Integration tests for the `eval` command.

use assert_cmd::Command;
use predicates::prelude::*;

fn xpr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xpr"))
}

#[test]
fn eval_simple_formula() {
    xpr().args(["eval", "1 + 2"]).assert().success().stdout("3\n");
}

#[test]
fn eval_precedence() {
    xpr()
        .args(["eval", "10 * 5 - 3^2"])
        .assert()
        .success()
        .stdout("41\n");
}

#[test]
fn eval_stdlib_functions() {
    xpr()
        .args(["eval", "sum(1, 2, 3) + max(4, -1) + sqrt(16)"])
        .assert()
        .success()
        .stdout("14\n");
}

#[test]
fn eval_string() {
    xpr()
        .args(["eval", r#""ab" + "cd""#])
        .assert()
        .success()
        .stdout("\"abcd\"\n");
}

#[test]
fn eval_comparison() {
    xpr()
        .args(["eval", "1 < 2 and 3 = 4"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn eval_with_variables() {
    xpr()
        .args(["eval", "(1+2*a) * b", "--var", "a=1", "--var", "b=0.5"])
        .assert()
        .success()
        .stdout("1.5\n");
}

#[test]
fn eval_string_variable() {
    xpr()
        .args(["eval", "strlen(name)", "--var", "name=hello"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn eval_malformed_binding() {
    xpr()
        .args(["eval", "1", "--var", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn eval_invalid_variable_name() {
    xpr()
        .args(["--no-color", "eval", "1", "--var", "2x=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid name \"2x\""));
}

#[test]
fn eval_syntax_error() {
    xpr()
        .args(["--no-color", "eval", "(1 + 2"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("[E009] Error: Missing closing parenthesis"));
}

#[test]
fn eval_unknown_token() {
    xpr()
        .args(["--no-color", "eval", "foo + 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unexpected token \"foo\""))
        .stderr(predicate::str::contains("Help:"));
}

#[test]
fn eval_too_many_params() {
    xpr()
        .args(["--no-color", "eval", "sin(8,8)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Too many parameters for function \"sin\" at position 0",
        ));
}

#[test]
fn eval_division_by_zero() {
    xpr()
        .args(["--no-color", "eval", "1/a", "--var", "a=0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Division by zero"));
}

#[test]
fn eval_used_vars() {
    xpr()
        .args(["eval", "a * b + c", "--var", "a=2", "--used-vars"])
        .assert()
        .success()
        .stdout("a = 2\nb (undefined)\nc (undefined)\n");
}

#[test]
fn eval_options_do_not_change_results() {
    for flags in [
        &[][..],
        &["--no-optimizer"][..],
        &["--no-bytecode"][..],
        &["--no-optimizer", "--no-bytecode"][..],
    ] {
        xpr()
            .args(["eval", "-(-a)*2 + avg(a, 3)", "--var", "a=1"])
            .args(flags)
            .assert()
            .success()
            .stdout("4\n");
    }
}

#[test]
fn eval_repeat_reports_timing() {
    xpr()
        .args(["eval", "a^2", "--var", "a=3", "--repeat", "100"])
        .assert()
        .success()
        .stdout("9\n")
        .stderr(predicate::str::contains("100 evaluations"));
}

#[test]
fn eval_repeat_count_is_bounded() {
    xpr()
        .args(["eval", "1", "--repeat", "4294967296"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--repeat"));

    xpr()
        .args(["eval", "1", "--repeat", "4294967295", "--used-vars"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn eval_dump_bytecode() {
    xpr()
        .args(["eval", "a*(2+3)", "--var", "a=2", "--dump-bytecode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VAR"))
        .stdout(predicate::str::contains("VAL     5"))
        .stdout(predicate::str::ends_with("10\n"));
}

#[test]
fn eval_dump_constant() {
    xpr()
        .args(["eval", "2*_pi > 6", "--dump-bytecode"])
        .assert()
        .success()
        .stdout("; constant\n1\n");
}

#[test]
fn eval_missing_argument() {
    xpr()
        .arg("eval")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
