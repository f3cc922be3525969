//! End-to-end tests for the `rill` binary, covering the seed scenarios:
//! arithmetic precedence, variables/branching, a for-loop factorial,
//! recursion, break-inside-a-function, and division by zero.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn rill() -> Command {
    Command::cargo_bin("rill").expect("rill binary should build")
}

fn script_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp script file");
    file.write_all(source.as_bytes()).expect("write script source");
    file
}

#[test]
fn repl_evaluates_arithmetic_with_correct_precedence() {
    rill()
        .write_stdin("(-1 + 2 ^ 3) ^ 2 * 13 / (24 - 5.8)\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("35.00"));
}

#[test]
fn repl_evaluates_variables_and_if_else() {
    rill()
        .write_stdin("a = 5\nif a > 3 then b = a * 2 else b = 0\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));
}

#[test]
fn script_runs_for_loop_factorial() {
    let file = script_file(
        r#"
        res = 1
        for i = 1 to 6 then
            res = res * i
        end
        print(res)
        "#,
    );

    rill()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("120"));
}

#[test]
fn script_runs_recursive_fibonacci() {
    let file = script_file(
        r#"
        fun fib(n)
            if n <= 1 then
                return n
            end
            return fib(n - 1) + fib(n - 2)
        end
        print(fib(10))
        "#,
    );

    rill()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("55"));
}

#[test]
fn script_breaks_out_of_for_loop_inside_function() {
    let file = script_file(
        r#"
        fun build_list()
            result = []
            for i = 1 to 11 then
                if i == 6 then
                    break
                end
                result = result + i
            end
            return result
        end
        xs = build_list()
        print(len(xs))
        "#,
    );

    rill()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));
}

#[test]
fn script_reports_division_by_zero_as_runtime_error() {
    let file = script_file("13 / (5 - 5)\n");

    rill()
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Division by zero"));
}

#[test]
fn script_run_shares_global_scope_with_caller() {
    let lib = script_file("shared = 42\n");
    let lib_path = lib.path().to_string_lossy().replace('\\', "\\\\");
    let main = script_file(&format!(
        r#"
        run("{lib_path}")
        print(shared)
        "#
    ));

    rill()
        .arg(main.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn running_a_missing_script_reports_file_operation_error() {
    rill()
        .arg("/nonexistent/path/to/script.rill")
        .assert()
        .failure();
}
