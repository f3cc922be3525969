//! The built-in function table and root-scope constants.

use crate::error::RuntimeError;
use crate::evaluator::Evaluator;
use crate::scope::ScopeRef;
use crate::value::{BuiltInFunction, Value};
use rill_util::{Span, Symbol};
use std::io::Write;
use std::rc::Rc;

/// Populates a fresh root scope with `null`/`true`/`false` and every
/// built-in function, mirroring the interpreter's global namespace setup.
pub fn install(scope: &ScopeRef) {
    let mut scope = scope.borrow_mut();
    scope.set(Symbol::intern("null"), Value::Null);
    scope.set(Symbol::intern("true"), Value::int(1));
    scope.set(Symbol::intern("false"), Value::int(0));

    register(&mut scope, "len", 1, builtin_len);
    register(&mut scope, "type", 1, builtin_type);
    register(&mut scope, "print", 1, builtin_print);
    register(&mut scope, "println", 1, builtin_println);
    register(&mut scope, "input", 0, builtin_input);
    register(&mut scope, "input_number", 0, builtin_input_number);
    register(&mut scope, "is_number", 1, builtin_is_number);
    register(&mut scope, "is_string", 1, builtin_is_string);
    register(&mut scope, "is_list", 1, builtin_is_list);
    register(&mut scope, "is_function", 1, builtin_is_function);
    register(&mut scope, "run", 1, builtin_run);
    register(&mut scope, "run_shell", 1, builtin_run_shell);
}

fn register(
    scope: &mut crate::scope::Scope,
    name: &'static str,
    arity: usize,
    callback: crate::value::BuiltInCallback,
) {
    scope.set(
        Symbol::intern(name),
        Value::BuiltIn(Rc::new(BuiltInFunction { name, arity, callback })),
    );
}

fn builtin_len(_eval: &mut Evaluator, _scope: &ScopeRef, mut args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
    match args.remove(0) {
        Value::String(s) => Ok(Value::int(s.chars().count() as i64)),
        Value::List(l) => Ok(Value::int(l.borrow().len() as i64)),
        Value::Map(m) => Ok(Value::int(m.borrow().len() as i64)),
        other => Err(RuntimeError::new(
            format!("'len' is not supported for {}", other.type_name()),
            span,
        )),
    }
}

fn builtin_type(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    Ok(Value::string(args[0].type_name()))
}

fn builtin_print(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    print!("{}", args[0].stringify());
    let _ = std::io::stdout().flush();
    Ok(Value::Null)
}

fn builtin_println(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    println!("{}", args[0].stringify());
    Ok(Value::Null)
}

fn builtin_input(_eval: &mut Evaluator, _scope: &ScopeRef, _args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| RuntimeError::new(format!("Failed to read input: {e}"), span))?;
    Ok(Value::string(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn builtin_input_number(_eval: &mut Evaluator, _scope: &ScopeRef, _args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| RuntimeError::new(format!("Failed to read input: {e}"), span))?;
    let trimmed = line.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Value::int(n));
    }
    trimmed
        .parse::<f64>()
        .map(Value::float)
        .map_err(|_| RuntimeError::new("Expected a number", span))
}

fn builtin_is_number(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    Ok(Value::int(matches!(args[0], Value::Number(_)) as i64))
}

fn builtin_is_string(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    Ok(Value::int(matches!(args[0], Value::String(_)) as i64))
}

fn builtin_is_list(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    Ok(Value::int(matches!(args[0], Value::List(_)) as i64))
}

fn builtin_is_function(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, _span: Span) -> Result<Value, RuntimeError> {
    Ok(Value::int(matches!(args[0], Value::Function(_) | Value::BuiltIn(_)) as i64))
}

/// Reentrantly lexes, parses, and evaluates another source file against the
/// caller's own global scope - the sibling-script equivalent of a shell
/// `source`, so a run script's top-level definitions persist back into the
/// caller instead of vanishing with a throwaway scope.
fn builtin_run(_eval: &mut Evaluator, scope: &ScopeRef, args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
    let path = match &args[0] {
        Value::String(s) => s.to_string(),
        other => {
            return Err(RuntimeError::new(
                format!("'run' expects a string path, got {}", other.type_name()),
                span,
            ))
        }
    };

    let source = std::fs::read_to_string(&path)
        .map_err(|e| RuntimeError::new(format!("Failed to run script '{path}': {e}"), span))?;

    let global = crate::scope::Scope::global_of(scope);
    crate::eval_in_scope(&source, &global).map_err(|e| RuntimeError::new(e, span))
}

/// Runs a shell command and returns its captured stdout. A nonzero exit
/// code and output written to stderr are two distinct `Runtime` errors,
/// since either one alone does not necessarily mean the other happened.
fn builtin_run_shell(_eval: &mut Evaluator, _scope: &ScopeRef, args: Vec<Value>, span: Span) -> Result<Value, RuntimeError> {
    let command = match &args[0] {
        Value::String(s) => s.to_string(),
        other => {
            return Err(RuntimeError::new(
                format!("'run_shell' expects a string command, got {}", other.type_name()),
                span,
            ))
        }
    };

    let output = std::process::Command::new("sh")
        .arg("-c")
        .arg(&command)
        .output()
        .map_err(|e| RuntimeError::new(format!("Failed to spawn shell command: {e}"), span))?;

    if !output.status.success() {
        return Err(RuntimeError::new(
            format!(
                "Shell command exited with status {}",
                output.status.code().unwrap_or(-1)
            ),
            span,
        ));
    }
    if !output.stderr.is_empty() {
        return Err(RuntimeError::new(
            format!("Shell command wrote to stderr: {}", String::from_utf8_lossy(&output.stderr)),
            span,
        ));
    }

    Ok(Value::string(String::from_utf8_lossy(&output.stdout).trim_end().to_string()))
}
