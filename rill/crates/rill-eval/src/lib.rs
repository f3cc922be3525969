//! rill-eval - the tree-walking evaluator.
//!
//! Turns a parsed [`rill_par::Ast`] into a [`Value`] by walking it with an
//! [`Evaluator`]. The three submodules mirror the language's own layers:
//!
//! - [`value`] - the runtime `Value`/`Number`/`MapKey` types and their typed
//!   operations
//! - [`scope`] - the variable scope chain
//! - [`evaluator`] - the visitor itself, plus non-local control flow
//!
//! - [`builtins`] - the built-in function table installed into every root
//!   scope
//!
//! [`eval_source`] wires lexing, parsing, and evaluation together for
//! callers that just want to run a whole program - the `rillc` host and the
//! `run` built-in both use it.

pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod scope;
pub mod value;

pub use error::{EvalResult, Frame, RuntimeError};
pub use evaluator::Evaluator;
pub use scope::{Scope, ScopeRef};
pub use value::{FunctionValue, MapKey, Number, Value};

use rill_lex::Lexer;
use rill_par::Parser;
use rill_util::Handler;

/// Lexes, parses, and evaluates a complete source string in a fresh root
/// scope. Returns the value the program's last statement produced, or a
/// single formatted error message - syntax errors are joined one per line,
/// a runtime error is just its message (the caller is expected to print the
/// traceback separately from `RuntimeError`'s `traceback` field where
/// available).
pub fn eval_source(source: &str) -> Result<Value, String> {
    let scope = Evaluator::root_scope();
    eval_in_scope(source, &scope)
}

/// Lexes, parses, and evaluates a complete source string against an
/// existing scope rather than a fresh one. Used by the `run` built-in so a
/// sibling script's top-level definitions land in the caller's global scope
/// instead of a throwaway one.
pub fn eval_in_scope(source: &str, scope: &ScopeRef) -> Result<Value, String> {
    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    let ast = parser.parse();

    if handler.has_errors() {
        let messages: Vec<String> = handler
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect();
        return Err(messages.join("\n"));
    }

    let ast = ast.expect("parser reported no errors but produced no AST");
    let mut evaluator = Evaluator::new();
    evaluator.eval(&ast, scope).map_err(|e| e.message.clone())
}
