//! Single-script execution: read a file, run it once through a
//! fresh root scope, print nothing on success beyond whatever the program's
//! own `print`/`println` calls produce, and report a formatted error on
//! failure.

use std::path::Path;

use rill_eval::Evaluator;
use rill_lex::Lexer;
use rill_par::Parser;
use rill_util::Handler;
use tracing::debug;

use crate::diagnostics;
use crate::error::{Result, RillError};

/// Runs the script at `path` to completion. Returns `Ok(())` on success or
/// `Err` with the formatted error ready to print to stderr.
pub fn run_file(path: &Path, no_color: bool) -> Result<()> {
    let _ = no_color; // plumbed through for a future colorized formatter
    let file_name = path.display().to_string();
    let source = std::fs::read_to_string(path)
        .map_err(|e| RillError::FileOperation(format!("failed to read {file_name}: {e}")))?;

    let _span = tracing::debug_span!("run_script", file = %file_name).entered();
    debug!("running script");

    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(&source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    let ast = parser.parse();

    if handler.has_errors() {
        let rendered = diagnostics::format_diagnostics(&source, &file_name, &handler.diagnostics());
        return Err(RillError::Script(rendered));
    }

    let ast = ast.expect("parser reported no errors but produced no AST");
    let scope = Evaluator::root_scope();
    let mut evaluator = Evaluator::new();

    match evaluator.eval(&ast, &scope) {
        Ok(_) => Ok(()),
        Err(err) => {
            let rendered = diagnostics::format_runtime_error(&source, &file_name, &err);
            Err(RillError::Script(rendered))
        }
    }
}
