//! The interactive REPL: reads one line at a time from stdin,
//! evaluates it against a single persistent root scope, and prints the
//! result or a formatted error. Exits cleanly on EOF.

use std::io::{self, BufRead, Write};

use rill_eval::Evaluator;
use rill_lex::Lexer;
use rill_par::Parser;
use rill_util::Handler;
use tracing::trace;

use crate::config::Config;
use crate::diagnostics;

const REPL_FILE_NAME: &str = "<stdin>";

/// Runs the REPL to completion (i.e. until stdin hits EOF).
pub fn run(config: &Config) -> io::Result<()> {
    let scope = Evaluator::root_scope();
    let mut evaluator = Evaluator::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();

    let mut out = stdout.lock();
    let mut err = stderr.lock();

    loop {
        write!(out, "{}", config.prompt)?;
        out.flush()?;

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(out)?;
            break;
        }

        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        trace!(%line, "evaluating repl line");

        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new(line, &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        let ast = parser.parse();

        if handler.has_errors() {
            let rendered =
                diagnostics::format_diagnostics(line, REPL_FILE_NAME, &handler.diagnostics());
            writeln!(err, "{rendered}")?;
            continue;
        }

        let ast = ast.expect("parser reported no errors but produced no AST");
        match evaluator.eval(&ast, &scope) {
            Ok(value) => writeln!(out, "{}", value.stringify())?,
            Err(runtime_err) => {
                let rendered = diagnostics::format_runtime_error(line, REPL_FILE_NAME, &runtime_err);
                writeln!(err, "{rendered}")?;
            }
        }
    }

    Ok(())
}
