//! Renders lexer/parser diagnostics and evaluator runtime errors in the
//! language's error output format:
//!
//! ```text
//! <Kind>: <details>
//! File <F>, line <L>, col <C>
//!
//! <source line>
//! <caret underline>
//! ```
//!
//! Runtime errors are preceded by a `Traceback (most recent call last):`
//! block, one `  File F, line L, in <name>` line per call frame, innermost
//! last.

use rill_eval::RuntimeError;
use rill_util::diagnostic::Diagnostic;
use rill_util::Span;

fn source_line(source: &str, line_number: u32) -> &str {
    source
        .lines()
        .nth(line_number.saturating_sub(1) as usize)
        .unwrap_or("")
}

fn caret_underline(span: Span, line_text: &str) -> String {
    let column = span.column.max(1) as usize;
    let width = (span.end.saturating_sub(span.start)).max(1);
    let indent = " ".repeat(column.saturating_sub(1).min(line_text.len()));
    format!("{indent}{}", "^".repeat(width))
}

fn format_block(kind: &str, message: &str, file_name: &str, source: &str, span: Span) -> String {
    let line_text = source_line(source, span.line);
    format!(
        "{kind}: {message}\nFile {file_name}, line {line}, col {col}\n\n{line_text}\n{caret}",
        line = span.line,
        col = span.column,
        caret = caret_underline(span, line_text),
    )
}

/// Formats every diagnostic the lexer/parser collected for one source file.
/// Parsing stops at the first error, producing no partial AST, but the
/// lexer may still have accumulated more than one, so this joins them all.
pub fn format_diagnostics(source: &str, file_name: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format_block("SyntaxError", &d.message, file_name, source, d.span))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Formats a single runtime error, with its traceback block first.
pub fn format_runtime_error(source: &str, file_name: &str, err: &RuntimeError) -> String {
    let mut out = String::new();
    if !err.traceback.is_empty() {
        out.push_str("Traceback (most recent call last):\n");
        for frame in &err.traceback {
            out.push_str(&format!(
                "  File {file_name}, line {}, in {}\n",
                frame.span.line, frame.name
            ));
        }
    }
    out.push_str(&format_block("Runtime", &err.message, file_name, source, err.span));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_util::diagnostic::{DiagnosticBuilder, Level};

    #[test]
    fn test_format_diagnostics_contains_kind_and_location() {
        let span = Span::new(0, 1, 1, 1);
        let diag = DiagnosticBuilder::new(Level::Error, "unexpected token")
            .span(span)
            .build();
        let out = format_diagnostics("a b", "script.rill", std::slice::from_ref(&diag));
        assert!(out.contains("SyntaxError: unexpected token"));
        assert!(out.contains("File script.rill, line 1, col 1"));
        assert!(out.contains("a b"));
        assert!(out.contains('^'));
    }

    #[test]
    fn test_format_runtime_error_without_traceback() {
        let span = Span::new(0, 1, 1, 1);
        let err = RuntimeError::new("Division by zero", span);
        let out = format_runtime_error("13 / 0", "script.rill", &err);
        assert!(!out.contains("Traceback"));
        assert!(out.contains("Runtime: Division by zero"));
    }

    #[test]
    fn test_format_runtime_error_with_traceback() {
        let span = Span::new(0, 1, 3, 5);
        let err = RuntimeError::new("Division by zero", span)
            .with_frame(rill_eval::Frame { name: "f".to_string(), span });
        let out = format_runtime_error("body", "script.rill", &err);
        assert!(out.starts_with("Traceback (most recent call last):\n"));
        assert!(out.contains("in f"));
    }
}
