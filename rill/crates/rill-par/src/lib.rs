//! rill-par - the parser.
//!
//! Hand-written recursive descent with Pratt-style precedence climbing for
//! binary operators. The entry point is [`Parser::parse`],
//! which runs `statements(block = false)` and requires the token stream to
//! be exhausted afterward.
//!
//! - [`ast`] - the [`Expr`] node type the parser produces
//! - `expr` - expression grammar: `expr` down through `atom`
//! - `stmt` - `statements`/`statement` and block-vs-inline body parsing
//!
//! Backtracking is bounded to exactly two places: the speculative
//! assignment check in `atom`, and the statement-block recovery loop in
//! `statements`. Both use [`Parser::mark`]/[`Parser::rewind`] rather than
//! general PEG-style backtracking.

pub mod ast;
mod edge_cases;
mod expr;
mod stmt;

pub use ast::{Ast, BinOpKind, Expr, IfCase, UnOpKind};

use rill_lex::{Token, TokenKind, TokenValue};
use rill_util::diagnostic::{DiagnosticBuilder, DiagnosticCode};
use rill_util::{Handler, Span};

/// Combines two spans covering the start and end of a multi-token
/// construct into one span for the whole node. Thin wrapper over
/// [`Span::merge`] kept here so callers don't need to import it.
pub(crate) fn merge_spans(start: Span, end: Span) -> Span {
    start.merge(end)
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    handler: &'a mut Handler,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a mut Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
        }
    }

    /// Parses a complete source file: `statements(block = false)` followed
    /// by a required `EOF`. Returns `None` if any diagnostic was emitted -
    /// no partial AST is ever handed back on error.
    pub fn parse(&mut self) -> Option<Ast> {
        let had_errors_before = self.handler.has_errors();
        let program = self.parse_statements();
        if !self.check(TokenKind::Eof) {
            self.error_expected("end of input");
        }
        if !had_errors_before && self.handler.has_errors() {
            None
        } else if had_errors_before {
            None
        } else {
            Some(program)
        }
    }

    // ----- token stream primitives -----

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub(crate) fn check_keyword(&self, word: &str) -> bool {
        self.current().matches_keyword(word)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        tok
    }

    /// Consumes and returns the current token if it has `kind`, else
    /// reports `InvalidSyntax` naming `expected` and returns `None`.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(expected);
            None
        }
    }

    /// Consumes and returns the current token if it is the keyword `word`,
    /// else reports `InvalidSyntax` and returns `None`.
    pub(crate) fn expect_keyword(&mut self, word: &str) -> Option<Token> {
        if self.check_keyword(word) {
            Some(self.advance())
        } else {
            self.error_expected(&format!("'{word}'"));
            None
        }
    }

    /// If the current token is `IDENT '='`, consumes both and returns the
    /// name; otherwise leaves the cursor untouched. This is the one place
    /// the parser looks two tokens ahead instead of backtracking.
    pub(crate) fn peek_assign_target(&self) -> bool {
        self.check(TokenKind::Identifier)
            && self.tokens[(self.position + 1).min(self.tokens.len() - 1)].kind == TokenKind::Eq
    }

    pub(crate) fn mark(&self) -> usize {
        self.position
    }

    pub(crate) fn rewind(&mut self, mark: usize) {
        self.position = mark;
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    pub(crate) fn ident_symbol(&self, tok: &Token) -> rill_util::Symbol {
        tok.as_symbol().expect("identifier token carries a symbol")
    }

    pub(crate) fn error_expected(&mut self, expected: &str) {
        let tok = self.current();
        let message = format!("Expected {expected}, got {}", describe_token(tok));
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_INVALID_SYNTAX)
            .span(tok.span)
            .emit(self.handler);
    }

    pub(crate) fn error_at(&mut self, span: Span, message: impl Into<String>) {
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_INVALID_SYNTAX)
            .span(span)
            .emit(self.handler);
    }
}

fn describe_token(tok: &Token) -> String {
    match &tok.value {
        TokenValue::Keyword(s) => format!("keyword '{}'", s.as_str()),
        TokenValue::Ident(s) => format!("identifier '{}'", s.as_str()),
        TokenValue::Int(n) => format!("integer '{n}'"),
        TokenValue::Float(n) => format!("float '{n}'"),
        TokenValue::Str(_) => "string literal".to_string(),
        TokenValue::None => tok.kind.to_string(),
    }
}
