//! Statement sequencing and the block-vs-inline control constructs:
//! `statements`, `if`, `for`, `while`, `fun`.

use crate::ast::{Expr, IfCase};
use crate::Parser;
use rill_lex::TokenKind;

impl<'a> Parser<'a> {
    /// `NEWLINE* statement (NEWLINE+ statement)* NEWLINE*`, collected into a
    /// single `List(is_block_statements = true)`. Stops at `EOF`, `end`,
    /// `elif`, or `else` without consuming them - the caller decides what
    /// comes next.
    pub(crate) fn parse_statements(&mut self) -> Expr {
        let start_span = self.current().span;
        let mut elements = Vec::new();

        self.skip_newlines();

        if !self.at_statements_end() {
            elements.push(self.parse_expr());
        }

        loop {
            if !self.check(TokenKind::Newline) {
                break;
            }
            self.skip_newlines();
            if self.at_statements_end() {
                break;
            }
            elements.push(self.parse_expr());
        }

        let end_span = elements.last().map(|e| e.span()).unwrap_or(start_span);
        Expr::List {
            elements,
            is_block_statements: true,
            span: start_span.merge(end_span),
        }
    }

    fn at_statements_end(&self) -> bool {
        self.is_at_end()
            || self.check_keyword("end")
            || self.check_keyword("elif")
            || self.check_keyword("else")
    }

    /// The body following `then`/`while cond then`/`for ... then`: a block
    /// (if the next token is a `NEWLINE`) or a single inline statement.
    /// Returns the body and whether it was a block, so the caller knows
    /// whether to expect a matching `end`.
    fn parse_branch_body(&mut self) -> (Expr, bool) {
        if self.check(TokenKind::Newline) {
            self.advance();
            let body = self.parse_statements();
            (body, true)
        } else {
            (self.parse_expr(), false)
        }
    }

    /// `if expr then body (elif expr then body)* (else body)? end?` - `end`
    /// is required only if at least one branch used the block form, since
    /// `parse_statements` for a block body stops right before it.
    pub(crate) fn parse_if_expr(&mut self) -> Expr {
        let start = self.advance(); // 'if'

        let mut cases = Vec::new();
        let mut needs_end = false;
        let mut last_span = start.span;

        let cond = self.parse_expr();
        self.expect_keyword("then");
        let (body, is_block) = self.parse_branch_body();
        needs_end |= is_block;
        last_span = last_span.merge(body.span());
        cases.push(IfCase { cond, body });

        while self.check_keyword("elif") {
            self.advance();
            let cond = self.parse_expr();
            self.expect_keyword("then");
            let (body, is_block) = self.parse_branch_body();
            needs_end |= is_block;
            last_span = last_span.merge(body.span());
            cases.push(IfCase { cond, body });
        }

        let mut else_body = None;
        if self.check_keyword("else") {
            self.advance();
            let (body, is_block) = self.parse_branch_body();
            needs_end |= is_block;
            last_span = last_span.merge(body.span());
            else_body = Some(Box::new(body));
        }

        if needs_end {
            if let Some(tok) = self.expect_keyword("end") {
                last_span = last_span.merge(tok.span);
            }
        }

        Expr::If {
            cases,
            else_body,
            span: start.span.merge(last_span),
        }
    }

    /// `for IDENT '=' expr 'to' expr ('step' expr)? 'then' body end?`
    pub(crate) fn parse_for_expr(&mut self) -> Expr {
        let start = self.advance(); // 'for'

        let var_tok = self.expect(TokenKind::Identifier, "identifier");
        let var_name = var_tok
            .as_ref()
            .and_then(|t| t.as_symbol())
            .unwrap_or_else(|| rill_util::Symbol::intern(""));

        self.expect(TokenKind::Eq, "'='");
        let start_expr = self.parse_expr();
        self.expect_keyword("to");
        let end_expr = self.parse_expr();

        let step = if self.check_keyword("step") {
            self.advance();
            Some(Box::new(self.parse_expr()))
        } else {
            None
        };

        self.expect_keyword("then");
        let (body, is_block) = self.parse_branch_body();
        let mut last_span = body.span();
        if is_block {
            if let Some(tok) = self.expect_keyword("end") {
                last_span = last_span.merge(tok.span);
            }
        }

        Expr::For {
            var_name,
            start: Box::new(start_expr),
            end: Box::new(end_expr),
            step,
            body: Box::new(body),
            is_block,
            span: start.span.merge(last_span),
        }
    }

    /// `while expr 'then' body end?`
    pub(crate) fn parse_while_expr(&mut self) -> Expr {
        let start = self.advance(); // 'while'

        let cond = self.parse_expr();
        self.expect_keyword("then");
        let (body, is_block) = self.parse_branch_body();
        let mut last_span = body.span();
        if is_block {
            if let Some(tok) = self.expect_keyword("end") {
                last_span = last_span.merge(tok.span);
            }
        }

        Expr::While {
            cond: Box::new(cond),
            body: Box::new(body),
            is_block,
            span: start.span.merge(last_span),
        }
    }

    /// `fun IDENT? '(' (IDENT (',' IDENT)*)? ')' ('->' expr | NEWLINE statements end)`
    pub(crate) fn parse_func_def(&mut self) -> Expr {
        let start = self.advance(); // 'fun'

        let name = if self.check(TokenKind::Identifier) {
            let tok = self.advance();
            tok.as_symbol()
        } else {
            None
        };

        self.expect(TokenKind::LParen, "'('");
        let mut arg_names = Vec::new();
        if !self.check(TokenKind::RParen) {
            if let Some(tok) = self.expect(TokenKind::Identifier, "identifier") {
                arg_names.push(self.ident_symbol(&tok));
            }
            while self.check(TokenKind::Comma) {
                self.advance();
                if let Some(tok) = self.expect(TokenKind::Identifier, "identifier") {
                    arg_names.push(self.ident_symbol(&tok));
                }
            }
        }
        self.expect(TokenKind::RParen, "')'");

        let mut last_span = self.current().span;
        let body = if self.check(TokenKind::Arrow) {
            self.advance();
            let expr = self.parse_expr();
            last_span = expr.span();
            expr
        } else if self.check(TokenKind::Newline) {
            self.advance();
            let body = self.parse_statements();
            last_span = body.span();
            if let Some(tok) = self.expect_keyword("end") {
                last_span = tok.span;
            }
            body
        } else {
            self.error_expected("'->' or a newline");
            Expr::Int(0, self.current().span)
        };

        Expr::FuncDef {
            name,
            arg_names,
            body: Box::new(body),
            span: start.span.merge(last_span),
        }
    }
}
