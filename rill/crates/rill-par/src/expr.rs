//! Expression grammar: `expr` down through `atom`.
//!
//! ```text
//! expr     := IDENT '=' expr
//!           | compare (('and' | 'or') compare)*
//! compare  := 'not' compare | arith (cmp_op arith)*
//! arith    := term (('+' | '-') term)*
//! term     := factor (('*' | '/') factor)*
//! factor   := ('+' | '-') factor | power
//! power    := call ('^' factor)*
//! call     := atom ('(' args? ')')?
//! atom     := INT | FLOAT | STRING
//!           | IDENT ('[' expr ']' ('=' expr)?)?
//!           | '(' expr ')' | list | map
//!           | if_expr | for_expr | while_expr | fun_def
//! ```
//!
//! `^` binds tighter than unary minus on its left but is right-associative
//! and allows another unary/power expression on its right, so `-2^2` is
//! `-(2^2)` and `2^-2` is `2^(-2)`. Index access and index assignment are
//! grammatically tied to a bare identifier - `a[0]` is legal, `f()[0]` and
//! `[1, 2][0]` are not.

use crate::ast::{BinOpKind, Expr, UnOpKind};
use crate::Parser;
use rill_lex::TokenKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        if self.peek_assign_target() {
            let name_tok = self.advance();
            let name = self.ident_symbol(&name_tok);
            self.advance(); // '='
            let value = self.parse_expr();
            let span = name_tok.span.merge(value.span());
            return Expr::VarAssign {
                name,
                value: Box::new(value),
                span,
            };
        }

        self.parse_or()
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_compare();
        loop {
            let op = if self.check_keyword("and") {
                BinOpKind::And
            } else if self.check_keyword("or") {
                BinOpKind::Or
            } else {
                break;
            };
            self.advance();
            let right = self.parse_compare();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_compare(&mut self) -> Expr {
        if self.check_keyword("not") {
            let tok = self.advance();
            let operand = self.parse_compare();
            let span = tok.span.merge(operand.span());
            return Expr::UnaryOp {
                op: UnOpKind::Not,
                operand: Box::new(operand),
                span,
            };
        }

        let mut left = self.parse_arith();
        loop {
            let op = match self.current().kind {
                TokenKind::Ee => BinOpKind::Ee,
                TokenKind::Ne => BinOpKind::Ne,
                TokenKind::Lt => BinOpKind::Lt,
                TokenKind::Lte => BinOpKind::Lte,
                TokenKind::Gt => BinOpKind::Gt,
                TokenKind::Gte => BinOpKind::Gte,
                _ => break,
            };
            self.advance();
            let right = self.parse_arith();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_arith(&mut self) -> Expr {
        let mut left = self.parse_term();
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOpKind::Add,
                TokenKind::Minus => BinOpKind::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_term(&mut self) -> Expr {
        let mut left = self.parse_factor();
        loop {
            let op = match self.current().kind {
                TokenKind::Mul => BinOpKind::Mul,
                TokenKind::Div => BinOpKind::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor();
            let span = left.span().merge(right.span());
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_factor(&mut self) -> Expr {
        let op = match self.current().kind {
            TokenKind::Plus => Some(UnOpKind::Plus),
            TokenKind::Minus => Some(UnOpKind::Minus),
            _ => None,
        };

        if let Some(op) = op {
            let tok = self.advance();
            let operand = self.parse_factor();
            let span = tok.span.merge(operand.span());
            return Expr::UnaryOp {
                op,
                operand: Box::new(operand),
                span,
            };
        }

        self.parse_power()
    }

    /// Right-associative: the right-hand side may itself start with a unary
    /// sign, so it recurses into `factor` rather than `power`.
    fn parse_power(&mut self) -> Expr {
        let left = self.parse_call();

        if self.check(TokenKind::Pow) {
            self.advance();
            let right = self.parse_factor();
            let span = left.span().merge(right.span());
            return Expr::BinOp {
                op: BinOpKind::Pow,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        left
    }

    fn parse_call(&mut self) -> Expr {
        let node = self.parse_atom();

        if self.check(TokenKind::LParen) {
            let open = self.advance();
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                args.push(self.parse_expr());
                while self.check(TokenKind::Comma) {
                    self.advance();
                    args.push(self.parse_expr());
                }
            }
            let close = self.expect(TokenKind::RParen, "')'");
            let end_span = close.map(|t| t.span).unwrap_or(open.span);
            let span = node.span().merge(end_span);
            return Expr::Call {
                callee: Box::new(node),
                args,
                span,
            };
        }

        node
    }

    fn parse_atom(&mut self) -> Expr {
        let tok = self.current().clone();

        match tok.kind {
            TokenKind::Int => {
                self.advance();
                let n = match tok.value {
                    rill_lex::TokenValue::Int(n) => n,
                    _ => unreachable!(),
                };
                Expr::Int(n, tok.span)
            }
            TokenKind::Float => {
                self.advance();
                let n = match tok.value {
                    rill_lex::TokenValue::Float(n) => n,
                    _ => unreachable!(),
                };
                Expr::Float(n, tok.span)
            }
            TokenKind::String => {
                self.advance();
                let s = match tok.value {
                    rill_lex::TokenValue::Str(s) => s,
                    _ => unreachable!(),
                };
                Expr::Str(s, tok.span)
            }
            TokenKind::Identifier => {
                self.advance();
                let name = self.ident_symbol(&tok);
                let access = Expr::VarAccess {
                    name,
                    span: tok.span,
                };

                if self.check(TokenKind::LSquare) {
                    self.advance();
                    let index = self.parse_expr();
                    let close = self.expect(TokenKind::RSquare, "']'");
                    let end_span = close.map(|t| t.span).unwrap_or(index.span());
                    let index_span = tok.span.merge(end_span);

                    if self.check(TokenKind::Eq) {
                        self.advance();
                        let value = self.parse_expr();
                        let span = index_span.merge(value.span());
                        Expr::VarIndexAssign {
                            collection: Box::new(access),
                            index: Box::new(index),
                            value: Box::new(value),
                            span,
                        }
                    } else {
                        Expr::Index {
                            collection: Box::new(access),
                            index: Box::new(index),
                            span: index_span,
                        }
                    }
                } else {
                    access
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "')'");
                inner
            }
            TokenKind::LSquare => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_map_literal(),
            TokenKind::Keyword => {
                if tok.matches_keyword("if") {
                    self.parse_if_expr()
                } else if tok.matches_keyword("for") {
                    self.parse_for_expr()
                } else if tok.matches_keyword("while") {
                    self.parse_while_expr()
                } else if tok.matches_keyword("fun") {
                    self.parse_func_def()
                } else if tok.matches_keyword("return") {
                    self.parse_return_expr()
                } else if tok.matches_keyword("break") {
                    self.advance();
                    Expr::Break(tok.span)
                } else if tok.matches_keyword("continue") {
                    self.advance();
                    Expr::Continue(tok.span)
                } else {
                    self.error_expected("an expression");
                    self.advance();
                    Expr::Int(0, tok.span)
                }
            }
            _ => {
                self.error_expected("an expression");
                self.advance();
                Expr::Int(0, tok.span)
            }
        }
    }

    /// `return` may be followed by a value, or nothing if the next token
    /// ends the statement (newline, `end`, or EOF).
    pub(crate) fn parse_return_expr(&mut self) -> Expr {
        let tok = self.advance();
        let ends_statement = self.check(TokenKind::Newline)
            || self.is_at_end()
            || self.check_keyword("end")
            || self.check_keyword("elif")
            || self.check_keyword("else");

        if ends_statement {
            Expr::Return {
                value: None,
                span: tok.span,
            }
        } else {
            let value = self.parse_expr();
            let span = tok.span.merge(value.span());
            Expr::Return {
                value: Some(Box::new(value)),
                span,
            }
        }
    }

    fn parse_list_literal(&mut self) -> Expr {
        let open = self.advance(); // '['
        let mut elements = Vec::new();

        self.skip_newlines();
        if !self.check(TokenKind::RSquare) {
            elements.push(self.parse_expr());
            self.skip_newlines();
            while self.check(TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
                elements.push(self.parse_expr());
                self.skip_newlines();
            }
        }

        let close = self.expect(TokenKind::RSquare, "']'");
        let end_span = close.map(|t| t.span).unwrap_or(open.span);
        Expr::List {
            elements,
            is_block_statements: false,
            span: open.span.merge(end_span),
        }
    }

    fn parse_map_literal(&mut self) -> Expr {
        let open = self.advance(); // '{'
        let mut pairs = Vec::new();

        self.skip_newlines();
        if !self.check(TokenKind::RBrace) {
            pairs.push(self.parse_map_pair());
            self.skip_newlines();
            while self.check(TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
                pairs.push(self.parse_map_pair());
                self.skip_newlines();
            }
        }

        let close = self.expect(TokenKind::RBrace, "'}'");
        let end_span = close.map(|t| t.span).unwrap_or(open.span);
        Expr::Map {
            pairs,
            span: open.span.merge(end_span),
        }
    }

    fn parse_map_pair(&mut self) -> (Expr, Expr) {
        let key = self.parse_expr();
        self.expect(TokenKind::Colon, "':'");
        let value = self.parse_expr();
        (key, value)
    }
}

#[cfg(test)]
mod tests {
    use crate::Parser;
    use rill_lex::Lexer;
    use rill_util::Handler;

    fn parse_expr_str(source: &str) -> crate::Expr {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        parser.parse_expr()
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let e = parse_expr_str("1 + 2 * 3");
        match e {
            crate::Expr::BinOp {
                op: crate::BinOpKind::Add,
                right,
                ..
            } => assert!(matches!(
                *right,
                crate::Expr::BinOp {
                    op: crate::BinOpKind::Mul,
                    ..
                }
            )),
            _ => panic!("expected top-level Add"),
        }
    }

    #[test]
    fn test_power_right_associative() {
        let e = parse_expr_str("2 ^ 3 ^ 2");
        match e {
            crate::Expr::BinOp {
                op: crate::BinOpKind::Pow,
                right,
                ..
            } => assert!(matches!(
                *right,
                crate::Expr::BinOp {
                    op: crate::BinOpKind::Pow,
                    ..
                }
            )),
            _ => panic!("expected top-level Pow"),
        }
    }

    #[test]
    fn test_unary_minus_lower_than_power() {
        let e = parse_expr_str("-2 ^ 2");
        match e {
            crate::Expr::UnaryOp {
                op: crate::UnOpKind::Minus,
                operand,
                ..
            } => assert!(matches!(
                *operand,
                crate::Expr::BinOp {
                    op: crate::BinOpKind::Pow,
                    ..
                }
            )),
            _ => panic!("expected top-level unary minus"),
        }
    }

    #[test]
    fn test_call_basic() {
        let e = parse_expr_str("f(1, 2)");
        match e {
            crate::Expr::Call { args, .. } => assert_eq!(args.len(), 2),
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn test_index_access() {
        let e = parse_expr_str("a[0]");
        assert!(matches!(e, crate::Expr::Index { .. }));
    }

    #[test]
    fn test_simple_assign() {
        let e = parse_expr_str("x = 5");
        assert!(matches!(e, crate::Expr::VarAssign { .. }));
    }

    #[test]
    fn test_index_assign() {
        let e = parse_expr_str("a[0] = 5");
        assert!(matches!(e, crate::Expr::VarIndexAssign { .. }));
    }

    #[test]
    fn test_list_literal() {
        let e = parse_expr_str("[1, 2, 3]");
        match e {
            crate::Expr::List {
                elements,
                is_block_statements,
                ..
            } => {
                assert_eq!(elements.len(), 3);
                assert!(!is_block_statements);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_empty_list_literal() {
        let e = parse_expr_str("[]");
        match e {
            crate::Expr::List { elements, .. } => assert!(elements.is_empty()),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_map_literal() {
        let e = parse_expr_str("{\"x\": 1, \"y\": 2}");
        match e {
            crate::Expr::Map { pairs, .. } => assert_eq!(pairs.len(), 2),
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn test_not_and_comparison() {
        let e = parse_expr_str("not a == b");
        assert!(matches!(
            e,
            crate::Expr::UnaryOp {
                op: crate::UnOpKind::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_and_or_chain() {
        let e = parse_expr_str("a and b or c");
        assert!(matches!(e, crate::Expr::BinOp { .. }));
    }
}
