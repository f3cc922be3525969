//! Core lexer implementation: the dispatch loop over a [`Cursor`].

use rill_util::diagnostic::{DiagnosticBuilder, DiagnosticCode};
use rill_util::{Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::unicode::is_ascii_ident_start;

/// Lexer for Rill source code.
///
/// A single left-to-right pass: each call to [`Lexer::next_token`] skips
/// whitespace, records the start of the next lexeme, and dispatches on the
/// current byte to produce one token.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) handler: &'a mut Handler,
    pub(crate) token_start: usize,
    pub(crate) token_start_line: u32,
    pub(crate) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source, or `Token::Eof` once
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return self.punct(TokenKind::Eof);
            }

            return match self.cursor.current_char() {
                '\n' | ';' => {
                    self.cursor.advance();
                    self.punct(TokenKind::Newline)
                }
                '(' => self.advance_punct(TokenKind::LParen),
                ')' => self.advance_punct(TokenKind::RParen),
                '[' => self.advance_punct(TokenKind::LSquare),
                ']' => self.advance_punct(TokenKind::RSquare),
                '{' => self.advance_punct(TokenKind::LBrace),
                '}' => self.advance_punct(TokenKind::RBrace),
                ':' => self.advance_punct(TokenKind::Colon),
                ',' => self.advance_punct(TokenKind::Comma),
                '+' => self.advance_punct(TokenKind::Plus),
                '*' => self.advance_punct(TokenKind::Mul),
                '/' => self.advance_punct(TokenKind::Div),
                '^' => self.advance_punct(TokenKind::Pow),
                '-' => self.lex_minus(),
                '=' => self.lex_equals(),
                '!' => self.lex_bang(),
                '<' => self.lex_angle(TokenKind::Lt, TokenKind::Lte),
                '>' => self.lex_angle(TokenKind::Gt, TokenKind::Gte),
                '"' | '\'' => self.lex_string(),
                c if c.is_ascii_digit() => self.lex_number(),
                c if is_ascii_ident_start(c) => self.lex_identifier(),
                c => {
                    self.cursor.advance();
                    self.report_illegal_character(c);
                    continue;
                }
            };
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            self.cursor.advance();
        }
    }

    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '>' {
            self.cursor.advance();
            self.punct(TokenKind::Arrow)
        } else {
            self.punct(TokenKind::Minus)
        }
    }

    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.punct(TokenKind::Ee)
        } else {
            self.punct(TokenKind::Eq)
        }
    }

    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.punct(TokenKind::Ne)
        } else {
            self.report_expected_character('=');
            self.punct(TokenKind::Ne)
        }
    }

    fn lex_angle(&mut self, plain: TokenKind, with_eq: TokenKind) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.punct(with_eq)
        } else {
            self.punct(plain)
        }
    }

    fn advance_punct(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.punct(kind)
    }

    pub(crate) fn punct(&self, kind: TokenKind) -> Token {
        Token::punct(kind, self.span())
    }

    pub(crate) fn span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    pub(crate) fn report_illegal_character(&mut self, c: char) {
        DiagnosticBuilder::error(format!("Illegal character '{c}'"))
            .code(DiagnosticCode::E_ILLEGAL_CHARACTER)
            .span(self.span())
            .emit(self.handler);
    }

    pub(crate) fn report_expected_character(&mut self, expected: char) {
        DiagnosticBuilder::error(format!("Expected '{expected}'"))
            .code(DiagnosticCode::E_EXPECTED_CHARACTER)
            .span(self.span())
            .emit(self.handler);
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_single_char_punctuators() {
        assert_eq!(
            kinds("()[]{}:,+*/^"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LSquare,
                TokenKind::RSquare,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Plus,
                TokenKind::Mul,
                TokenKind::Div,
                TokenKind::Pow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_minus_vs_arrow() {
        assert_eq!(kinds("-"), vec![TokenKind::Minus, TokenKind::Eof]);
        assert_eq!(kinds("->"), vec![TokenKind::Arrow, TokenKind::Eof]);
    }

    #[test]
    fn test_eq_vs_ee() {
        assert_eq!(kinds("="), vec![TokenKind::Eq, TokenKind::Eof]);
        assert_eq!(kinds("=="), vec![TokenKind::Ee, TokenKind::Eof]);
    }

    #[test]
    fn test_bang_requires_eq() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("!", &mut handler);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Ne);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(kinds("< <= > >="), vec![
            TokenKind::Lt, TokenKind::Lte, TokenKind::Gt, TokenKind::Gte, TokenKind::Eof
        ]);
    }

    #[test]
    fn test_newline_and_semicolon() {
        assert_eq!(
            kinds("\n;"),
            vec![TokenKind::Newline, TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_whitespace_skipped() {
        assert_eq!(kinds("   \t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_illegal_character_reports_and_skips() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("@", &mut handler);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Eof);
        assert!(handler.has_errors());
    }
}
