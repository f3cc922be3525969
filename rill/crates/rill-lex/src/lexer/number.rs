//! Number literal lexing: `[0-9]+ ('.' [0-9]+)?`.

use crate::token::{Token, TokenKind, TokenValue};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal. Accumulates digits and at most one `.`; a
    /// second `.` stops the scan (it belongs to whatever comes after, e.g.
    /// index or method-call syntax the grammar doesn't have). No sign, no
    /// exponent, no digit-group separators: those are Rust literal forms,
    /// not this language's.
    pub fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        let mut saw_dot = false;

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            saw_dot = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(start);

        if saw_dot {
            match text.parse::<f64>() {
                Ok(value) => Token::new(TokenKind::Float, TokenValue::Float(value), self.span()),
                Err(_) => {
                    self.report_error(format!("invalid floating point literal '{text}'"));
                    Token::new(TokenKind::Float, TokenValue::Float(0.0), self.span())
                }
            }
        } else {
            // Host-native wrapping semantics (see DESIGN.md): a literal
            // too wide for i64 wraps rather than erroring, matching the
            // wrapping semantics arithmetic uses.
            match text.parse::<u64>() {
                Ok(value) => {
                    Token::new(TokenKind::Int, TokenValue::Int(value as i64), self.span())
                }
                Err(_) => {
                    self.report_error(format!("invalid integer literal '{text}'"));
                    Token::new(TokenKind::Int, TokenValue::Int(0), self.span())
                }
            }
        }
    }

    pub(crate) fn report_error(&mut self, message: String) {
        use rill_util::diagnostic::{DiagnosticBuilder, DiagnosticCode};
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_ILLEGAL_CHARACTER)
            .span(self.span())
            .emit(self.handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_util::Handler;

    fn lex_num(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.token_start = 0;
        lexer.lex_number()
    }

    #[test]
    fn test_integer() {
        let t = lex_num("42");
        assert_eq!(t.kind, TokenKind::Int);
        assert_eq!(t.value, TokenValue::Int(42));
    }

    #[test]
    fn test_zero() {
        assert_eq!(lex_num("0").value, TokenValue::Int(0));
    }

    #[test]
    fn test_float() {
        let t = lex_num("3.14");
        assert_eq!(t.kind, TokenKind::Float);
        assert_eq!(t.value, TokenValue::Float(3.14));
    }

    #[test]
    fn test_second_dot_stops_scan() {
        // "1.2.3" lexes the number as "1.2"; caller re-lexes from the second '.'.
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("1.2.3", &mut handler);
        lexer.token_start = 0;
        let t = lexer.lex_number();
        assert_eq!(t.value, TokenValue::Float(1.2));
        assert_eq!(lexer.cursor.current_char(), '.');
    }

    #[test]
    fn test_trailing_dot_without_digit_is_int() {
        // "5." with nothing numeric after the dot: not a float, the dot is
        // left for the next token to deal with (and will error there).
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("5.", &mut handler);
        lexer.token_start = 0;
        let t = lexer.lex_number();
        assert_eq!(t.value, TokenValue::Int(5));
    }
}
