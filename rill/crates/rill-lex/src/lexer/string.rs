//! String literal lexing: single- or double-quoted, with `\n`/`\t` escapes
//! and the identity escape for anything else.

use crate::token::{Token, TokenKind, TokenValue};
use crate::Lexer;
use rill_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes a string literal starting at the current quote character.
    /// Reads until the matching quote; `\` begins an escape. A missing
    /// closing quote (end of input or a bare newline) is `ExpectedCharacter`.
    pub fn lex_string(&mut self) -> Token {
        let quote = self.cursor.current_char();
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_expected_character(quote);
                break;
            }

            let c = self.cursor.current_char();

            if c == quote {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    self.report_expected_character(quote);
                    break;
                }
                let escaped = self.cursor.current_char();
                self.cursor.advance();
                match escaped {
                    'n' => content.push('\n'),
                    't' => content.push('\t'),
                    other => content.push(other),
                }
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Token::new(
            TokenKind::String,
            TokenValue::Str(Symbol::intern(&content)),
            self.span(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_util::Handler;

    fn lex_str(source: &str) -> (Token, bool) {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.token_start = 0;
        let token = lexer.lex_string();
        (token, handler.has_errors())
    }

    #[test]
    fn test_double_quoted() {
        let (t, err) = lex_str("\"hello\"");
        assert_eq!(t.value, TokenValue::Str(Symbol::intern("hello")));
        assert!(!err);
    }

    #[test]
    fn test_single_quoted() {
        let (t, err) = lex_str("'hello'");
        assert_eq!(t.value, TokenValue::Str(Symbol::intern("hello")));
        assert!(!err);
    }

    #[test]
    fn test_newline_escape() {
        let (t, _) = lex_str("\"a\\nb\"");
        assert_eq!(t.value, TokenValue::Str(Symbol::intern("a\nb")));
    }

    #[test]
    fn test_tab_escape() {
        let (t, _) = lex_str("\"a\\tb\"");
        assert_eq!(t.value, TokenValue::Str(Symbol::intern("a\tb")));
    }

    #[test]
    fn test_unknown_escape_is_verbatim() {
        let (t, err) = lex_str("\"a\\qb\"");
        assert_eq!(t.value, TokenValue::Str(Symbol::intern("aqb")));
        assert!(!err);
    }

    #[test]
    fn test_escaped_quote() {
        let (t, _) = lex_str("\"a\\\"b\"");
        assert_eq!(t.value, TokenValue::Str(Symbol::intern("a\"b")));
    }

    #[test]
    fn test_unterminated_string_errors() {
        let (_, err) = lex_str("\"abc");
        assert!(err);
    }
}
