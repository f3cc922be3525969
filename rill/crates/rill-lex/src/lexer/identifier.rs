//! Identifier and keyword lexing.

use crate::token::{is_keyword, Token, TokenKind, TokenValue};
use crate::unicode::is_ascii_ident_continue;
use crate::Lexer;
use rill_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword: `[A-Za-z_][A-Za-z_0-9]*`, checked
    /// against the keyword table after the full word is read.
    pub fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let symbol = Symbol::intern(text);

        if is_keyword(text) {
            Token::new(TokenKind::Keyword, TokenValue::Keyword(symbol), self.span())
        } else {
            Token::new(TokenKind::Identifier, TokenValue::Ident(symbol), self.span())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_util::Handler;

    fn lex_ident(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.token_start = 0;
        lexer.lex_identifier()
    }

    #[test]
    fn test_simple_identifier() {
        let token = lex_ident("foo");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.as_symbol(), Some(Symbol::intern("foo")));
    }

    #[test]
    fn test_identifier_with_underscore_and_digits() {
        let token = lex_ident("foo_bar_123");
        assert_eq!(token.kind, TokenKind::Identifier);
    }

    #[test]
    fn test_keyword_if() {
        let token = lex_ident("if");
        assert_eq!(token.kind, TokenKind::Keyword);
        assert!(token.matches_keyword("if"));
    }

    #[test]
    fn test_all_keywords_recognized() {
        for kw in crate::token::KEYWORDS {
            let token = lex_ident(kw);
            assert_eq!(token.kind, TokenKind::Keyword, "{kw} should lex as keyword");
        }
    }

    #[test]
    fn test_leading_underscore_is_identifier() {
        let token = lex_ident("_private");
        assert_eq!(token.kind, TokenKind::Identifier);
    }
}
