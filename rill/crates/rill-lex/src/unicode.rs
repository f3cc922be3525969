//! ASCII classification helpers for the lexer.
//!
//! Identifiers and keywords are ASCII-only by design (see the language's
//! non-goals): no Unicode identifier categories are recognized.

/// Checks if a character can start an identifier: `[A-Za-z_]`.
///
/// ```
/// use rill_lex::unicode::is_ascii_ident_start;
///
/// assert!(is_ascii_ident_start('a'));
/// assert!(is_ascii_ident_start('_'));
/// assert!(!is_ascii_ident_start('1'));
/// assert!(!is_ascii_ident_start('α'));
/// ```
pub fn is_ascii_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Checks if a character can continue an identifier: `[A-Za-z0-9_]`.
///
/// ```
/// use rill_lex::unicode::is_ascii_ident_continue;
///
/// assert!(is_ascii_ident_continue('a'));
/// assert!(is_ascii_ident_continue('1'));
/// assert!(is_ascii_ident_continue('_'));
/// assert!(!is_ascii_ident_continue('-'));
/// ```
pub fn is_ascii_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ascii_ident_start() {
        for c in 'a'..='z' {
            assert!(is_ascii_ident_start(c));
        }
        for c in 'A'..='Z' {
            assert!(is_ascii_ident_start(c));
        }
        assert!(is_ascii_ident_start('_'));
        assert!(!is_ascii_ident_start('1'));
        assert!(!is_ascii_ident_start('α'));
        assert!(!is_ascii_ident_start(' '));
    }

    #[test]
    fn test_is_ascii_ident_continue() {
        assert!(is_ascii_ident_continue('a'));
        assert!(is_ascii_ident_continue('Z'));
        assert!(is_ascii_ident_continue('_'));
        for c in '0'..='9' {
            assert!(is_ascii_ident_continue(c));
        }
        assert!(!is_ascii_ident_continue('-'));
        assert!(!is_ascii_ident_continue('α'));
    }
}
