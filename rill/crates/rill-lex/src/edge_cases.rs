//! Edge-case and property tests for the lexer, covering two invariants:
//! totality over arbitrary byte strings, and `start.index < end.index`
//! for every non-EOF token.
