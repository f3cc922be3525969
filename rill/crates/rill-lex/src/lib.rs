//! rill-lex - the lexer.
//!
//! A single left-to-right pass over source bytes, dispatching on the
//! current byte to produce one [`Token`] at a time (see `lexer::core`).
//! Number and string literal decoding happens here, not in the parser, so
//! tokens carry typed payloads ([`TokenValue`]).
//!
//! - [`cursor`] - the byte/line/column cursor the lexer advances
//! - [`token`] - [`Token`], [`TokenKind`], [`TokenValue`], and the keyword
//!   table
//! - [`lexer`] - the [`Lexer`] struct and its dispatch loop
//! - [`unicode`] - ASCII identifier-character classification

pub mod cursor;
mod edge_cases;
mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, TokenValue};
