//! rill-util - foundational types shared by the lexer, parser and evaluator.
//!
//! This crate has no knowledge of Rill's grammar or runtime semantics. It
//! provides the plumbing every other crate in the workspace builds on:
//!
//! - [`symbol`] - string interning for identifiers and keywords
//! - [`span`] - byte-offset/line/column source locations and the source map
//!   that turns a [`span::Span`] back into an arrow-annotated snippet
//! - [`diagnostic`] - the `Diagnostic`/`Handler`/`Level` reporting layer used
//!   to surface the five error kinds the interpreter can raise
//! - [`error`] - `thiserror`-based error types for this crate's own
//!   fallible operations (symbol lookup, source map queries)

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::{FileId, Span};
pub use symbol::Symbol;
