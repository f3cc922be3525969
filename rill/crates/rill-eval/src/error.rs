//! The evaluator's error type.
//!
//! Unlike the lexer and parser, which collect every diagnostic they can
//! before giving up, the evaluator stops at the first problem: a running
//! program either produces a value or it doesn't. [`RuntimeError`] carries
//! enough information (message, span, call stack) for the host to print the
//! `Traceback (most recent call last):` block.

use rill_util::Span;

/// One frame of a runtime traceback: the name of the function being
/// evaluated (or `"<module>"` at the top level) and the call-site span.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
    pub span: Span,
    pub traceback: Vec<Frame>,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            traceback: Vec::new(),
        }
    }

    /// Prepend a frame as the error propagates out of a call. Each call site
    /// the error passes through inserts itself at the front, so by the time
    /// the error reaches the top level the vec reads outermost-first,
    /// innermost-last - the order traceback block prints in.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.traceback.insert(0, frame);
        self
    }
}

pub type EvalResult = Result<crate::value::Value, RuntimeError>;
