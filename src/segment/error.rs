//! Error types for segment parsing and chain reversal.

use thiserror::Error;

/// Errors that can occur while parsing or reversing a segment chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// A required argument was absent.
    #[error("Value cannot be null. Parameter name: {name}")]
    MissingArgument { name: &'static str },
    /// Unexpected token at a specific position.
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input; `position` is the input length.
    #[error("Unexpected end of input at position {position}, expected {expected}")]
    UnexpectedEnd { position: usize, expected: String },
    /// Invalid syntax with description.
    #[error("Invalid path syntax: {message}")]
    InvalidSyntax { message: String },
}
