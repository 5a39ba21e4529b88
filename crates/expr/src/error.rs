//! Expression error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] q16_fixed_point::FixedPointError),

    #[error("Unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected token {found:?}, expected {expected}")]
    UnexpectedToken { found: String, expected: &'static str },

    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Unknown method {method} on {receiver}")]
    UnknownMethod {
        method: String,
        receiver: &'static str,
    },

    #[error("{name} takes {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Type mismatch: {operation} is not defined for {operand}")]
    TypeMismatch {
        operation: String,
        operand: &'static str,
    },

    #[error("Expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Empty expression")]
    Empty,
}

pub type Result<T> = std::result::Result<T, ExprError>;
