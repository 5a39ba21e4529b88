//! Fixed-point error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Invalid fixed-point literal {input:?}: {reason}")]
    InvalidFormat { input: String, reason: &'static str },

    #[error("Integer part {value} out of range for Q16.16 (max 0x7FFF)")]
    IntegerOverflow { value: i64 },

    #[error("Fraction part {value} out of range for Q16.16 (max 0xFFFF)")]
    FractionOverflow { value: i64 },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Division by zero")]
    DivideByZero,

    #[error("Vector must have at least one component")]
    EmptyVector,
}

impl FixedPointError {
    pub(crate) fn format(input: &str, reason: &'static str) -> Self {
        FixedPointError::InvalidFormat {
            input: input.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixedPointError>;
