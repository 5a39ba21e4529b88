//! Evaluation results and operator dispatch

use std::fmt;

use num_bigint::BigInt;
use q16_fixed_point::{FixedPoint, FixedPointVector};
use serde::{Serialize, Serializer};

use crate::error::{ExprError, Result};

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    Scalar(FixedPoint),
    Vector(FixedPointVector),
    /// Packed integer produced by `Int()`; no arithmetic is defined on it
    Integer(#[serde(serialize_with = "serialize_integer")] BigInt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Subtract => "Subtract",
            BinaryOp::Multiply => "Multiply",
            BinaryOp::Divide => "Divide",
        }
    }

    fn apply_scalar(self, a: FixedPoint, b: FixedPoint) -> Result<FixedPoint> {
        Ok(match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a.checked_div(b)?,
        })
    }

    fn apply_vector(self, a: &FixedPointVector, b: &FixedPointVector) -> Result<FixedPointVector> {
        Ok(match self {
            BinaryOp::Add => a.add(b)?,
            BinaryOp::Subtract => a.sub(b)?,
            BinaryOp::Multiply => a.mul(b)?,
            BinaryOp::Divide => a.div(b)?,
        })
    }
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Vector(_) => "vector",
            Value::Integer(_) => "integer",
        }
    }

    /// Apply a binary operator; a scalar meeting a vector is broadcast.
    pub fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => op.apply_scalar(*a, *b).map(Value::Scalar),
            (Value::Vector(a), Value::Vector(b)) => op.apply_vector(a, b).map(Value::Vector),
            (Value::Vector(a), Value::Scalar(b)) => op
                .apply_vector(a, &FixedPointVector::from(*b))
                .map(Value::Vector),
            (Value::Scalar(a), Value::Vector(b)) => op
                .apply_vector(&FixedPointVector::from(*a), b)
                .map(Value::Vector),
            (Value::Integer(_), _) | (_, Value::Integer(_)) => Err(ExprError::TypeMismatch {
                operation: op.name().to_string(),
                operand: "integer",
            }),
        }
    }

    pub fn negate(&self) -> Result<Value> {
        match self {
            Value::Scalar(a) => Ok(Value::Scalar(-*a)),
            Value::Vector(a) => Ok(Value::Vector(a.neg())),
            Value::Integer(_) => Err(ExprError::TypeMismatch {
                operation: "Negate".to_string(),
                operand: "integer",
            }),
        }
    }

    /// Display form followed by the decimal view of each component,
    /// e.g. `#000A0000 (00010.00000000000)`
    pub fn describe(&self) -> String {
        match self {
            Value::Scalar(value) => describe_scalar(*value),
            Value::Vector(value) => {
                let components: Vec<String> =
                    value.components().iter().map(|&c| describe_scalar(c)).collect();
                format!("[{}]", components.join(", "))
            }
            Value::Integer(value) => value.to_string(),
        }
    }
}

fn describe_scalar(value: FixedPoint) -> String {
    format!("{value} ({})", value.to_decimal_string())
}

impl From<FixedPoint> for Value {
    fn from(value: FixedPoint) -> Self {
        Value::Scalar(value)
    }
}

impl From<FixedPointVector> for Value {
    fn from(value: FixedPointVector) -> Self {
        Value::Vector(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(value) => write!(f, "{value}"),
            Value::Vector(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
        }
    }
}

fn serialize_integer<S>(value: &BigInt, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}
