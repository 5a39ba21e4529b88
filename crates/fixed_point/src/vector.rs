//! Fixed-point vector operations

use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{FixedPointError, Result};
use crate::fixed::FixedPoint;
use crate::packed;

/// An ordered, non-empty sequence of fixed-point values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<FixedPoint>", into = "Vec<FixedPoint>")]
pub struct FixedPointVector {
    data: Vec<FixedPoint>,
}

impl FixedPointVector {
    /// Create a vector from its components
    pub fn new(data: Vec<FixedPoint>) -> Result<Self> {
        if data.is_empty() {
            return Err(FixedPointError::EmptyVector);
        }
        Ok(Self { data })
    }

    /// Parse bracketed text such as `[5, #00110000]` or `[8686210422573525601]`.
    ///
    /// Each element goes through [`packed::parse_many`], so one wide integer
    /// literal can populate several components.
    pub fn parse(text: &str) -> Result<Self> {
        let mut data = Vec::new();
        for token in text
            .split(|c: char| matches!(c, '[' | ']' | ',') || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            data.extend(packed::parse_many(token)?);
        }
        Self::new(data)
    }

    /// Read all components as one signed big-endian integer
    pub fn to_int(&self) -> BigInt {
        packed::pack_words(&self.data)
    }

    /// Get the length of the vector
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the vector is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn components(&self) -> &[FixedPoint] {
        &self.data
    }

    /// Element-wise addition
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| Ok(a + b))
    }

    /// Element-wise subtraction
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| Ok(a - b))
    }

    /// Element-wise multiplication
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| Ok(a * b))
    }

    /// Element-wise division
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, FixedPoint::checked_div)
    }

    /// Negate all elements
    pub fn neg(&self) -> Self {
        Self {
            data: self.data.iter().map(|&x| -x).collect(),
        }
    }

    /// Dot product with another vector; the running sum saturates
    pub fn dot(&self, other: &Self) -> Result<FixedPoint> {
        if self.len() != other.len() {
            return Err(FixedPointError::DimensionMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }

        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .fold(FixedPoint::ZERO, |acc, (&a, &b)| acc + a * b))
    }

    /// 2D wedge product: `self[1] * other[0] - self[0] * other[1]`
    pub fn wedge(&self, other: &Self) -> Result<FixedPoint> {
        let [a0, a1] = self.as_pair()?;
        let [b0, b1] = other.as_pair()?;
        Ok(a1 * b0 - a0 * b1)
    }

    /// Signed area spanned by three 2D points: `(a - c).wedge(b - c)`
    pub fn area(a: &Self, b: &Self, c: &Self) -> Result<FixedPoint> {
        a.as_pair()?;
        b.as_pair()?;
        c.as_pair()?;
        a.sub(c)?.wedge(&b.sub(c)?)
    }

    fn as_pair(&self) -> Result<[FixedPoint; 2]> {
        match self.data.as_slice() {
            &[x, y] => Ok([x, y]),
            _ => Err(FixedPointError::DimensionMismatch {
                expected: 2,
                got: self.len(),
            }),
        }
    }

    /// Pairwise combination; a length-1 operand is broadcast against the other.
    fn zip_with<F>(&self, other: &Self, op: F) -> Result<Self>
    where
        F: Fn(FixedPoint, FixedPoint) -> Result<FixedPoint>,
    {
        let data = match (self.len(), other.len()) {
            (l, r) if l == r => self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| op(a, b))
                .collect::<Result<Vec<_>>>()?,
            (_, 1) => self
                .data
                .iter()
                .map(|&a| op(a, other.data[0]))
                .collect::<Result<Vec<_>>>()?,
            (1, _) => other
                .data
                .iter()
                .map(|&b| op(self.data[0], b))
                .collect::<Result<Vec<_>>>()?,
            (l, r) => {
                return Err(FixedPointError::DimensionMismatch {
                    expected: l,
                    got: r,
                })
            }
        };
        Ok(Self { data })
    }
}

impl From<FixedPoint> for FixedPointVector {
    fn from(value: FixedPoint) -> Self {
        Self { data: vec![value] }
    }
}

impl TryFrom<Vec<FixedPoint>> for FixedPointVector {
    type Error = FixedPointError;

    fn try_from(data: Vec<FixedPoint>) -> Result<Self> {
        Self::new(data)
    }
}

impl From<FixedPointVector> for Vec<FixedPoint> {
    fn from(vector: FixedPointVector) -> Self {
        vector.data
    }
}

impl fmt::Display for FixedPointVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
