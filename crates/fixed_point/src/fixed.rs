//! Fixed-point scalar type

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec;
use crate::error::{FixedPointError, Result};

/// Number of fractional bits (value represents raw / 2^16)
pub const FRAC_BITS: u32 = 16;

const FRAC_SCALE: f64 = (1_u32 << FRAC_BITS) as f64;
const MAX_HEX_DIGITS: usize = 8;

/// A signed Q16.16 fixed-point number.
///
/// The raw two's-complement word is the only stored representation; hex,
/// decimal and floating-point views are derived from it. Equality and ordering
/// compare raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPoint {
    raw: i32,
}

impl FixedPoint {
    /// -32768.0
    pub const MIN: Self = Self { raw: i32::MIN };
    /// 32767.99998...
    pub const MAX: Self = Self { raw: i32::MAX };
    pub const ZERO: Self = Self { raw: 0 };
    pub const ONE: Self = Self {
        raw: 1 << FRAC_BITS,
    };

    /// Create a value from its raw signed word
    pub const fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    /// Create a value from its raw unsigned word (two's complement)
    pub const fn from_bits(bits: u32) -> Self {
        Self { raw: bits as i32 }
    }

    /// Parse 1 to 8 hex digits, with or without a leading `#`.
    ///
    /// Shorter inputs are zero-extended, so `#d9a18f` is `0x00D9A18F`.
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.is_empty() || digits.len() > MAX_HEX_DIGITS {
            return Err(FixedPointError::format(text, "expected 1 to 8 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FixedPointError::format(text, "expected only hex digits"));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_bits)
            .map_err(|_| FixedPointError::format(text, "invalid hex literal"))
    }

    /// Parse decimal text such as `5`, `-1.5` or `-00387.34080544522`
    pub fn from_decimal_str(text: &str) -> Result<Self> {
        let canonical = codec::normalize_decimal(text)?;
        codec::decimal_to_bits(&canonical).map(Self::from_bits)
    }

    /// Create a value from a floating-point number, saturating at the range ends.
    ///
    /// Rounds to the nearest raw step; NaN maps to zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        let scaled = (value * FRAC_SCALE).round();
        if scaled >= f64::from(i32::MAX) {
            Self::MAX
        } else if scaled <= f64::from(i32::MIN) {
            Self::MIN
        } else {
            Self::from_raw(scaled as i32)
        }
    }

    /// Parse a scalar literal: `#`-prefixed hex or decimal text
    pub fn parse(text: &str) -> Result<Self> {
        if text.starts_with('#') {
            Self::from_hex(text)
        } else {
            Self::from_decimal_str(text)
        }
    }

    pub const fn raw(self) -> i32 {
        self.raw
    }

    pub const fn to_bits(self) -> u32 {
        self.raw as u32
    }

    /// Canonical 8-digit uppercase hex form, no prefix
    pub fn to_hex(self) -> String {
        codec::format_hex(self.to_bits())
    }

    /// Canonical `[-]IIIII.FFFFFFFFFFF` decimal form
    pub fn to_decimal_string(self) -> String {
        codec::bits_to_decimal(self.to_bits())
    }

    /// Lossy real-value view
    pub fn to_f64(self) -> f64 {
        f64::from(self.raw) / FRAC_SCALE
    }

    /// Saturating addition
    pub fn saturating_add(self, other: Self) -> Self {
        Self::from_raw(self.raw.saturating_add(other.raw))
    }

    /// Saturating subtraction
    pub fn saturating_sub(self, other: Self) -> Self {
        Self::from_raw(self.raw.saturating_sub(other.raw))
    }

    /// Multiply with the ALU's rounding correction, saturating to the i32 range.
    ///
    /// The exact 64-bit product is shifted right by 16. When the discarded low
    /// half, read as a signed 16-bit value, has the same sign as a non-zero
    /// product (ignoring a lone `-1`), the shifted result moves one step toward
    /// zero.
    pub fn saturating_mul(self, other: Self) -> Self {
        let product = i64::from(self.raw) * i64::from(other.raw);
        let discarded = product as i16;
        let mut shifted = product >> FRAC_BITS;

        if product < 0 && discarded < -1 {
            shifted += 1;
        } else if product > 0 && discarded > 0 {
            shifted -= 1;
        }

        Self::from_raw(clamp_i64(shifted))
    }

    /// Divide, truncating toward zero and saturating to the i32 range
    pub fn checked_div(self, divisor: Self) -> Result<Self> {
        if divisor.raw == 0 {
            return Err(FixedPointError::DivideByZero);
        }
        let quotient = (i64::from(self.raw) << FRAC_BITS) / i64::from(divisor.raw);
        Ok(Self::from_raw(clamp_i64(quotient)))
    }

    /// `ZERO - self`, so `MIN` negates to `MAX`
    pub fn saturating_neg(self) -> Self {
        Self::ZERO.saturating_sub(self)
    }

    pub fn abs(self) -> Self {
        if self.raw < 0 {
            self.saturating_neg()
        } else {
            self
        }
    }
}

fn clamp_i64(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Add for FixedPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl Mul for FixedPoint {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.saturating_mul(rhs)
    }
}

impl Neg for FixedPoint {
    type Output = Self;

    fn neg(self) -> Self {
        self.saturating_neg()
    }
}

impl FromStr for FixedPoint {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl Serialize for FixedPoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
