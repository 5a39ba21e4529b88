//! Bit-exact conversion between Q16.16 words and fixed-format decimal text.
//!
//! The decimal form is `[-]IIIII.FFFFFFFFFFF`: five integer digits, a point and
//! eleven fractional digits. The magnitude is handled as an integer scaled by
//! 10^11 and the 16-bit fraction field maps onto it through
//! [`FRACTION_MULTIPLIER`], so both directions stay in integer arithmetic.

use crate::error::{FixedPointError, Result};

/// 10^11, the scale of the decimal magnitude
pub const SCALE_INTEGER: i64 = 100_000_000_000;

/// Decimal weight of one fraction ulp (10^11 / 2^16, truncated)
pub const FRACTION_MULTIPLIER: i64 = 1_525_878;

/// 32768 * 10^11, folds the sign bit into the decimal magnitude
pub const NEGATIVE_OFFSET: i64 = 3_276_800_000_000_000;

const INT_DIGITS: usize = 5;
const FRAC_DIGITS: usize = 11;
const HEX_DIGITS: usize = 8;

const SIGN_BIT: u32 = 0x8000_0000;
const INT_MASK: u32 = 0x7FFF_0000;
const FRAC_MASK: u32 = 0x0000_FFFF;

const MAX_INT_FIELD: i64 = 0x7FFF;
const MAX_FRAC_FIELD: i64 = 0xFFFF;
const MAX_INT_DIGITS_VALUE: i64 = 99_999;

/// Convert canonical decimal text (e.g. `-00387.34080544522`) to 8 hex digits.
pub fn decimal_to_hex(text: &str) -> Result<String> {
    decimal_to_bits(text).map(format_hex)
}

/// Convert 8 hex digits (e.g. `FE7CA8C1`) to canonical decimal text.
pub fn hex_to_decimal(hex: &str) -> Result<String> {
    parse_hex_word(hex).map(bits_to_decimal)
}

/// Encode canonical decimal text into the raw 32-bit word.
pub fn decimal_to_bits(text: &str) -> Result<u32> {
    let (negative, int_digits, frac_digits) = split_canonical(text)?;
    let magnitude = digits_value(int_digits) * SCALE_INTEGER + digits_value(frac_digits);
    compose(negative && magnitude != 0, magnitude)
}

/// Decode a raw 32-bit word into canonical decimal text.
pub fn bits_to_decimal(bits: u32) -> String {
    let int_field = i64::from((bits & INT_MASK) >> 16);
    let frac_field = i64::from(bits & FRAC_MASK);

    let mut scaled = int_field * SCALE_INTEGER + frac_field * FRACTION_MULTIPLIER;
    if bits & SIGN_BIT != 0 {
        scaled -= NEGATIVE_OFFSET;
    }

    let sign = if scaled < 0 { "-" } else { "" };
    let magnitude = scaled.abs();
    format!(
        "{sign}{:0int$}.{:0frac$}",
        magnitude / SCALE_INTEGER,
        magnitude % SCALE_INTEGER,
        int = INT_DIGITS,
        frac = FRAC_DIGITS,
    )
}

/// Render a raw word as 8 uppercase hex digits.
pub fn format_hex(bits: u32) -> String {
    format!("{bits:08X}")
}

/// Parse exactly 8 hex digits into a raw word.
pub fn parse_hex_word(hex: &str) -> Result<u32> {
    if hex.len() != HEX_DIGITS {
        return Err(FixedPointError::format(hex, "expected exactly 8 hex digits"));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FixedPointError::format(hex, "expected only hex digits"));
    }
    u32::from_str_radix(hex, 16).map_err(|_| FixedPointError::format(hex, "invalid hex word"))
}

/// Normalise free-form decimal text (`-?\d+(\.\d+)?`) to the canonical
/// 5+11 digit layout.
///
/// Fractions longer than 11 digits are rounded half away from zero. More than
/// five significant integer digits is an overflow, not a format error.
pub fn normalize_decimal(text: &str) -> Result<String> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_digits, frac_digits) = match body.split_once('.') {
        Some((int_digits, frac_digits)) => {
            if frac_digits.is_empty() || !all_digits(frac_digits) {
                return Err(FixedPointError::format(
                    text,
                    "expected digits after a single decimal point",
                ));
            }
            (int_digits, frac_digits)
        }
        None => (body, ""),
    };
    if int_digits.is_empty() || !all_digits(int_digits) {
        return Err(FixedPointError::format(text, "expected integer digits"));
    }

    let significant = int_digits.trim_start_matches('0');
    if significant.len() > INT_DIGITS {
        let value = significant.parse::<i64>().unwrap_or(i64::MAX);
        return Err(FixedPointError::IntegerOverflow {
            value: if negative { -value } else { value },
        });
    }
    let mut int_value = digits_value(significant);

    let kept = &frac_digits[..frac_digits.len().min(FRAC_DIGITS)];
    let mut frac_value = digits_value(kept) * 10_i64.pow((FRAC_DIGITS - kept.len()) as u32);
    if frac_digits.len() > FRAC_DIGITS && frac_digits.as_bytes()[FRAC_DIGITS] >= b'5' {
        frac_value += 1;
        if frac_value == SCALE_INTEGER {
            frac_value = 0;
            int_value += 1;
        }
    }
    if int_value > MAX_INT_DIGITS_VALUE {
        return Err(FixedPointError::IntegerOverflow {
            value: if negative { -int_value } else { int_value },
        });
    }

    Ok(format!(
        "{}{:0int$}.{:0frac$}",
        if negative { "-" } else { "" },
        int_value,
        frac_value,
        int = INT_DIGITS,
        frac = FRAC_DIGITS,
    ))
}

/// Split `[-]IIIII.FFFFFFFFFFF` into its sign and digit runs.
fn split_canonical(text: &str) -> Result<(bool, &str, &str)> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = body.split('.');
    let (Some(int_digits), Some(frac_digits), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixedPointError::format(text, "expected exactly one decimal point"));
    };
    if int_digits.len() != INT_DIGITS || !all_digits(int_digits) {
        return Err(FixedPointError::format(text, "expected exactly 5 integer digits"));
    }
    if frac_digits.len() != FRAC_DIGITS || !all_digits(frac_digits) {
        return Err(FixedPointError::format(text, "expected exactly 11 fractional digits"));
    }
    Ok((negative, int_digits, frac_digits))
}

/// Solve `scaled = A * 10^11 + F * FRACTION_MULTIPLIER` for the two fields.
fn compose(negative: bool, magnitude: i64) -> Result<u32> {
    // Negative magnitudes wrap through the offset the same way two's complement does.
    let scaled = if negative {
        NEGATIVE_OFFSET - magnitude
    } else {
        magnitude
    };
    if scaled < 0 {
        return Err(FixedPointError::IntegerOverflow {
            value: -(magnitude / SCALE_INTEGER),
        });
    }

    let int_field = scaled / SCALE_INTEGER;
    let frac_field = (scaled % SCALE_INTEGER) / FRACTION_MULTIPLIER;
    if int_field > MAX_INT_FIELD {
        return Err(FixedPointError::IntegerOverflow { value: int_field });
    }
    if frac_field > MAX_FRAC_FIELD {
        return Err(FixedPointError::FractionOverflow { value: frac_field });
    }

    let mut bits = ((int_field as u32) << 16) | (frac_field as u32);
    if negative {
        bits |= SIGN_BIT;
    }
    Ok(bits)
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Value of a validated ASCII digit run (at most 11 digits here).
fn digits_value(digits: &str) -> i64 {
    digits
        .bytes()
        .fold(0_i64, |acc, b| acc * 10 + i64::from(b - b'0'))
}
