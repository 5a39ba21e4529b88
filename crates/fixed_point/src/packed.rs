//! Packed integer literals.
//!
//! A large integer literal is spread over several Q16.16 words: its minimal
//! two's-complement bytes are sign-extended to a multiple of four and cut into
//! big-endian 32-bit chunks, most significant first.

use num_bigint::{BigInt, Sign};
use num_traits::Num;

use crate::error::{FixedPointError, Result};
use crate::fixed::FixedPoint;

const WORD_BYTES: usize = 4;
const MAX_SCALAR_HEX_DIGITS: usize = 8;

/// Expand one literal token into one or more scalars.
///
/// Literals that fit in four bytes keep ordinary scalar semantics, so `5` is
/// `5.0` and `#d9a18f` is the raw word `0x00D9A18F`. Anything wider becomes a
/// packed sequence of raw words.
pub fn parse_many(token: &str) -> Result<Vec<FixedPoint>> {
    if token.contains('.') {
        return FixedPoint::parse(token).map(|value| vec![value]);
    }

    let is_hex = token.starts_with('#');
    let value = parse_integer(token)?;
    let bytes = value.to_signed_bytes_be();

    if bytes.len() <= WORD_BYTES {
        if is_hex && token.len() - 1 > MAX_SCALAR_HEX_DIGITS {
            // Sign-extension digits only; keep the low word.
            return Ok(vec![FixedPoint::from_bits(low_word(&bytes, &value))]);
        }
        return FixedPoint::parse(token).map(|value| vec![value]);
    }

    Ok(unpack_words(&value, &bytes))
}

/// Read a run of words back as one signed integer.
pub fn pack_words(words: &[FixedPoint]) -> BigInt {
    let bytes: Vec<u8> = words
        .iter()
        .flat_map(|word| word.to_bits().to_be_bytes())
        .collect();
    BigInt::from_signed_bytes_be(&bytes)
}

/// Parse `#`-prefixed two's-complement hex or signed decimal.
///
/// Hex digits are read as two's complement of their own width: a leading digit
/// of 8 or above makes the value negative.
fn parse_integer(token: &str) -> Result<BigInt> {
    if let Some(digits) = token.strip_prefix('#') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FixedPointError::format(token, "expected hex digits after '#'"));
        }
        let magnitude = BigInt::from_str_radix(digits, 16)
            .map_err(|_| FixedPointError::format(token, "invalid hex literal"))?;
        let negative = matches!(digits.as_bytes()[0], b'8'..=b'9' | b'a'..=b'f' | b'A'..=b'F');
        if negative {
            return Ok(magnitude - (BigInt::from(1) << (4 * digits.len())));
        }
        return Ok(magnitude);
    }

    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FixedPointError::format(token, "expected an integer literal"));
    }
    BigInt::from_str_radix(token, 10)
        .map_err(|_| FixedPointError::format(token, "invalid integer literal"))
}

fn unpack_words(value: &BigInt, bytes: &[u8]) -> Vec<FixedPoint> {
    let pad = if value.sign() == Sign::Minus { 0xFF } else { 0x00 };
    let padding = (WORD_BYTES - bytes.len() % WORD_BYTES) % WORD_BYTES;

    let mut extended = vec![pad; padding];
    extended.extend_from_slice(bytes);

    extended
        .chunks_exact(WORD_BYTES)
        .map(|chunk| {
            FixedPoint::from_bits(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        })
        .collect()
}

fn low_word(bytes: &[u8], value: &BigInt) -> u32 {
    let pad = if value.sign() == Sign::Minus { 0xFF } else { 0x00 };
    let mut word = [pad; WORD_BYTES];
    word[WORD_BYTES - bytes.len()..].copy_from_slice(bytes);
    u32::from_be_bytes(word)
}
