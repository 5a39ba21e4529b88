use num_bigint::BigInt;
use proptest::prelude::*;
use q16_fixed_point::{codec, FixedPoint, FixedPointError, FixedPointVector};

fn clamp(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

// Property 1: every 8-digit hex word survives hex -> decimal -> hex
proptest! {
    #[test]
    fn prop_hex_roundtrip(bits in any::<u32>()) {
        let hex = codec::format_hex(bits);
        let decimal = codec::hex_to_decimal(&hex).unwrap();
        prop_assert_eq!(codec::decimal_to_hex(&decimal).unwrap(), hex);
    }
}

// Property 2: canonical decimal text survives decimal -> hex -> decimal
proptest! {
    #[test]
    fn prop_decimal_roundtrip(bits in any::<u32>()) {
        let decimal = codec::bits_to_decimal(bits);
        prop_assert_eq!(decimal.trim_start_matches('-').len(), 17);
        let hex = codec::decimal_to_hex(&decimal).unwrap();
        prop_assert_eq!(codec::hex_to_decimal(&hex).unwrap(), decimal);
    }
}

// Property 3: decimal text parses back to the same scalar
proptest! {
    #[test]
    fn prop_scalar_decimal_view_roundtrip(raw in any::<i32>()) {
        let value = FixedPoint::from_raw(raw);
        prop_assert_eq!(FixedPoint::parse(&value.to_decimal_string()).unwrap(), value);
        prop_assert_eq!(FixedPoint::parse(&value.to_string()).unwrap(), value);
    }
}

// Property 4: addition and subtraction saturate instead of wrapping
proptest! {
    #[test]
    fn prop_add_sub_saturate(a in any::<i32>(), b in any::<i32>()) {
        let (x, y) = (FixedPoint::from_raw(a), FixedPoint::from_raw(b));
        prop_assert_eq!((x + y).raw(), clamp(a as i64 + b as i64));
        prop_assert_eq!((x - y).raw(), clamp(a as i64 - b as i64));
        prop_assert!(x + y >= FixedPoint::MIN && x + y <= FixedPoint::MAX);
    }
}

// Property 5: multiplication is commutative and within one step of the exact product
proptest! {
    #[test]
    fn prop_mul_commutative(a in any::<i32>(), b in any::<i32>()) {
        let (x, y) = (FixedPoint::from_raw(a), FixedPoint::from_raw(b));
        prop_assert_eq!(x * y, y * x);

        let exact = (a as i64 * b as i64) >> 16;
        let got = (x * y).raw() as i64;
        if exact > i32::MIN as i64 && exact < i32::MAX as i64 {
            prop_assert!((got - exact).abs() <= 1, "{} vs {}", got, exact);
        }
    }
}

// Property 6: division truncates toward zero and rejects a zero divisor
proptest! {
    #[test]
    fn prop_div_truncates(a in any::<i32>(), b in any::<i32>()) {
        let (x, y) = (FixedPoint::from_raw(a), FixedPoint::from_raw(b));
        if b == 0 {
            prop_assert_eq!(x.checked_div(y), Err(FixedPointError::DivideByZero));
        } else {
            let expected = clamp(((a as i64) << 16) / b as i64);
            prop_assert_eq!(x.checked_div(y).unwrap().raw(), expected);
        }
    }
}

// Property 7: wide hex literals unpack and repack to the same integer
proptest! {
    #[test]
    fn prop_packed_hex_roundtrip(bytes in prop::collection::vec(any::<u8>(), 5..24)) {
        let expected = BigInt::from_signed_bytes_be(&bytes);
        let vector = FixedPointVector::parse(&format!("[#{}]", to_hex(&bytes))).unwrap();
        prop_assert_eq!(vector.to_int(), expected);
    }
}

// Property 8: wide decimal literals unpack and repack to the same integer
proptest! {
    #[test]
    fn prop_packed_decimal_roundtrip(bytes in prop::collection::vec(any::<u8>(), 5..24)) {
        let expected = BigInt::from_signed_bytes_be(&bytes);
        prop_assume!(expected.to_signed_bytes_be().len() > 4);

        let vector = FixedPointVector::parse(&format!("[{expected}]")).unwrap();
        prop_assert!(vector.len() > 1);
        prop_assert_eq!(vector.to_int().to_string(), expected.to_string());
    }
}
