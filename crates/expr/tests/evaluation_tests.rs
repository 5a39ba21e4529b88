//! End-to-end evaluation of raw expression text

use q16_expr::{evaluate, prepare, ExprError, Value};
use q16_fixed_point::{FixedPoint, FixedPointError, FixedPointVector};

fn scalar(text: &str) -> Value {
    Value::Scalar(FixedPoint::parse(text).unwrap())
}

fn vector(text: &str) -> Value {
    Value::Vector(FixedPointVector::parse(text).unwrap())
}

fn eval(expression: &str) -> Value {
    evaluate(expression).unwrap_or_else(|e| panic!("{expression}: {e}"))
}

#[test]
fn test_scalar_arithmetic() {
    assert_eq!(eval("5+5"), scalar("10"));
    assert_eq!(eval("5*5"), scalar("25"));
    assert_eq!(eval("5x5"), scalar("25"));
    assert_eq!(eval("5/5"), scalar("1"));
    assert_eq!(eval("5-7"), scalar("#FFFE0000"));
    assert_eq!(eval("5"), scalar("#00050000"));
    assert_eq!(eval("1.5 * 2"), scalar("3"));
}

#[test]
fn test_hex_multiply_and_divide() {
    assert_eq!(eval("#fe8b8156 * #ffdaa260"), scalar("#365e8964"));
    assert_eq!(eval("#ffb38c91 x #d9a18f"), scalar("#bf01e79c"));
    assert_eq!(eval("#FF96D44B / #02A1DC59"), scalar("#FFFFD80C"));
    assert_eq!(eval("#00182358 / #018DCFF7"), scalar("#00000F88"));
}

#[test]
fn test_saturation() {
    assert_eq!(eval("30000 + 30000"), Value::Scalar(FixedPoint::MAX));
    assert_eq!(eval("-30000 - 30000"), Value::Scalar(FixedPoint::MIN));
}

#[test]
fn test_vector_arithmetic() {
    assert_eq!(eval("[5]+[5]"), vector("[10]"));
    assert_eq!(eval("[5,5]+[5,17]"), vector("[10,22]"));
    assert_eq!(eval("[5]*[5]"), vector("[25]"));
    assert_eq!(eval("[5].Multiply([5])"), vector("[25]"));
    assert_eq!(eval("[5]"), eval("[#00050000]"));
}

#[test]
fn test_scalar_vector_broadcast() {
    assert_eq!(eval("[1,2,3] * 2"), vector("[2,4,6]"));
    assert_eq!(eval("10 - [1,2]"), vector("[9,8]"));
}

#[test]
fn test_wedge() {
    assert_eq!(
        eval("[61257709769163094].Wedge([-10517511624487791])"),
        scalar("#775CA1C8")
    );
    assert_eq!(
        eval("[#ffdf000000000000].Wedge([#fffc0000fffb0000])"),
        scalar("#FF5B0000")
    );
}

#[test]
fn test_area() {
    assert_eq!(
        eval("Vector.Area([15199648742965248],[7883498371547648],[16325548650135552])"),
        scalar("#0075FE00")
    );
    assert_eq!(
        eval("Area([7036874418683904],[15199648742965248],[16325548650135552])"),
        scalar("#FF5B0000")
    );
    assert_eq!(
        eval("Vector.Area([7036874418683904],[7883498371547648],[15199648742965248])"),
        scalar("#FF274400")
    );
}

#[test]
fn test_int() {
    let expected = "8686210422573525601";
    assert_eq!(eval("[8686210422573525601].Int()").to_string(), expected);
    assert_eq!(eval("[#788b9e5b, #99ca6a61].Int()").to_string(), expected);
    assert!(matches!(eval("[5].Int()"), Value::Integer(_)));
}

#[test]
fn test_packed_literals() {
    assert_eq!(
        eval("[-10517511624487791]"),
        vector("[#FFDAA260, #FFB38C91]")
    );
    assert_eq!(
        eval("[-3201696213298670931]"),
        vector("[#D3914A41, #DF9E92AD]")
    );
}

#[test]
fn test_dot_and_len() {
    assert_eq!(eval("[1,2,3].Dot([4,5,6])"), scalar("32"));
    assert_eq!(eval("[1,2,3].len()"), scalar("3"));
}

#[test]
fn test_dimension_mismatch() {
    assert_eq!(
        evaluate("[1,2]+[1,2,3]"),
        Err(ExprError::FixedPoint(FixedPointError::DimensionMismatch {
            expected: 2,
            got: 3,
        }))
    );
    assert!(matches!(
        evaluate("[1,2,3].Wedge([1,2])"),
        Err(ExprError::FixedPoint(FixedPointError::DimensionMismatch { .. }))
    ));
}

#[test]
fn test_divide_by_zero() {
    assert_eq!(
        evaluate("5/0"),
        Err(ExprError::FixedPoint(FixedPointError::DivideByZero))
    );
}

#[test]
fn test_empty_and_malformed() {
    assert_eq!(evaluate(""), Err(ExprError::Empty));
    assert_eq!(evaluate("   "), Err(ExprError::Empty));
    assert!(evaluate("5+").is_err());
    assert!(evaluate("Foo(5)").is_err());
    assert!(evaluate("[5].Int() + 1").is_err());
}

#[test]
fn test_negative_literals() {
    assert_eq!(eval("-32768"), Value::Scalar(FixedPoint::MIN));
    assert_eq!(eval("-387.34080544522"), scalar("#FE7CA8C1"));
    assert_eq!(eval("5 - -3"), scalar("8"));
    assert_eq!(eval("-(5)"), scalar("-5"));
    assert!(matches!(
        evaluate("-32769"),
        Err(ExprError::FixedPoint(FixedPointError::IntegerOverflow { .. }))
    ));
}

#[test]
fn test_deep_input_does_not_overflow_the_stack() {
    assert_eq!(eval(&format!("{}5", "-".repeat(200_000))), scalar("5"));

    let nested = format!("{}5{}", "(".repeat(100_000), ")".repeat(100_000));
    assert!(matches!(evaluate(&nested), Err(ExprError::TooDeep { .. })));
}

#[test]
fn test_prepare() {
    assert_eq!(
        prepare("[5,5] + [5,17]"),
        r#"VectorFromText("[5,5]")+VectorFromText("[5,17]")"#
    );
}
