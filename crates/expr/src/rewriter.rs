//! Literal rewriting.
//!
//! Classifies tokens and replaces scalar and vector literals with constructor
//! calls the evaluator understands. Everything else passes through, and the
//! tokens are concatenated without separators.
//!
//! A prefix `-` directly before a decimal literal is folded into the literal,
//! so `-32768` reaches the codec as one negative number.

use q16_fixed_point::FixedPointVector;

use crate::tokenizer::{Token, TokenKind};

/// Constructor the evaluator exposes for scalar literals
pub const SCALAR_CONSTRUCTOR: &str = "ScalarFromText";

/// Constructor the evaluator exposes for vector literals
pub const VECTOR_CONSTRUCTOR: &str = "VectorFromText";

/// Joins two adjacent bracket groups inside one vector token
const SPLICE: &str = "],[";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralClass {
    /// `#` followed by hex digits
    HexScalar,
    /// `\d+(\.\d+)?`
    DecimalScalar,
    /// `[...]` of hex/decimal items, possibly spliced with `],[`
    VectorLiteral,
    Other,
}

pub fn classify(token: &str) -> LiteralClass {
    if is_hex_scalar(token) {
        LiteralClass::HexScalar
    } else if is_decimal_scalar(token) {
        LiteralClass::DecimalScalar
    } else if is_vector_literal(token) {
        LiteralClass::VectorLiteral
    } else {
        LiteralClass::Other
    }
}

/// Rewrite a token stream into evaluator text.
pub fn rewrite(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < tokens.len() {
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        match tokens.get(i + 1) {
            Some(next) if is_prefix_minus(prev, &tokens[i]) && is_decimal_run(next) => {
                out.push_str(&constructor_call(SCALAR_CONSTRUCTOR, &format!("-{}", next.text)));
                i += 2;
            }
            _ => {
                out.push_str(&rewrite_token(&tokens[i]));
                i += 1;
            }
        }
    }
    out
}

/// A `-` at the start or after an operator other than `)` negates its operand.
fn is_prefix_minus(prev: Option<&Token>, token: &Token) -> bool {
    token.kind == TokenKind::Operator
        && token.text == "-"
        && prev.map_or(true, |p| p.kind == TokenKind::Operator && p.text != ")")
}

fn is_decimal_run(token: &Token) -> bool {
    token.kind == TokenKind::Run && is_decimal_scalar(&token.text)
}

fn rewrite_token(token: &Token) -> String {
    match token.kind {
        // `x` is a multiplication alias; `*` cannot fuse with a following identifier.
        TokenKind::Operator if token.text == "x" => "*".to_string(),
        TokenKind::Operator | TokenKind::Dot => token.text.clone(),
        TokenKind::Run => match classify(&token.text) {
            LiteralClass::HexScalar | LiteralClass::DecimalScalar => {
                constructor_call(SCALAR_CONSTRUCTOR, &token.text)
            }
            LiteralClass::VectorLiteral => rewrite_vector(&token.text),
            LiteralClass::Other => token.text.clone(),
        },
    }
}

/// Rewrite each bracket group of a vector token; groups that do not parse as a
/// vector are left for the evaluator as written.
fn rewrite_vector(token: &str) -> String {
    vector_interior(token)
        .split(SPLICE)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let bracketed = format!("[{item}]");
            if FixedPointVector::parse(&bracketed).is_ok() {
                constructor_call(VECTOR_CONSTRUCTOR, &bracketed)
            } else {
                item.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn constructor_call(constructor: &str, literal: &str) -> String {
    format!("{constructor}(\"{literal}\")")
}

fn is_hex_scalar(token: &str) -> bool {
    token
        .strip_prefix('#')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_decimal_scalar(token: &str) -> bool {
    let (int_digits, frac_digits) = match token.split_once('.') {
        Some((int_digits, frac_digits)) => (int_digits, Some(frac_digits)),
        None => (token, None),
    };
    is_digits(int_digits) && frac_digits.map_or(true, is_digits)
}

fn is_vector_literal(token: &str) -> bool {
    if token.len() < 3 || !token.starts_with('[') || !token.ends_with(']') {
        return false;
    }
    vector_interior(token)
        .split(SPLICE)
        .flat_map(|group| group.split(','))
        .all(|item| {
            item.is_empty()
                || is_hex_scalar(item)
                || is_decimal_scalar(item.strip_prefix('-').unwrap_or(item))
        })
}

fn vector_interior(token: &str) -> &str {
    token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(token)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn rewritten(expression: &str) -> String {
        rewrite(&tokenize(expression))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("#fe8b8156"), LiteralClass::HexScalar);
        assert_eq!(classify("5"), LiteralClass::DecimalScalar);
        assert_eq!(classify("1.25"), LiteralClass::DecimalScalar);
        assert_eq!(classify("[5,#11]"), LiteralClass::VectorLiteral);
        assert_eq!(classify("[1],[-2]"), LiteralClass::VectorLiteral);
        assert_eq!(classify("Wedge"), LiteralClass::Other);
        assert_eq!(classify("#"), LiteralClass::Other);
        assert_eq!(classify("1.2.3"), LiteralClass::Other);
        assert_eq!(classify("1."), LiteralClass::Other);
        assert_eq!(classify("[]"), LiteralClass::Other);
        assert_eq!(classify("[a]"), LiteralClass::Other);
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(
            rewritten("5+5"),
            r#"ScalarFromText("5")+ScalarFromText("5")"#
        );
        assert_eq!(
            rewritten("#fe8b8156 * #ffdaa260"),
            r##"ScalarFromText("#fe8b8156")*ScalarFromText("#ffdaa260")"##
        );
    }

    #[test]
    fn test_x_becomes_star() {
        assert_eq!(
            rewritten("5x5"),
            r#"ScalarFromText("5")*ScalarFromText("5")"#
        );
    }

    #[test]
    fn test_vector_literals() {
        assert_eq!(
            rewritten("[5,5]+[5,17]"),
            r#"VectorFromText("[5,5]")+VectorFromText("[5,17]")"#
        );
        assert_eq!(
            rewritten("[5].Multiply([5])"),
            r#"VectorFromText("[5]").Multiply(VectorFromText("[5]"))"#
        );
    }

    #[test]
    fn test_spliced_vector_arguments() {
        assert_eq!(
            rewritten("Vector.Area([1,2],[3,4],[-5,6])"),
            r#"Vector.Area(VectorFromText("[1,2]"),VectorFromText("[3,4]"),VectorFromText("[-5,6]"))"#
        );
    }

    #[test]
    fn test_unparseable_group_passes_through() {
        assert_eq!(rewritten("[,]"), ",");
    }

    #[test]
    fn test_prefix_minus_folds_into_decimal() {
        assert_eq!(rewritten("-32768"), r#"ScalarFromText("-32768")"#);
        assert_eq!(
            rewritten("5*-2.5"),
            r#"ScalarFromText("5")*ScalarFromText("-2.5")"#
        );
        assert_eq!(
            rewritten("(-1)"),
            r#"(ScalarFromText("-1"))"#
        );
        assert_eq!(
            rewritten("--3"),
            r#"-ScalarFromText("-3")"#
        );
    }

    #[test]
    fn test_binary_minus_is_kept() {
        assert_eq!(
            rewritten("5-3"),
            r#"ScalarFromText("5")-ScalarFromText("3")"#
        );
        assert_eq!(
            rewritten("(5)-3"),
            r#"(ScalarFromText("5"))-ScalarFromText("3")"#
        );
        assert_eq!(rewritten("-#5"), r##"-ScalarFromText("#5")"##);
        assert_eq!(rewritten("-[1]"), r#"-VectorFromText("[1]")"#);
    }

    #[test]
    fn test_other_tokens_unchanged() {
        assert_eq!(rewritten("(Foo)"), "(Foo)");
        assert_eq!(rewritten("-"), "-");
    }
}
