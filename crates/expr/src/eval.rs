//! Minimal evaluator for rewritten expression text.
//!
//! Grammar (evaluated while parsing, no tree is kept):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | postfix
//! postfix := primary ('.' IDENT '(' args? ')')*
//! primary := '(' expr ')' | IDENT '(' args? ')' | IDENT '.' IDENT '(' args? ')'
//! args    := arg (',' arg)*
//! arg     := STRING | expr
//! ```

use std::fmt;

use q16_fixed_point::{FixedPoint, FixedPointVector};

use crate::error::{ExprError, Result};
use crate::rewriter::{SCALAR_CONSTRUCTOR, VECTOR_CONSTRUCTOR};
use crate::value::{BinaryOp, Value};

/// Namespace for static vector functions (`Vector.Area`)
const VECTOR_NAMESPACE: &str = "Vector";

/// Maximum nesting of parentheses and call arguments
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Ident(String),
    Str(String),
    Punct(char),
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::Ident(name) => f.write_str(name),
            Lexeme::Str(text) => write!(f, "\"{text}\""),
            Lexeme::Punct(c) => write!(f, "{c}"),
        }
    }
}

fn lex(text: &str) -> Result<Vec<Lexeme>> {
    let mut lexemes = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '+' | '-' | '*' | '/' | '(' | ')' | ',' | '.' => lexemes.push(Lexeme::Punct(c)),
            '"' => {
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, c)) => literal.push(c),
                        None => return Err(ExprError::UnexpectedEnd { expected: "closing quote" }),
                    }
                }
                lexemes.push(Lexeme::Str(literal));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = c.to_string();
                while let Some(&(_, next)) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '_') {
                        break;
                    }
                    ident.push(next);
                    chars.next();
                }
                lexemes.push(Lexeme::Ident(ident));
            }
            // Bare literals never survive rewriting, so anything else is an error.
            c => return Err(ExprError::UnexpectedChar { ch: c, offset }),
        }
    }

    Ok(lexemes)
}

/// A call argument: constructors take raw text, everything else takes values.
enum Arg {
    Text(String),
    Value(Value),
}

impl Arg {
    fn into_text(self, call: &str) -> Result<String> {
        match self {
            Arg::Text(text) => Ok(text),
            Arg::Value(value) => Err(ExprError::TypeMismatch {
                operation: call.to_string(),
                operand: value.kind_name(),
            }),
        }
    }

    fn into_value(self, call: &str) -> Result<Value> {
        match self {
            Arg::Value(value) => Ok(value),
            Arg::Text(_) => Err(ExprError::TypeMismatch {
                operation: call.to_string(),
                operand: "text",
            }),
        }
    }

    /// Scalars are promoted to length-1 vectors
    fn into_vector(self, call: &str) -> Result<FixedPointVector> {
        match self.into_value(call)? {
            Value::Vector(vector) => Ok(vector),
            Value::Scalar(scalar) => Ok(FixedPointVector::from(scalar)),
            Value::Integer(_) => Err(ExprError::TypeMismatch {
                operation: call.to_string(),
                operand: "integer",
            }),
        }
    }
}

fn check_arity(name: &str, args: &[Arg], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(ExprError::ArityMismatch {
            name: name.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Take exactly `N` arguments
fn take_args<const N: usize>(name: &str, args: Vec<Arg>) -> Result<[Arg; N]> {
    args.try_into().map_err(|args: Vec<Arg>| ExprError::ArityMismatch {
        name: name.to_string(),
        expected: N,
        got: args.len(),
    })
}

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn next(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn eat(&mut self, punct: char) -> bool {
        if self.peek() == Some(&Lexeme::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: char, expected: &'static str) -> Result<()> {
        match self.next() {
            Some(Lexeme::Punct(c)) if c == punct => Ok(()),
            Some(other) => Err(ExprError::UnexpectedToken {
                found: other.to_string(),
                expected,
            }),
            None => Err(ExprError::UnexpectedEnd { expected }),
        }
    }

    fn ident(&mut self, expected: &'static str) -> Result<String> {
        match self.next() {
            Some(Lexeme::Ident(name)) => Ok(name),
            Some(other) => Err(ExprError::UnexpectedToken {
                found: other.to_string(),
                expected,
            }),
            None => Err(ExprError::UnexpectedEnd { expected }),
        }
    }

    /// `expr` one nesting level down
    fn nested_expr(&mut self) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let value = self.expr();
        self.depth -= 1;
        value
    }

    fn expr(&mut self) -> Result<Value> {
        let mut lhs = self.term()?;
        loop {
            let op = if self.eat('+') {
                BinaryOp::Add
            } else if self.eat('-') {
                BinaryOp::Subtract
            } else {
                return Ok(lhs);
            };
            let rhs = self.term()?;
            lhs = Value::binary(op, &lhs, &rhs)?;
        }
    }

    fn term(&mut self) -> Result<Value> {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat('*') {
                BinaryOp::Multiply
            } else if self.eat('/') {
                BinaryOp::Divide
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = Value::binary(op, &lhs, &rhs)?;
        }
    }

    // Prefix minus runs are counted rather than recursed into.
    fn unary(&mut self) -> Result<Value> {
        let mut negations = 0_usize;
        while self.eat('-') {
            negations += 1;
        }
        let mut value = self.postfix()?;
        for _ in 0..negations {
            value = value.negate()?;
        }
        Ok(value)
    }

    fn postfix(&mut self) -> Result<Value> {
        let mut value = self.primary()?;
        while self.eat('.') {
            let method = self.ident("method name")?;
            let args = self.args()?;
            value = call_method(value, &method, args)?;
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value> {
        match self.next() {
            Some(Lexeme::Punct('(')) => {
                let value = self.nested_expr()?;
                self.expect(')', "')'")?;
                Ok(value)
            }
            Some(Lexeme::Ident(name)) => {
                if self.eat('.') {
                    let member = self.ident("function name")?;
                    let args = self.args()?;
                    call_static(&name, &member, args)
                } else {
                    let args = self.args()?;
                    call_function(&name, args)
                }
            }
            Some(other) => Err(ExprError::UnexpectedToken {
                found: other.to_string(),
                expected: "value",
            }),
            None => Err(ExprError::UnexpectedEnd { expected: "value" }),
        }
    }

    fn args(&mut self) -> Result<Vec<Arg>> {
        self.expect('(', "'('")?;
        let mut args = Vec::new();
        if self.eat(')') {
            return Ok(args);
        }
        loop {
            let arg = match self.peek() {
                Some(Lexeme::Str(text)) => {
                    let text = text.clone();
                    self.pos += 1;
                    Arg::Text(text)
                }
                _ => Arg::Value(self.nested_expr()?),
            };
            args.push(arg);
            if !self.eat(',') {
                break;
            }
        }
        self.expect(')', "',' or ')'")?;
        Ok(args)
    }
}

fn call_function(name: &str, args: Vec<Arg>) -> Result<Value> {
    if name == SCALAR_CONSTRUCTOR {
        let [text] = take_args(name, args)?;
        Ok(Value::Scalar(FixedPoint::parse(&text.into_text(name)?)?))
    } else if name == VECTOR_CONSTRUCTOR {
        let [text] = take_args(name, args)?;
        Ok(Value::Vector(FixedPointVector::parse(&text.into_text(name)?)?))
    } else if name.eq_ignore_ascii_case("Area") {
        area(name, args)
    } else {
        Err(ExprError::UnknownFunction(name.to_string()))
    }
}

fn call_static(namespace: &str, member: &str, args: Vec<Arg>) -> Result<Value> {
    if namespace == VECTOR_NAMESPACE && member.eq_ignore_ascii_case("Area") {
        return area(member, args);
    }
    Err(ExprError::UnknownFunction(format!("{namespace}.{member}")))
}

fn area(name: &str, args: Vec<Arg>) -> Result<Value> {
    let [a, b, c] = take_args(name, args)?;
    let (a, b, c) = (a.into_vector(name)?, b.into_vector(name)?, c.into_vector(name)?);
    Ok(Value::Scalar(FixedPointVector::area(&a, &b, &c)?))
}

fn call_method(receiver: Value, method: &str, args: Vec<Arg>) -> Result<Value> {
    if matches!(receiver, Value::Integer(_)) {
        return Err(ExprError::UnknownMethod {
            method: method.to_string(),
            receiver: "integer",
        });
    }

    let op = match method.to_ascii_lowercase().as_str() {
        "add" => BinaryOp::Add,
        "subtract" => BinaryOp::Subtract,
        "multiply" => BinaryOp::Multiply,
        "divide" => BinaryOp::Divide,
        "negate" => {
            check_arity(method, &args, 0)?;
            return receiver.negate();
        }
        _ => return call_vector_method(receiver, method, args),
    };
    let [rhs] = take_args(method, args)?;
    Value::binary(op, &receiver, &rhs.into_value(method)?)
}

fn call_vector_method(receiver: Value, method: &str, args: Vec<Arg>) -> Result<Value> {
    let Value::Vector(vector) = receiver else {
        return Err(ExprError::UnknownMethod {
            method: method.to_string(),
            receiver: receiver.kind_name(),
        });
    };

    match method.to_ascii_lowercase().as_str() {
        "dot" => {
            let [other] = take_args(method, args)?;
            Ok(Value::Scalar(vector.dot(&other.into_vector(method)?)?))
        }
        "wedge" => {
            let [other] = take_args(method, args)?;
            Ok(Value::Scalar(vector.wedge(&other.into_vector(method)?)?))
        }
        "int" => {
            check_arity(method, &args, 0)?;
            Ok(Value::Integer(vector.to_int()))
        }
        "len" => {
            check_arity(method, &args, 0)?;
            Ok(Value::Scalar(FixedPoint::from_f64(vector.len() as f64)))
        }
        _ => Err(ExprError::UnknownMethod {
            method: method.to_string(),
            receiver: "vector",
        }),
    }
}

/// Evaluate text already produced by the rewriter.
pub fn evaluate_rewritten(text: &str) -> Result<Value> {
    let lexemes = lex(text)?;
    if lexemes.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        lexemes,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.next() {
        None => Ok(value),
        Some(other) => Err(ExprError::UnexpectedToken {
            found: other.to_string(),
            expected: "operator or end of expression",
        }),
    }
}
