//! Literal-aware tokenizer.
//!
//! One forward pass over the whitespace-free text with a single character of
//! lookahead. Operator characters always stand alone; everything else
//! accumulates into literal/identifier runs. Two characters depend on context:
//!
//! - `.` is a decimal point when followed by a digit or `#`, and a member
//!   access otherwise (`1.5` vs `[5].Dot(...)`);
//! - `-` is an operator only outside `[...]`, so signed packed literals such as
//!   `[-10517511624487791]` stay in one run.

/// Characters that always form a single-character token
pub const OPERATORS: [char; 6] = ['+', '*', 'x', '/', '(', ')'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of [`OPERATORS`] or a top-level `-`
    Operator,
    /// Member-access dot
    Dot,
    /// Literal or identifier run
    Run,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn single(kind: TokenKind, c: char) -> Self {
        Self {
            kind,
            text: c.to_string(),
        }
    }
}

/// Split expression text into tokens, in source order.
pub fn tokenize(expression: &str) -> Vec<Token> {
    let chars: Vec<char> = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut bracket_depth = 0_usize;

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let single = match c {
            c if OPERATORS.contains(&c) => Some(TokenKind::Operator),
            '-' if bracket_depth == 0 => Some(TokenKind::Operator),
            '.' if !next.is_some_and(|n| n.is_ascii_digit() || n == '#') => Some(TokenKind::Dot),
            _ => None,
        };

        match single {
            Some(kind) => {
                flush_run(&mut run, &mut tokens);
                tokens.push(Token::single(kind, c));
            }
            None => {
                match c {
                    '[' => bracket_depth += 1,
                    ']' => bracket_depth = bracket_depth.saturating_sub(1),
                    _ => {}
                }
                run.push(c);
            }
        }
    }
    flush_run(&mut run, &mut tokens);

    tokens
}

fn flush_run(run: &mut String, tokens: &mut Vec<Token>) {
    if !run.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Run,
            text: std::mem::take(run),
        });
    }
}
