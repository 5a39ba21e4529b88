//! Literal-aware expression front end for Q16.16 values.
//!
//! Raw text such as `[5,5]+[5,17]` or `#fe8b8156 x #ffdaa260` is tokenized,
//! its literals rewritten into `ScalarFromText`/`VectorFromText` calls, and
//! the result evaluated by a small recursive-descent evaluator.

mod error;
pub mod eval;
pub mod rewriter;
pub mod tokenizer;
mod value;

pub use error::{ExprError, Result};
pub use value::{BinaryOp, Value};

/// Tokenize and rewrite expression text without evaluating it
pub fn prepare(expression: &str) -> String {
    rewriter::rewrite(&tokenizer::tokenize(expression))
}

/// Evaluate raw expression text
pub fn evaluate(expression: &str) -> Result<Value> {
    let tokens = tokenizer::tokenize(expression);
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let rewritten = rewriter::rewrite(&tokens);
    tracing::debug!(tokens = tokens.len(), rewritten = %rewritten, "Rewrote expression");
    eval::evaluate_rewritten(&rewritten)
}
