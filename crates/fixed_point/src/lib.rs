//! Q16.16 Fixed-Point Encoding
//!
//! Bit-exact codec between Q16.16 words and fixed-format decimal text, plus
//! saturating scalar and vector arithmetic matching the target ALU.
//! Values are i32 words scaled by 2^16.

pub mod codec;
mod error;
mod fixed;
pub mod packed;
mod vector;

pub use error::{FixedPointError, Result};
pub use fixed::{FixedPoint, FRAC_BITS};
pub use vector::FixedPointVector;
