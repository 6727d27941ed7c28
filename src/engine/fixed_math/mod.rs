//! Deterministic fixed-point mathematics library.
//!
//! This module provides deterministic math types and operations using fixed-point
//! arithmetic to ensure identical behavior across different platforms and architectures.
//! This is critical for lockstep networking and replays where every peer must simulate
//! identically.
//!
//! [`FixedNum`] is a decimal fixed-point number: a signed 64-bit integer scaled by
//! 10^6, so `1.5` is stored as `1_500_000`. Multiplication and division detect
//! operands that would overflow the direct computation and fall back to a split
//! evaluation, saturating only when the true result itself is out of range.

use thiserror::Error;

pub use num::{FixedNum, DECIMALS, SCALE};
pub use solver::solve_quadratic;
pub use trig::{acos, cos, sin, FRAC_3PI_2, FRAC_PI_2, PI, TAU};
pub use vec2::FixedVec2;

mod convert;
mod num;
mod solver;
mod trig;
mod vec2;

/// Domain errors raised by fixed-point operations.
///
/// The operator forms (`/`, [`FixedNum::sqrt`], [`FixedVec2::normalize`]) panic with
/// these; the `checked_*`/`try_*` forms return them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("square root of negative value {0}")]
    NegativeSqrt(FixedNum),
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthNormalize,
    #[error("acos argument {0} is outside [-1, 1]")]
    AcosOutOfDomain(FixedNum),
}

/// Error returned when parsing a decimal string into a [`FixedNum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFixedError {
    #[error("cannot parse a fixed-point number from an empty string")]
    Empty,
    #[error("invalid digit in fixed-point literal")]
    InvalidDigit,
    #[error("fixed-point literal has more than {} fractional digits", DECIMALS)]
    TooManyFractionalDigits,
    #[error("fixed-point literal is out of range")]
    OutOfRange,
}
