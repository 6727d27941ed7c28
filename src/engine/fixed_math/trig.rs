//! Trigonometry over [`FixedNum`] radians.
//!
//! `cos` evaluates a Taylor series over the first quadrant and reflects into the
//! other three, so results depend only on integer arithmetic.

use super::{FixedNum, MathError};

pub const PI: FixedNum = FixedNum::from_raw(3_141_593);
pub const FRAC_PI_2: FixedNum = FixedNum::from_raw(1_570_796);
pub const FRAC_3PI_2: FixedNum = FixedNum::from_raw(4_712_389);
pub const TAU: FixedNum = FixedNum::from_raw(6_283_185);

/// Taylor terms after the constant: x^2/2! .. x^14/14!. The last term is below
/// one unit for every first-quadrant angle.
const SERIES_TERMS: i64 = 7;

/// Cosine of `x` in `[0, π/2]`.
fn cos_first_quadrant(x: FixedNum) -> FixedNum {
    let x_sq = x * x;
    let mut term = FixedNum::ONE;
    let mut sum = FixedNum::ONE;

    for n in 1..=SERIES_TERMS {
        term = term * x_sq / FixedNum::from_int(2 * n * (2 * n - 1));
        if n % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
    }

    sum.clamp(FixedNum::ZERO, FixedNum::ONE)
}

pub fn cos(alpha: FixedNum) -> FixedNum {
    let alpha = (alpha % TAU).abs();

    if alpha <= FRAC_PI_2 {
        cos_first_quadrant(alpha)
    } else if alpha <= PI {
        -cos_first_quadrant(PI - alpha)
    } else if alpha <= FRAC_3PI_2 {
        -cos_first_quadrant(alpha - PI)
    } else {
        cos_first_quadrant((TAU - alpha).max(FixedNum::ZERO))
    }
}

pub fn sin(alpha: FixedNum) -> FixedNum {
    cos(FRAC_PI_2 - alpha)
}

/// Inverse cosine in `[0, π]`, found by bisection on [`cos`].
pub fn acos(x: FixedNum) -> Result<FixedNum, MathError> {
    if x > FixedNum::ONE || x < -FixedNum::ONE {
        return Err(MathError::AcosOutOfDomain(x));
    }

    // cos is decreasing on [0, π]
    let mut lo = FixedNum::ZERO;
    let mut hi = PI;
    while hi - lo > FixedNum::EPSILON {
        let mid = lo + (hi - lo).halve();
        if cos(mid) > x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ok(lo)
}
