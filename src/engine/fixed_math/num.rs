use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign,
};

use serde::{Deserialize, Serialize};

use super::MathError;

/// Scale factor between the raw integer and the represented value.
pub const SCALE: i64 = 1_000_000;

/// Number of fractional decimal digits.
pub const DECIMALS: usize = 6;

/// Largest raw magnitude for which the product of two raw values fits in an i64
/// (`floor(sqrt(i64::MAX))`).
const MUL_SAFE_RAW: u64 = 3_037_000_499;

/// Largest raw dividend magnitude that can be multiplied by [`SCALE`] without overflow.
const DIV_SAFE_RAW: u64 = (i64::MAX / SCALE) as u64;

/// Deterministic decimal fixed-point number used throughout the simulation.
///
/// Stores `round(real * 10^6)` in an `i64`, giving a range of roughly
/// ±9.2 trillion with a resolution of 0.000001.
///
/// # Arithmetic
///
/// - `+`/`-` are plain integer operations on the raw value; callers keep values
///   within the ranges the simulation works in.
/// - `*` and `/` never overflow in intermediate steps. Results whose true
///   value does not fit saturate to [`FixedNum::MAX`]/[`FixedNum::MIN`].
/// - Equality and ordering compare the raw integers; there is no epsilon.
///
/// Serialized as the raw scaled integer.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedNum(i64);

impl FixedNum {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);
    pub const HALF: Self = Self(SCALE / 2);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);
    /// Smallest positive value (one unit in the last place).
    pub const EPSILON: Self = Self(1);

    /// Wrap a raw scaled integer (`1_500_000` is `1.5`).
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw scaled integer.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whole number; saturates outside the representable range.
    pub const fn from_int(value: i64) -> Self {
        Self(value.saturating_mul(SCALE))
    }

    /// Integer part, truncated toward zero.
    pub const fn to_int(self) -> i64 {
        self.0 / SCALE
    }

    /// Largest integer not greater than the value.
    pub const fn floor_int(self) -> i64 {
        self.0.div_euclid(SCALE)
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// `-1`, `0` or `1` as a fixed-point value.
    pub const fn signum(self) -> Self {
        Self(self.0.signum() * SCALE)
    }

    pub const fn halve(self) -> Self {
        Self(self.0 / 2)
    }

    pub const fn redouble(self) -> Self {
        Self(self.0.saturating_mul(2))
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(div_raw(self.0, rhs.0)))
    }

    pub fn checked_rem(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        // i64::MIN % -1 is the only overflowing case and its remainder is zero
        Ok(Self(self.0.checked_rem(rhs.0).unwrap_or(0)))
    }

    /// Square root, rounded down to the nearest representable value.
    ///
    /// # Panics
    ///
    /// Panics if `self` is negative. Use [`FixedNum::checked_sqrt`] to handle that case.
    pub fn sqrt(self) -> Self {
        match self.checked_sqrt() {
            Ok(root) => root,
            Err(err) => panic!("{err}"),
        }
    }

    /// Square root computed by integer Newton–Raphson on `raw * SCALE`.
    ///
    /// The result never overestimates: `root * root <= raw * SCALE < (root + 1)^2`
    /// on the raw integers.
    pub fn checked_sqrt(self) -> Result<Self, MathError> {
        if self.0 < 0 {
            return Err(MathError::NegativeSqrt(self));
        }
        if self.0 == 0 {
            return Ok(Self::ZERO);
        }

        let square = u128::from(self.0.unsigned_abs()) * SCALE as u128;
        let root = isqrt_newton(square);
        // sqrt(i64::MAX * SCALE) < i64::MAX, so this cannot truncate
        Ok(Self(root as i64))
    }
}

/// Floor square root of `square` by Newton–Raphson.
///
/// The seed is the smallest power of two above the root, so iterates decrease
/// monotonically; the first non-decreasing step means the previous iterate is
/// the floor of the root.
fn isqrt_newton(square: u128) -> u128 {
    let bits = u128::BITS - square.leading_zeros();
    let mut root = 1u128 << bits.div_ceil(2);

    loop {
        let next = (root + square / root) >> 1;
        if next >= root {
            return root;
        }
        root = next;
    }
}

const fn saturated(negative: bool) -> i64 {
    if negative {
        i64::MIN
    } else {
        i64::MAX
    }
}

/// `trunc(a * b / SCALE)` on raw values.
pub(super) fn mul_raw(a: i64, b: i64) -> i64 {
    if a.unsigned_abs() <= MUL_SAFE_RAW && b.unsigned_abs() <= MUL_SAFE_RAW {
        (a * b) / SCALE
    } else {
        mul_split(a, b)
    }
}

/// Multiplication through integer/fractional decomposition.
///
/// With `a = ai*S + af` and `b = bi*S + bf`:
/// `a*b/S = ai*bi*S + ai*bf + af*bi + af*bf/S`. Every partial product fits in
/// an i64 whenever the final result does.
pub(super) fn mul_split(a: i64, b: i64) -> i64 {
    let (ai, af) = (a / SCALE, a % SCALE);
    let (bi, bf) = (b / SCALE, b % SCALE);
    let negative = (a < 0) != (b < 0);

    let fraction = af * bf;
    let whole = ai
        .checked_mul(bi)
        .and_then(|p| p.checked_mul(SCALE))
        .and_then(|p| p.checked_add(ai.checked_mul(bf)?))
        .and_then(|p| p.checked_add(af.checked_mul(bi)?))
        .and_then(|p| p.checked_add(fraction / SCALE));

    let Some(whole) = whole else {
        return saturated(negative);
    };

    // Truncate toward zero when the leftover fraction has the opposite sign
    let leftover = fraction % SCALE;
    if whole > 0 && leftover < 0 {
        whole - 1
    } else if whole < 0 && leftover > 0 {
        whole + 1
    } else {
        whole
    }
}

/// `trunc(a * SCALE / b)` on raw values; `b` must be non-zero.
pub(super) fn div_raw(a: i64, b: i64) -> i64 {
    if a.unsigned_abs() <= DIV_SAFE_RAW {
        (a * SCALE) / b
    } else {
        div_split(a, b)
    }
}

/// Division for dividends too large to scale first: divide, then scale the
/// remainder.
pub(super) fn div_split(a: i64, b: i64) -> i64 {
    let negative = (a < 0) != (b < 0);

    let (Some(quotient), Some(remainder)) = (a.checked_div(b), a.checked_rem(b)) else {
        return saturated(negative);
    };

    // |remainder| < |b|, so the scaled remainder divided by b is below SCALE
    let fraction = (i128::from(remainder) * i128::from(SCALE) / i128::from(b)) as i64;

    quotient
        .checked_mul(SCALE)
        .and_then(|whole| whole.checked_add(fraction))
        .unwrap_or(saturated(negative))
}

impl Add for FixedNum {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FixedNum {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for FixedNum {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(mul_raw(self.0, rhs.0))
    }
}

impl Div for FixedNum {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on division by zero, like the integer types.
    fn div(self, rhs: Self) -> Self::Output {
        match self.checked_div(rhs) {
            Ok(quotient) => quotient,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Rem for FixedNum {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self::Output {
        match self.checked_rem(rhs) {
            Ok(remainder) => remainder,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Neg for FixedNum {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl AddAssign for FixedNum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedNum {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FixedNum {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for FixedNum {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl std::iter::Sum for FixedNum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
