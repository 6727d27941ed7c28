use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::{FixedNum, MathError};

/// 2D vector of [`FixedNum`] components. Equality is component-wise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVec2 {
    pub x: FixedNum,
    pub y: FixedNum,
}

impl FixedVec2 {
    pub const ZERO: Self = Self { x: FixedNum::ZERO, y: FixedNum::ZERO };
    pub const X: Self = Self { x: FixedNum::ONE, y: FixedNum::ZERO };
    pub const Y: Self = Self { x: FixedNum::ZERO, y: FixedNum::ONE };

    pub const fn new(x: FixedNum, y: FixedNum) -> Self {
        Self { x, y }
    }

    pub const fn splat(value: FixedNum) -> Self {
        Self { x: value, y: value }
    }

    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: FixedNum::from_f64(x),
            y: FixedNum::from_f64(y),
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    pub fn length(self) -> FixedNum {
        let len_sq = self.length_squared();
        if len_sq == FixedNum::ZERO {
            return FixedNum::ZERO;
        }
        len_sq.sqrt()
    }

    pub fn length_squared(self) -> FixedNum {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction.
    ///
    /// # Panics
    ///
    /// Panics on a zero-length vector; see [`FixedVec2::try_normalize`].
    pub fn normalize(self) -> Self {
        match self.try_normalize() {
            Ok(unit) => unit,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_normalize(self) -> Result<Self, MathError> {
        let len = self.length();
        if len == FixedNum::ZERO {
            return Err(MathError::ZeroLengthNormalize);
        }
        Ok(self / len)
    }

    pub fn dot(self, other: Self) -> FixedNum {
        self.x * other.x + self.y * other.y
    }

    pub fn abs(self) -> Self {
        Self { x: self.x.abs(), y: self.y.abs() }
    }

    /// Signed length of the projection of `self` onto `axis`.
    ///
    /// Used for the approach speed along a collision normal. `axis` need not be
    /// unit length but must not be zero.
    pub fn project_onto_normal(self, axis: Self) -> FixedNum {
        self.dot(axis.normalize())
    }
}

impl Add for FixedVec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for FixedVec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<FixedNum> for FixedVec2 {
    type Output = Self;
    fn mul(self, rhs: FixedNum) -> Self::Output {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Mul<FixedVec2> for FixedNum {
    type Output = FixedVec2;
    fn mul(self, rhs: FixedVec2) -> Self::Output {
        rhs * self
    }
}

/// Component-wise product.
impl Mul for FixedVec2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self { x: self.x * rhs.x, y: self.y * rhs.y }
    }
}

impl Div<FixedNum> for FixedVec2 {
    type Output = Self;
    fn div(self, rhs: FixedNum) -> Self::Output {
        Self { x: self.x / rhs, y: self.y / rhs }
    }
}

/// Component-wise quotient.
impl Div for FixedVec2 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        Self { x: self.x / rhs.x, y: self.y / rhs.y }
    }
}

impl Neg for FixedVec2 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self { x: -self.x, y: -self.y }
    }
}

impl AddAssign for FixedVec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedVec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
