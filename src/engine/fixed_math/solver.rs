use smallvec::{smallvec, SmallVec};

use super::FixedNum;

/// Real roots of `a*x^2 + b*x + c = 0`, largest first.
///
/// Degenerates to the linear equation when `a` is zero; a constant equation
/// (`a == b == 0`) has no roots reported.
pub fn solve_quadratic(a: FixedNum, b: FixedNum, c: FixedNum) -> SmallVec<[FixedNum; 2]> {
    if a == FixedNum::ZERO {
        if b == FixedNum::ZERO {
            return SmallVec::new();
        }
        return smallvec![-(c / b)];
    }

    let discriminant = b * b - a * c * FixedNum::from_int(4);
    let double_a = a.redouble();

    if discriminant > FixedNum::ZERO {
        let sqrt_d = discriminant.sqrt();
        let first = (-b + sqrt_d) / double_a;
        let second = (-b - sqrt_d) / double_a;
        if first >= second {
            smallvec![first, second]
        } else {
            smallvec![second, first]
        }
    } else if discriminant == FixedNum::ZERO {
        smallvec![-(b / double_a)]
    } else {
        SmallVec::new()
    }
}
