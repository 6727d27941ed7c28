use serde::{Deserialize, Serialize};

use crate::engine::fixed_math::{FixedNum, FixedVec2};

/// Shape discriminant. Orders edges before round bodies, which fixes the
/// orientation of body pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeCode {
    Edge = 1,
    Round = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// A circle.
    Round { radius: FixedNum },
    /// An axis-aligned world wall. `normal` points into the world and `edge`
    /// is the wall's coordinate along the normal's axis.
    Edge { normal: FixedVec2, edge: FixedNum },
}

impl Shape {
    pub fn code(&self) -> ShapeCode {
        match self {
            Shape::Round { .. } => ShapeCode::Round,
            Shape::Edge { .. } => ShapeCode::Edge,
        }
    }
}
