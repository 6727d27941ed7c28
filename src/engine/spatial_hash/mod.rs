use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::engine::body::BodyHandle;
use crate::engine::fixed_math::FixedNum;

mod grid;
mod query;

/// Coordinates of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// True when the two cells share a row or a column.
    pub const fn is_axis_aligned_with(self, other: Self) -> bool {
        self.col == other.col || self.row == other.row
    }
}

/// Uniform spatial partitioning grid, the broad phase of collision detection.
///
/// The grid divides the world into `cols × rows` square cells of side
/// `cell_size`, with its origin at `(0, 0)`. Each body lives in exactly the one
/// cell containing its position, so candidates for a body are found by scanning
/// its own cell and the eight around it.
///
/// # Example
///
/// ```rust
/// use kestrel::engine::body::BodyHandle;
/// use kestrel::engine::fixed_math::{FixedNum, FixedVec2};
/// use kestrel::engine::spatial_hash::SpatialHash;
///
/// let mut hash = SpatialHash::new(FixedNum::from_int(10), 8, 8);
/// let handle = slotmap::SlotMap::<BodyHandle, ()>::with_key().insert(());
///
/// let pos = FixedVec2::new(FixedNum::from_int(25), FixedNum::from_int(42));
/// let cell = hash.cell_of(pos).unwrap();
/// assert_eq!((cell.col, cell.row), (2, 4));
///
/// hash.insert(handle, cell);
/// assert_eq!(hash.cell_entities(cell), &[handle]);
/// ```
///
/// # Performance
///
/// - **Insert:** O(1) amortized
/// - **Remove / relocate:** O(k) in the size of the source cell
/// - **Neighborhood scan:** O(k) where k = bodies in the 3×3 block
///
/// # Implementation Notes
///
/// - Cells use small inline vectors instead of hash sets: iteration order then
///   depends only on insertion order, which keeps scans deterministic.
#[derive(Clone, Debug)]
pub struct SpatialHash {
    cell_size: FixedNum,
    cols: usize,
    rows: usize,
    cells: Vec<SmallVec<[BodyHandle; 4]>>,
}

impl SpatialHash {
    pub fn new(cell_size: FixedNum, cols: usize, rows: usize) -> Self {
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![SmallVec::new(); cols * rows],
        }
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Count the total number of entries across all cells.
    /// Useful for debugging and diagnostics.
    pub fn total_entries(&self) -> usize {
        self.cells.iter().map(|cell| cell.len()).sum()
    }

    /// Count the number of non-empty cells.
    pub fn non_empty_cells(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    // Getters for grid parameters
    pub fn cell_size(&self) -> FixedNum { self.cell_size }
    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }

    pub(crate) fn cell_index(&self, cell: GridCell) -> Option<usize> {
        (cell.col < self.cols && cell.row < self.rows).then(|| cell.row * self.cols + cell.col)
    }

    // Internal accessors for submodules
    pub(crate) fn cells(&self) -> &[SmallVec<[BodyHandle; 4]>] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [SmallVec<[BodyHandle; 4]>] {
        &mut self.cells
    }
}
