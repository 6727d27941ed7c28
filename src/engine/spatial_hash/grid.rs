use crate::engine::body::BodyHandle;
use crate::engine::fixed_math::FixedVec2;
use super::{GridCell, SpatialHash};

impl SpatialHash {
    /// Cell containing `pos`: `floor(pos / cell_size)` per axis, or `None` off the grid.
    pub fn cell_of(&self, pos: FixedVec2) -> Option<GridCell> {
        // Floor division on the raw values; a fixed-point quotient would truncate
        // small negatives to zero
        let size = self.cell_size().raw();
        let col = pos.x.raw().div_euclid(size);
        let row = pos.y.raw().div_euclid(size);

        let col = usize::try_from(col).ok().filter(|&c| c < self.cols())?;
        let row = usize::try_from(row).ok().filter(|&r| r < self.rows())?;
        Some(GridCell::new(col, row))
    }

    /// Insert a handle into a cell. Out-of-grid cells are ignored and reported as `false`.
    pub fn insert(&mut self, handle: BodyHandle, cell: GridCell) -> bool {
        let Some(idx) = self.cell_index(cell) else {
            return false;
        };
        self.cells_mut()[idx].push(handle);
        true
    }

    /// Remove a handle from a specific cell, keeping the order of the rest.
    pub fn remove(&mut self, handle: BodyHandle, cell: GridCell) -> bool {
        let Some(idx) = self.cell_index(cell) else {
            return false;
        };
        let entries = &mut self.cells_mut()[idx];
        let before = entries.len();
        entries.retain(|h| *h != handle);
        entries.len() != before
    }

    /// Move a handle between cells. Used when a body crosses a cell border.
    pub fn relocate(&mut self, handle: BodyHandle, from: GridCell, to: GridCell) {
        if from == to {
            return;
        }
        self.remove(handle, from);
        self.insert(handle, to);
    }

    /// Every cell the handle is registered in; a consistent grid yields exactly one.
    pub fn cells_containing(&self, handle: BodyHandle) -> Vec<GridCell> {
        self.cells()
            .iter()
            .enumerate()
            .filter(|(_, entries)| entries.contains(&handle))
            .map(|(idx, _)| GridCell::new(idx % self.cols(), idx / self.cols()))
            .collect()
    }
}
