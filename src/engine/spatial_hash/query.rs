use crate::engine::body::BodyHandle;
use super::{GridCell, SpatialHash};

impl SpatialHash {
    pub fn cell_entities(&self, cell: GridCell) -> &[BodyHandle] {
        match self.cell_index(cell) {
            Some(idx) => &self.cells()[idx],
            None => &[],
        }
    }

    /// The 3×3 block of cells centered on `cell`, clipped to the grid, row by row.
    pub fn neighborhood(&self, cell: GridCell) -> impl Iterator<Item = GridCell> {
        let cols = self.cols();
        let rows = self.rows();
        let col_range = cell.col.saturating_sub(1)..=(cell.col + 1).min(cols.saturating_sub(1));
        let row_range = cell.row.saturating_sub(1)..=(cell.row + 1).min(rows.saturating_sub(1));

        row_range.flat_map(move |row| col_range.clone().map(move |col| GridCell::new(col, row)))
    }

    /// Candidates around `cell` together with the cell each was found in.
    ///
    /// Populates `out` instead of allocating, clearing it first. The query
    /// handle itself is excluded.
    pub fn query_neighbors(
        &self,
        query: BodyHandle,
        cell: GridCell,
        out: &mut Vec<(BodyHandle, GridCell)>,
    ) {
        out.clear();
        for neighbor in self.neighborhood(cell) {
            for &handle in self.cell_entities(neighbor) {
                if handle != query {
                    out.push((handle, neighbor));
                }
            }
        }
    }
}
