//! Grid - rectangular partition of material cells
//!
//! Cells are stored row-major (`nx * j + i`) with `j = 0` the bottom row.
//! The grid is the edit-mode model; a simulation run snapshots it into
//! blocks and faces once at start.

use crate::core::EngineError;

use super::materials::MaterialId;

/// Number of cells in an `nx` x `ny` grid, counted in `usize`.
#[inline]
pub(crate) fn cell_count(nx: u32, ny: u32) -> usize {
    nx as usize * ny as usize
}

pub struct Grid {
    nx: u32,
    ny: u32,
    cells: Vec<Option<MaterialId>>,
}

impl Grid {
    pub fn new(nx: u32, ny: u32) -> Self {
        Self {
            nx,
            ny,
            cells: vec![None; cell_count(nx, ny)],
        }
    }

    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    #[inline]
    pub fn index(&self, i: u32, j: u32) -> usize {
        self.nx as usize * j as usize + i as usize
    }

    #[inline]
    pub fn in_bounds(&self, i: u32, j: u32) -> bool {
        i < self.nx && j < self.ny
    }

    #[inline]
    pub fn is_perimeter(&self, i: u32, j: u32) -> bool {
        i == 0 || j == 0 || i + 1 == self.nx || j + 1 == self.ny
    }

    pub fn get(&self, i: u32, j: u32) -> Option<MaterialId> {
        if !self.in_bounds(i, j) {
            return None;
        }
        self.cells[self.index(i, j)]
    }

    pub fn set_cell(&mut self, i: u32, j: u32, material: MaterialId) -> Result<(), EngineError> {
        self.check_bounds(i, j)?;
        let idx = self.index(i, j);
        self.cells[idx] = Some(material);
        Ok(())
    }

    /// Empties a cell; returns the material that was there.
    pub fn clear_cell(&mut self, i: u32, j: u32) -> Result<Option<MaterialId>, EngineError> {
        self.check_bounds(i, j)?;
        let idx = self.index(i, j);
        Ok(self.cells[idx].take())
    }

    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn cells(&self) -> &[Option<MaterialId>] {
        &self.cells
    }

    fn check_bounds(&self, i: u32, j: u32) -> Result<(), EngineError> {
        if self.in_bounds(i, j) {
            Ok(())
        } else {
            Err(EngineError::CellOutOfBounds { i, j, nx: self.nx, ny: self.ny })
        }
    }
}

/// Cell -> block index mapping produced while building bodies from a grid.
///
/// Empty cells and the player cell map to `None`.
#[derive(Clone, Debug)]
pub struct BlockMap {
    nx: u32,
    ny: u32,
    ids: Vec<Option<u32>>,
}

impl BlockMap {
    pub fn new(nx: u32, ny: u32) -> Self {
        Self { nx, ny, ids: vec![None; cell_count(nx, ny)] }
    }

    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    #[inline]
    pub fn get(&self, i: u32, j: u32) -> Option<u32> {
        if i >= self.nx || j >= self.ny {
            return None;
        }
        self.ids[self.nx as usize * j as usize + i as usize]
    }

    pub(crate) fn set(&mut self, i: u32, j: u32, block: u32) {
        let idx = self.nx as usize * j as usize + i as usize;
        self.ids[idx] = Some(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_round_trip() {
        let mut grid = Grid::new(4, 3);
        grid.set_cell(1, 2, MaterialId(3)).expect("in bounds");
        assert_eq!(grid.get(1, 2), Some(MaterialId(3)));
        assert_eq!(grid.populated_count(), 1);
        assert_eq!(grid.clear_cell(1, 2), Ok(Some(MaterialId(3))));
        assert_eq!(grid.get(1, 2), None);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut grid = Grid::new(4, 3);
        let err = grid.set_cell(4, 0, MaterialId(0)).unwrap_err();
        assert_eq!(err, EngineError::CellOutOfBounds { i: 4, j: 0, nx: 4, ny: 3 });
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn cell_count_does_not_wrap_for_large_grids() {
        assert_eq!(cell_count(70_000, 70_000), 4_900_000_000);
        assert_eq!(cell_count(u32::MAX, 2), 2 * u32::MAX as usize);
    }

    #[test]
    fn perimeter_covers_all_edges() {
        let grid = Grid::new(3, 3);
        assert!(grid.is_perimeter(0, 1));
        assert!(grid.is_perimeter(2, 1));
        assert!(grid.is_perimeter(1, 0));
        assert!(grid.is_perimeter(1, 2));
        assert!(!grid.is_perimeter(1, 1));
    }
}
