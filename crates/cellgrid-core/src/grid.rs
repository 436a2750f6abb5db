//! Rectangular cell storage
//!
//! The grid is a dense row-major matrix that only ever grows. Every row has the
//! same length, and unpopulated slots hold the grid's default value.

use crate::CellValue;
use log::debug;

/// Dense, growable two-dimensional cell store
///
/// Structure: `Vec<row, Vec<col, CellValue>>`, always rectangular.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Row-major cell slots
    cells: Vec<Vec<CellValue>>,
    /// Number of columns in every row
    width: usize,
    /// Content of an unset slot
    default_value: CellValue,
}

impl Grid {
    /// Create an empty grid whose unset slots hold `default_value`
    pub fn new(default_value: CellValue) -> Self {
        Self {
            cells: Vec::new(),
            width: 0,
            default_value,
        }
    }

    /// The value that marks a slot as unset
    pub fn default_value(&self) -> &CellValue {
        &self.default_value
    }

    /// Current shape as `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cells.len(), self.width)
    }

    /// Check if `(row, col)` lies inside the allocated bounds
    pub fn contains(&self, row: u32, col: u16) -> bool {
        (row as usize) < self.cells.len() && (col as usize) < self.width
    }

    /// Grow to at least `rows` x `cols`, never shrinking
    ///
    /// New slots, in both new rows and the widened tail of existing rows, are
    /// filled with the default value.
    pub fn ensure_capacity(&mut self, rows: usize, cols: usize) {
        let (old_rows, old_cols) = self.dimensions();
        let cols = cols.max(self.width);

        if cols > self.width {
            for row in &mut self.cells {
                row.resize(cols, self.default_value.clone());
            }
            self.width = cols;
        }

        if rows > self.cells.len() {
            let blank = vec![self.default_value.clone(); self.width];
            self.cells.resize(rows, blank);
        }

        if self.dimensions() != (old_rows, old_cols) {
            debug!(
                "grid grew from {}x{} to {}x{}",
                old_rows,
                old_cols,
                self.cells.len(),
                self.width
            );
        }
    }

    /// Read a slot; anything outside the bounds reads as the default value
    pub fn read(&self, row: u32, col: u16) -> &CellValue {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .unwrap_or(&self.default_value)
    }

    /// Write a slot, growing the grid first if it lies outside the bounds
    pub fn write(&mut self, row: u32, col: u16, value: CellValue) {
        let (row, col) = (row as usize, col as usize);
        if row >= self.cells.len() || col >= self.width {
            self.ensure_capacity(row + 1, col + 1);
        }
        self.cells[row][col] = value;
    }

    /// Reset a slot to the default value without changing the grid's shape
    ///
    /// Returns `false` if the slot is outside the bounds.
    pub fn clear(&mut self, row: u32, col: u16) -> bool {
        match self
            .cells
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            Some(slot) => {
                *slot = self.default_value.clone();
                true
            }
            None => false,
        }
    }

    /// Check if a slot holds something other than the default value
    ///
    /// Numbers compare by value: with a default of `0`, a slot holding `0.0` is
    /// unset.
    pub fn is_populated(&self, row: u32, col: u16) -> bool {
        !self.read(row, col).same_content(&self.default_value)
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.cells.iter().map(Vec::as_slice)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(CellValue::Empty)
    }
}
