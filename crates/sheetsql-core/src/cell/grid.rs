//! Rectangular grids of cell values

use super::CellValue;
use crate::error::{Error, Result};

/// A 2-D, row-major, rectangular block of cell values
///
/// Every row has exactly [`Grid::columns`] cells and no cell is itself an
/// array. Both invariants are checked whenever a row is added.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    columns: usize,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Create an empty grid that will hold rows of `columns` cells
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            cells: Vec::new(),
        }
    }

    /// Build a grid from rows, rejecting ragged rows and nested arrays
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(columns);
        for row in rows {
            grid.push_row(row)?;
        }
        Ok(grid)
    }

    /// Build a single-row grid
    pub fn from_row(row: Vec<CellValue>) -> Result<Self> {
        Self::from_rows(vec![row])
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        let index = self.rows();
        if row.len() != self.columns {
            return Err(Error::RaggedGrid {
                row: index,
                expected: self.columns,
                actual: row.len(),
            });
        }
        if let Some(col) = row.iter().position(|v| matches!(v, CellValue::Array(_))) {
            return Err(Error::NestedArray { row: index, col });
        }
        self.cells.extend(row);
        Ok(())
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.cells.len() / self.columns
        }
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by position
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        if col >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + col)
    }

    /// Get a row as a slice
    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        if row >= self.rows() {
            return None;
        }
        let start = row * self.columns;
        Some(&self.cells[start..start + self.columns])
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        // chunks_exact panics on zero
        self.cells.chunks_exact(self.columns.max(1))
    }

    /// Iterate down a column
    pub fn column(&self, col: usize) -> impl Iterator<Item = &CellValue> {
        let columns = self.columns;
        let skip = if col < columns { col } else { self.cells.len() };
        self.cells.iter().skip(skip).step_by(columns.max(1))
    }

    /// All cells in row-major order
    pub fn values(&self) -> &[CellValue] {
        &self.cells
    }

    /// Consume the grid into its row-major cells
    pub fn into_values(self) -> Vec<CellValue> {
        self.cells
    }
}
