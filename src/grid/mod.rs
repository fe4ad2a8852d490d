//! The 2D matrix of cell values and the operations on it.
//!
//! A `Grid` is always a rectangle: exactly `height` rows of exactly `width`
//! cells. The rows are never handed out mutably as vectors, so nothing
//! outside this module can break that shape.

pub mod recolor;
pub mod resize;

pub use resize::{Edge, resize_centered, resize_from_edge};

use crate::error::GridShapeError;
use crate::types::CellValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<CellValue>>,
}

/// Tightest box (inclusive) around every non-zero cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl ContentBounds {
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }
}

impl Grid {
    /// An all-background grid.
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            rows: vec![vec![0; width]; height],
        }
    }

    pub fn from_rows(
        width: usize,
        height: usize,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, GridShapeError> {
        if rows.len() != height {
            return Err(GridShapeError::RowCount {
                expected: height,
                actual: rows.len(),
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridShapeError::RowLength {
                row,
                expected: width,
                actual: r.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            rows,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellValue> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Write one cell. Returns `false` when `(row, col)` is outside the grid.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|&v| v == 0)
    }

    pub fn count_painted(&self) -> usize {
        self.rows.iter().flatten().filter(|&&v| v != 0).count()
    }

    pub fn max_value(&self) -> CellValue {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    /// `None` when nothing is painted.
    pub fn content_bounds(&self) -> Option<ContentBounds> {
        let mut bounds: Option<ContentBounds> = None;
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let b = bounds.get_or_insert(ContentBounds {
                    min_row: r,
                    max_row: r,
                    min_col: c,
                    max_col: c,
                });
                b.min_row = b.min_row.min(r);
                b.max_row = b.max_row.max(r);
                b.min_col = b.min_col.min(c);
                b.max_col = b.max_col.max(c);
            }
        }
        bounds
    }

    /// Apply `f` to every cell in place.
    pub(crate) fn map_cells(&mut self, mut f: impl FnMut(CellValue) -> CellValue) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = f(*cell);
        }
    }
}
