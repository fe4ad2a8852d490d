//! Per-cell mutation rules for one pointer stroke.
//!
//! A stroke runs from pointer-down to pointer-up (or pointer-leave, which is
//! treated the same). The value under the first cell is memoised at the
//! start; it decides the click-to-erase toggle on that first cell and, when
//! the toggle fires, turns the rest of the stroke into an erase stroke.

use crate::grid::Grid;
use crate::types::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Paint,
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stroke {
    initial_value: CellValue,
    /// Set once the first `stroke_move` has been applied.
    started: bool,
    /// Set when the first cell toggled off; the rest of the stroke erases.
    toggled_off: bool,
    last_cell: Option<(usize, usize)>,
    changed_cells: usize,
}

/// What a finished stroke did. `changed_cells == 0` means the grid is
/// untouched and no history entry is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeSummary {
    pub changed_cells: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintEngine {
    /// 1-based colour index painted in paint mode.
    pub active_color: CellValue,
    /// Alternate-input erase toggle; same effect as holding the erase modifier.
    pub background_active: bool,
    stroke: Option<Stroke>,
}

impl Default for PaintEngine {
    fn default() -> Self {
        PaintEngine {
            active_color: 1,
            background_active: false,
            stroke: None,
        }
    }
}

impl PaintEngine {
    pub fn new(active_color: CellValue) -> Self {
        PaintEngine {
            active_color: active_color.max(1),
            ..Default::default()
        }
    }

    pub fn in_stroke(&self) -> bool {
        self.stroke.is_some()
    }

    /// Begin a stroke at `(row, col)`, remembering the value found there.
    /// Starting while a stroke is active replaces it.
    pub fn stroke_start(&mut self, grid: &Grid, row: usize, col: usize) {
        self.stroke = Some(Stroke {
            initial_value: grid.get(row, col).unwrap_or(0),
            started: false,
            toggled_off: false,
            last_cell: None,
            changed_cells: 0,
        });
    }

    pub fn mode(&self, erase_held: bool) -> StrokeMode {
        let toggled = self.stroke.is_some_and(|s| s.toggled_off);
        if erase_held || self.background_active || toggled {
            StrokeMode::Erase
        } else {
            StrokeMode::Paint
        }
    }

    /// Apply the stroke to `(row, col)`. Returns `true` when the cell changed.
    /// Calls outside an active stroke, outside the grid, or on the same cell
    /// as the previous call do nothing.
    pub fn stroke_move(&mut self, grid: &mut Grid, row: usize, col: usize, erase_held: bool) -> bool {
        let mode = self.mode(erase_held);
        let active = self.active_color;
        let Some(stroke) = self.stroke.as_mut() else {
            return false;
        };
        if stroke.last_cell == Some((row, col)) {
            return false;
        }
        let Some(current) = grid.get(row, col) else {
            return false;
        };
        stroke.last_cell = Some((row, col));

        let use_initial_state = !stroke.started;
        stroke.started = true;

        let next = match mode {
            StrokeMode::Erase => {
                if use_initial_state && stroke.initial_value == 0 {
                    None
                } else if current != 0 {
                    Some(0)
                } else {
                    None
                }
            }
            StrokeMode::Paint => {
                if use_initial_state && stroke.initial_value == active {
                    stroke.toggled_off = true;
                    Some(0)
                } else if current != active {
                    Some(active)
                } else {
                    None
                }
            }
        };

        match next {
            Some(value) if value != current => {
                grid.set(row, col, value);
                stroke.changed_cells += 1;
                true
            }
            _ => false,
        }
    }

    /// Finish the stroke. `None` if no stroke was active.
    pub fn stroke_end(&mut self) -> Option<StrokeSummary> {
        self.stroke.take().map(|s| StrokeSummary {
            changed_cells: s.changed_cells,
        })
    }

    /// Drop an in-flight stroke without reporting it (used when the grid is
    /// replaced underneath it, e.g. by undo).
    pub fn abandon_stroke(&mut self) {
        self.stroke = None;
    }
}
