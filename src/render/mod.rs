//! Render pipeline: turns grid state plus layout into rectangle fills.
//!
//! The pipeline is pure with respect to the session: it reads a grid, a
//! colour map and cell sizes, and issues `fill_rect` calls on whatever
//! surface the host provides. It knows nothing about terminals or browsers.

use crate::geometry::CellSize;
use crate::grid::Grid;
use crate::types::{CellValue, Rgb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A drawing target. Coordinates are in host units and may be fractional;
/// the surface does its own pixel snapping.
pub trait Surface {
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb);
}

/// Resolves cell values to colours.
#[derive(Debug, Clone, Copy)]
pub struct ColorMap<'a> {
    pub background: Rgb,
    pub pattern: &'a [Rgb],
}

impl ColorMap<'_> {
    /// Values without a colour draw as background.
    pub fn color_of(&self, value: CellValue) -> Rgb {
        match value {
            0 => self.background,
            v => self
                .pattern
                .get(v as usize - 1)
                .copied()
                .unwrap_or(self.background),
        }
    }
}

/// Draw the editor canvas with its top-left corner at `origin`.
pub fn draw_editor<S: Surface + ?Sized>(
    surface: &mut S,
    origin: (f64, f64),
    grid: &Grid,
    colors: ColorMap<'_>,
    cell: CellSize,
) {
    draw_tile(surface, origin, grid, colors, cell);
}

/// Draw `repeat_x × repeat_y` copies of the grid side by side, each cell
/// `cell` large.
pub fn draw_preview<S: Surface + ?Sized>(
    surface: &mut S,
    origin: (f64, f64),
    grid: &Grid,
    colors: ColorMap<'_>,
    cell: CellSize,
    repeat: (u32, u32),
) {
    let tile_w = cell.width * grid.width() as f64;
    let tile_h = cell.height * grid.height() as f64;
    for ty in 0..repeat.1 {
        for tx in 0..repeat.0 {
            let tile_origin = (
                origin.0 + tx as f64 * tile_w,
                origin.1 + ty as f64 * tile_h,
            );
            draw_tile(surface, tile_origin, grid, colors, cell);
        }
    }
}

fn draw_tile<S: Surface + ?Sized>(
    surface: &mut S,
    origin: (f64, f64),
    grid: &Grid,
    colors: ColorMap<'_>,
    cell: CellSize,
) {
    for (r, row) in grid.rows().iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            surface.fill_rect(
                PixelRect {
                    x: origin.0 + c as f64 * cell.width,
                    y: origin.1 + r as f64 * cell.height,
                    width: cell.width,
                    height: cell.height,
                },
                colors.color_of(value),
            );
        }
    }
}

/// Grid cell under a point given relative to the canvas origin.
pub fn cell_at(x: f64, y: f64, cell: CellSize, grid_w: usize, grid_h: usize) -> Option<(usize, usize)> {
    if x < 0.0 || y < 0.0 || cell.width <= 0.0 || cell.height <= 0.0 {
        return None;
    }
    let col = (x / cell.width).floor() as usize;
    let row = (y / cell.height).floor() as usize;
    (row < grid_h && col < grid_w).then_some((row, col))
}

/// Coalesces redraw requests: however many arrive between two frames, the
/// next frame redraws once.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
    coalesced: u64,
}

impl FrameScheduler {
    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
        }
        self.pending = true;
    }

    /// Called once per frame; `true` if a redraw is due.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Requests absorbed into an already-pending redraw so far.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
