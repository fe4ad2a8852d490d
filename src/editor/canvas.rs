use std::io;

use crossterm::{cursor, queue, style};

use crate::render::{self, PixelRect, Surface};
use crate::types::Rgb;

use super::state::EditorState;
use super::ui::Layout;

/// Off-screen grid of terminal cells that the render pipeline fills.
///
/// A rectangle covers the columns `floor(x)..floor(x + width)` and likewise
/// for rows, so adjacent fractional rectangles never overlap or leave gaps.
/// Rectangles narrower than one cell still paint the cell they start in.
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Option<Rgb>>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        CellBuffer {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Queue the buffer at `(origin_x, origin_y)`, one run of spaces per
    /// colour change. Unfilled cells are skipped.
    pub fn flush(&self, stdout: &mut io::Stdout, origin_x: u16, origin_y: u16) -> anyhow::Result<()> {
        for y in 0..self.height {
            let mut x = 0;
            while x < self.width {
                let Some(color) = self.get(x, y) else {
                    x += 1;
                    continue;
                };
                let start = x;
                while x < self.width && self.get(x, y) == Some(color) {
                    x += 1;
                }
                queue!(
                    stdout,
                    cursor::MoveTo(origin_x + start, origin_y + y),
                    style::SetBackgroundColor(to_terminal(color)),
                    style::Print(" ".repeat((x - start) as usize)),
                )?;
            }
        }
        queue!(stdout, style::ResetColor)?;
        Ok(())
    }
}

impl Surface for CellBuffer {
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        let span = |start: f64, len: f64, limit: u16| {
            let lo = start.floor().max(0.0).min(limit as f64) as u16;
            let hi = (start + len).floor().max(0.0).min(limit as f64) as u16;
            // Sub-cell rects still cover the cell they start in.
            let hi = if len > 0.0 && hi == lo { (lo + 1).min(limit) } else { hi };
            lo..hi
        };
        let cols = span(rect.x, rect.width, self.width);
        for y in span(rect.y, rect.height, self.height) {
            let row = y as usize * self.width as usize;
            for x in cols.clone() {
                self.cells[row + x as usize] = Some(color);
            }
        }
    }
}

pub fn to_terminal(color: Rgb) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Draw the editor canvas, the keyboard cursor and the tiled preview.
pub fn render_canvases(stdout: &mut io::Stdout, layout: &Layout, state: &EditorState) -> anyhow::Result<()> {
    let session = &state.session;
    let grid = session.grid();
    let colors = session.color_map();
    let canvases = &layout.canvases;

    let mut buffer = CellBuffer::new(layout.canvas_width, layout.canvas_height);
    render::draw_editor(&mut buffer, (0.0, 0.0), grid, colors, canvases.cell);
    let preview_origin = (
        layout.preview_x.saturating_sub(layout.canvas_x) as f64,
        layout.preview_y.saturating_sub(layout.canvas_y) as f64,
    );
    render::draw_preview(
        &mut buffer,
        preview_origin,
        grid,
        colors,
        canvases.preview_cell,
        session.effective_preview_repeat(),
    );
    buffer.flush(stdout, layout.canvas_x, layout.canvas_y)?;

    render_cursor(stdout, layout, state)
}

fn render_cursor(stdout: &mut io::Stdout, layout: &Layout, state: &EditorState) -> anyhow::Result<()> {
    let (row, col) = state.cursor;
    let cell = layout.cell();
    let x = (col as f64 * cell.width).floor();
    let y = (row as f64 * cell.height).floor();
    if x >= layout.canvas_width as f64 || y >= layout.canvas_height as f64 {
        return Ok(());
    }
    let under = state
        .session
        .grid()
        .get(row, col)
        .map_or(state.session.background_color(), |v| state.session.color_map().color_of(v));
    let fg = if under.luminance() > 0.5 { Rgb::BLACK } else { Rgb::WHITE };
    queue!(
        stdout,
        cursor::MoveTo(layout.canvas_x + x as u16, layout.canvas_y + y as u16),
        style::SetBackgroundColor(to_terminal(under)),
        style::SetForegroundColor(to_terminal(fg)),
        style::Print("+"),
        style::ResetColor,
    )?;
    Ok(())
}
