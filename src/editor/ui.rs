use crate::geometry::{CanvasLayout, CellSize, Viewport, layout_canvases};
use crate::session::EditorSession;

use super::config::EditorConfig;

/// Width (in columns) of the colour panel on the right.
pub const RIGHT_PANEL_WIDTH: u16 = 24;

pub struct Layout {
    pub right_panel_width: u16,
    pub canvas_x: u16,
    pub canvas_y: u16,
    pub canvas_width: u16,
    pub canvas_height: u16,
    pub status_y: u16,
    pub term_width: u16,
    pub menu_h: u16,
    pub canvases: CanvasLayout,
    /// Top-left of the tiled preview, in absolute terminal cells.
    pub preview_x: u16,
    pub preview_y: u16,
}

impl Layout {
    pub fn compute(term_width: u16, term_height: u16, session: &EditorSession, config: &EditorConfig) -> Self {
        let status_h: u16 = 2;
        let menu_h: u16 = 2;
        let right = if term_width > RIGHT_PANEL_WIDTH * 2 { RIGHT_PANEL_WIDTH } else { 0 };
        let canvas_width = term_width.saturating_sub(right);
        let canvas_height = term_height.saturating_sub(status_h + menu_h);

        let policy = &config.layout;
        let viewport = Viewport::classify(canvas_width as f64, canvas_height as f64, policy);
        let grid = session.grid();
        let (repeat_x, repeat_y) = session.effective_preview_repeat();
        let canvases = layout_canvases(
            grid.width(),
            grid.height(),
            session.aspect_ratio(),
            repeat_x,
            repeat_y,
            canvas_width as f64,
            &viewport,
            policy,
        );

        let (preview_x, preview_y) = if canvases.stacked {
            (0, menu_h + clamp_u16(canvases.edit.height) + 1)
        } else {
            (clamp_u16(canvases.edit.width).saturating_add(policy.gap as u16), menu_h)
        };

        Layout {
            right_panel_width: right,
            canvas_x: 0,
            canvas_y: menu_h,
            canvas_width,
            canvas_height,
            status_y: term_height.saturating_sub(status_h),
            term_width,
            menu_h,
            canvases,
            preview_x,
            preview_y,
        }
    }

    pub fn cell(&self) -> CellSize {
        self.canvases.cell
    }

    /// Grid cell under an absolute terminal position on the editor canvas.
    pub fn cell_at(&self, column: u16, row: u16, grid_w: usize, grid_h: usize) -> Option<(usize, usize)> {
        let x = column.checked_sub(self.canvas_x)? as f64;
        let y = row.checked_sub(self.canvas_y)? as f64;
        crate::render::cell_at(x, y, self.cell(), grid_w, grid_h)
    }
}

fn clamp_u16(v: u32) -> u16 {
    v.min(u16::MAX as u32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_grid_sits_beside_its_preview() {
        let mut session = EditorSession::new();
        session.resize_centered(8, 8).unwrap();
        session.set_preview_repeat(2, 2);
        let layout = Layout::compute(160, 40, &session, &EditorConfig::default());
        assert!(!layout.canvases.stacked);
        assert_eq!(layout.preview_y, layout.canvas_y);
        assert!(layout.preview_x >= layout.canvases.edit.width as u16);
        // Terminal rows are about twice as tall as columns are wide.
        let cell = layout.cell();
        assert!((cell.width - 2.0 * cell.height).abs() < 1e-9);
    }

    #[test]
    fn clicks_map_to_grid_cells() {
        let session = EditorSession::new();
        let layout = Layout::compute(160, 40, &session, &EditorConfig::default());
        assert_eq!(layout.cell_at(0, layout.canvas_y, 16, 16), Some((0, 0)));
        assert_eq!(layout.cell_at(0, 0, 16, 16), None);
    }

    #[test]
    fn narrow_aspect_ratios_stay_distinct() {
        let config = EditorConfig::default();
        let ratio = |aspect: f64| {
            let mut session = EditorSession::new();
            session.set_aspect_ratio(aspect);
            let cell = Layout::compute(160, 40, &session, &config).cell();
            cell.height / cell.width
        };
        assert!((ratio(0.1) - 0.05).abs() < 1e-9);
        assert!((ratio(0.2) - 0.1).abs() < 1e-9);
    }
}
