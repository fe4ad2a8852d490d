//! Content-preserving resize: center-anchored and edge-anchored.
//!
//! Both algorithms refuse to discard painted cells. They differ only in
//! where the old content lands: centered resize shifts by the difference of
//! the floored half-sizes, edge resize keeps the opposite edge fixed.

use serde::{Deserialize, Serialize};

use crate::error::{CropRejected, EdgeResizeError};
use crate::types::{MAX_GRID_SIZE, MIN_GRID_SIZE};

use super::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    fn is_horizontal(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

/// Resize around the center. The shift per axis is
/// `floor(new / 2) - floor(old / 2)`; with an odd growth the extra row or
/// column therefore lands wherever that floor puts it.
///
/// Rejected when the content box is larger than the new size, and also when
/// off-center content would be pushed past the new edge by the shift.
pub fn resize_centered(grid: &Grid, new_w: usize, new_h: usize) -> Result<Grid, CropRejected> {
    let shift_x = (new_w / 2) as isize - (grid.width() / 2) as isize;
    let shift_y = (new_h / 2) as isize - (grid.height() / 2) as isize;

    if let Some(b) = grid.content_bounds() {
        if new_w < b.width() || new_h < b.height() {
            return Err(CropRejected);
        }
        let fits = |min: usize, max: usize, shift: isize, size: usize| {
            min as isize + shift >= 0 && max as isize + shift < size as isize
        };
        if !fits(b.min_col, b.max_col, shift_x, new_w) || !fits(b.min_row, b.max_row, shift_y, new_h) {
            return Err(CropRejected);
        }
    }

    Ok(copy_shifted(grid, new_w, new_h, shift_x, shift_y))
}

/// Grow (`delta > 0`) or shrink (`delta < 0`) one edge. The new size is
/// clamped to the grid bounds before anything else is decided.
pub fn resize_from_edge(grid: &Grid, edge: Edge, delta: i64) -> Result<Grid, EdgeResizeError> {
    let old_w = grid.width();
    let old_h = grid.height();
    let clamp = |size: usize| {
        (size as i64)
            .saturating_add(delta)
            .clamp(MIN_GRID_SIZE as i64, MAX_GRID_SIZE as i64) as usize
    };
    let (new_w, new_h) = if edge.is_horizontal() {
        (clamp(old_w), old_h)
    } else {
        (old_w, clamp(old_h))
    };

    if delta < 0 {
        if let Some(b) = grid.content_bounds() {
            let crops = match edge {
                Edge::Right => new_w < b.max_col + 1,
                Edge::Left => old_w - new_w > b.min_col,
                Edge::Bottom => new_h < b.max_row + 1,
                Edge::Top => old_h - new_h > b.min_row,
            };
            if crops {
                return Err(EdgeResizeError::CropRejected);
            }
        }
    }

    if new_w == old_w && new_h == old_h {
        return Err(EdgeResizeError::Unchanged);
    }

    let (shift_x, shift_y) = match edge {
        Edge::Right | Edge::Bottom => (0, 0),
        Edge::Left => (new_w as isize - old_w as isize, 0),
        Edge::Top => (0, new_h as isize - old_h as isize),
    };
    Ok(copy_shifted(grid, new_w, new_h, shift_x, shift_y))
}

/// Copy `grid` into a blank `new_w × new_h` grid with every cell moved by
/// `(shift_y, shift_x)`. Cells landing outside are dropped.
fn copy_shifted(grid: &Grid, new_w: usize, new_h: usize, shift_x: isize, shift_y: isize) -> Grid {
    let mut out = Grid::new(new_w, new_h);
    for (r, row) in grid.rows().iter().enumerate() {
        let nr = r as isize + shift_y;
        if nr < 0 || nr >= new_h as isize {
            continue;
        }
        for (c, &v) in row.iter().enumerate() {
            let nc = c as isize + shift_x;
            if nc < 0 || nc >= new_w as isize {
                continue;
            }
            out.set(nr as usize, nc as usize, v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<u8>>) -> Grid {
        let h = rows.len();
        let w = rows[0].len();
        Grid::from_rows(w, h, rows).unwrap()
    }

    #[test]
    fn centered_keeps_odd_center() {
        let mut g = Grid::new(3, 3);
        g.set(1, 1, 1);
        let out = resize_centered(&g, 5, 5).unwrap();
        assert_eq!(out.get(2, 2), Some(1));
        assert_eq!(out.count_painted(), 1);
    }

    #[test]
    fn centered_odd_growth_follows_floor_division() {
        // 2 -> 3: floor(3/2) - floor(2/2) = 0, the new column goes right.
        let g = grid(vec![vec![1, 2], vec![3, 4]]);
        let out = resize_centered(&g, 3, 3).unwrap();
        assert_eq!(out.rows(), &[vec![1, 2, 0], vec![3, 4, 0], vec![0, 0, 0]]);

        // 3 -> 4: floor(4/2) - floor(3/2) = 1, the new column goes left.
        let g = grid(vec![vec![1, 0, 0], vec![0, 0, 0], vec![0, 0, 0]]);
        let out = resize_centered(&g, 4, 4).unwrap();
        assert_eq!(out.get(1, 1), Some(1));
    }

    #[test]
    fn centered_shrink_of_blank_margin_succeeds() {
        let mut g = Grid::new(6, 6);
        g.set(2, 2, 1);
        g.set(3, 3, 1);
        let out = resize_centered(&g, 2, 2).unwrap();
        assert_eq!(out.rows(), &[vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn centered_crop_is_rejected() {
        let g = grid(vec![vec![1, 0, 2], vec![0, 0, 0]]);
        assert_eq!(resize_centered(&g, 2, 2), Err(CropRejected));
    }

    #[test]
    fn centered_shrink_rejects_off_center_content() {
        // Small enough to fit, but the shift of -1 would push column 0 out.
        let mut g = Grid::new(4, 4);
        g.set(1, 0, 1);
        assert_eq!(resize_centered(&g, 3, 4), Err(CropRejected));
        assert!(resize_from_edge(&g, Edge::Right, -1).is_ok());
    }

    #[test]
    fn edge_grow_right_anchors_origin() {
        let g = grid(vec![vec![1, 2], vec![3, 4]]);
        let out = resize_from_edge(&g, Edge::Right, 1).unwrap();
        assert_eq!(out.rows(), &[vec![1, 2, 0], vec![3, 4, 0]]);
    }

    #[test]
    fn edge_grow_left_shifts_content() {
        let g = grid(vec![vec![1, 2], vec![3, 4]]);
        let out = resize_from_edge(&g, Edge::Left, 1).unwrap();
        assert_eq!(out.rows(), &[vec![0, 1, 2], vec![0, 3, 4]]);
    }

    #[test]
    fn edge_grow_top_and_bottom() {
        let g = grid(vec![vec![1, 2], vec![3, 4]]);
        let top = resize_from_edge(&g, Edge::Top, 1).unwrap();
        assert_eq!(top.rows(), &[vec![0, 0], vec![1, 2], vec![3, 4]]);
        let bottom = resize_from_edge(&g, Edge::Bottom, 1).unwrap();
        assert_eq!(bottom.rows(), &[vec![1, 2], vec![3, 4], vec![0, 0]]);
    }

    #[test]
    fn edge_shrink_into_content_is_rejected() {
        let g = grid(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(
            resize_from_edge(&g, Edge::Right, -1),
            Err(EdgeResizeError::CropRejected)
        );
        assert_eq!(
            resize_from_edge(&g, Edge::Left, -1),
            Err(EdgeResizeError::CropRejected)
        );
    }

    #[test]
    fn edge_shrink_of_blank_edge_drops_that_edge_only() {
        let g = grid(vec![vec![0, 1, 2], vec![0, 3, 4], vec![0, 0, 0]]);
        let left = resize_from_edge(&g, Edge::Left, -1).unwrap();
        assert_eq!(left.rows(), &[vec![1, 2], vec![3, 4], vec![0, 0]]);
        let bottom = resize_from_edge(&g, Edge::Bottom, -1).unwrap();
        assert_eq!(bottom.rows(), &[vec![0, 1, 2], vec![0, 3, 4]]);
    }

    #[test]
    fn edge_at_bound_is_unchanged_not_rejected() {
        let g = Grid::new(2, 2);
        assert_eq!(
            resize_from_edge(&g, Edge::Top, -1),
            Err(EdgeResizeError::Unchanged)
        );
        let wide = Grid::new(MAX_GRID_SIZE, 2);
        assert_eq!(
            resize_from_edge(&wide, Edge::Right, 3),
            Err(EdgeResizeError::Unchanged)
        );
    }

    #[test]
    fn edge_delta_is_clamped() {
        let g = Grid::new(4, 4);
        let out = resize_from_edge(&g, Edge::Bottom, -10).unwrap();
        assert_eq!(out.height(), MIN_GRID_SIZE);
    }

    #[test]
    fn extreme_deltas_saturate_to_bounds() {
        let g = Grid::new(4, 4);
        let grown = resize_from_edge(&g, Edge::Right, i64::MAX).unwrap();
        assert_eq!(grown.width(), MAX_GRID_SIZE);
        let shrunk = resize_from_edge(&g, Edge::Top, i64::MIN).unwrap();
        assert_eq!(shrunk.height(), MIN_GRID_SIZE);
        assert_eq!(shrunk.width(), 4);
    }
}
