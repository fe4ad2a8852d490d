//! Property-based invariant tests for the grid store.
//!
//! 1. A resize either keeps every painted cell or is rejected.
//! 2. A rejected resize leaves the grid unchanged.
//! 3. Edge resizes keep each painted cell at its shifted position.
//! 4. Deleting a colour renumbers cells and shortens the palette by one.
//! 5. Merging keeps grid and palette consistent.

use pixel_pattern::error::EdgeResizeError;
use pixel_pattern::grid::{self, Edge, Grid, recolor};
use pixel_pattern::types::{MAX_GRID_SIZE, MIN_GRID_SIZE, Rgb};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Grids up to 12×12 whose cells use values `0..=colors`.
fn grid_strategy(colors: u8) -> impl Strategy<Value = Grid> {
    (2usize..=12, 2usize..=12).prop_flat_map(move |(w, h)| {
        prop::collection::vec(prop::collection::vec(0..=colors, w), h)
            .prop_map(move |rows| Grid::from_rows(w, h, rows).unwrap())
    })
}

fn edge_strategy() -> impl Strategy<Value = Edge> {
    prop_oneof![
        Just(Edge::Top),
        Just(Edge::Right),
        Just(Edge::Bottom),
        Just(Edge::Left),
    ]
}

fn palette(n: u8) -> Vec<Rgb> {
    (0..n).map(|i| Rgb::new(i * 10, 0, 0)).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Centered resize preserves content or rejects without change
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn centered_resize_never_drops_paint(
        g in grid_strategy(3),
        new_w in 2usize..=14,
        new_h in 2usize..=14,
    ) {
        let before = g.clone();
        match grid::resize_centered(&g, new_w, new_h) {
            Ok(out) => {
                prop_assert_eq!(out.width(), new_w);
                prop_assert_eq!(out.height(), new_h);
                prop_assert_eq!(out.count_painted(), g.count_painted());
            }
            Err(_) => {
                prop_assert!(!g.is_blank(), "blank grids always resize");
            }
        }
        prop_assert_eq!(g, before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Edge resize anchoring
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edge_resize_shifts_cells_exactly(
        g in grid_strategy(2),
        edge in edge_strategy(),
        delta in -3i64..=3,
    ) {
        let result = grid::resize_from_edge(&g, edge, delta);
        let out = match result {
            Ok(out) => out,
            Err(EdgeResizeError::Unchanged) => {
                prop_assert!(delta == 0
                    || g.width() == MIN_GRID_SIZE
                    || g.height() == MIN_GRID_SIZE
                    || g.width() == MAX_GRID_SIZE
                    || g.height() == MAX_GRID_SIZE);
                return Ok(());
            }
            Err(EdgeResizeError::CropRejected) => {
                prop_assert!(delta < 0 && !g.is_blank());
                return Ok(());
            }
        };

        let dx = match edge {
            Edge::Left => out.width() as isize - g.width() as isize,
            _ => 0,
        };
        let dy = match edge {
            Edge::Top => out.height() as isize - g.height() as isize,
            _ => 0,
        };
        for (r, row) in g.rows().iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let nr = (r as isize + dy) as usize;
                let nc = (c as isize + dx) as usize;
                prop_assert_eq!(out.get(nr, nc), Some(v));
            }
        }
        prop_assert_eq!(out.count_painted(), g.count_painted());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Delete renumbering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn delete_renumbers_cells(g in grid_strategy(4), index in 0usize..4) {
        let mut out = g.clone();
        let mut colors = palette(4);
        recolor::delete_color(&mut out, &mut colors, index).unwrap();

        let removed = (index + 1) as u8;
        prop_assert_eq!(colors.len(), 3);
        for (before, after) in g.rows().iter().flatten().zip(out.rows().iter().flatten()) {
            match *before {
                v if v == removed => prop_assert_eq!(*after, 0),
                v if v > removed => prop_assert_eq!(*after, v - 1),
                v => prop_assert_eq!(*after, v),
            }
        }
        prop_assert!(recolor::is_consistent(&out, &colors));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Merge consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merge_keeps_colours_of_other_cells(
        g in grid_strategy(4),
        source in 0usize..4,
        target in 0usize..4,
    ) {
        prop_assume!(source != target);
        let old_colors = palette(4);
        let mut colors = old_colors.clone();
        let mut out = g.clone();
        recolor::merge_colors(&mut out, &mut colors, source, target).unwrap();

        prop_assert_eq!(colors.len(), 3);
        prop_assert!(recolor::is_consistent(&out, &colors));
        // Every painted cell shows the colour it showed before, except merged
        // cells, which show the target's colour.
        for (before, after) in g.rows().iter().flatten().zip(out.rows().iter().flatten()) {
            if *before == 0 {
                prop_assert_eq!(*after, 0);
                continue;
            }
            let expected = if *before as usize == source + 1 {
                old_colors[target]
            } else {
                old_colors[*before as usize - 1]
            };
            prop_assert_eq!(colors[*after as usize - 1], expected);
        }
    }
}
