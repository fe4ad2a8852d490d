//! Palette-slot removal and the matching cell renumbering.
//!
//! Cells store 1-based indices into the pattern colours, so removing a slot
//! shifts every higher index down by one. The palette splice and the grid
//! rewrite happen together here; neither is ever done alone.

use crate::error::PaletteError;
use crate::types::{CellValue, Rgb};

use super::Grid;

fn check_index(colors: &[Rgb], index: usize) -> Result<(), PaletteError> {
    if index >= colors.len() {
        return Err(PaletteError::OutOfRange {
            index,
            len: colors.len(),
        });
    }
    Ok(())
}

/// Remove `colors[index]` (0-based). Cells using it become background;
/// cells above it are decremented.
pub fn delete_color(grid: &mut Grid, colors: &mut Vec<Rgb>, index: usize) -> Result<(), PaletteError> {
    check_index(colors, index)?;
    if colors.len() == 1 {
        return Err(PaletteError::LastColor);
    }

    let removed = (index + 1) as CellValue;
    colors.remove(index);
    grid.map_cells(|v| match v {
        v if v == removed => 0,
        v if v > removed => v - 1,
        v => v,
    });
    Ok(())
}

/// Fold `colors[source]` into `colors[target]` (both 0-based) and remove the
/// source slot.
pub fn merge_colors(
    grid: &mut Grid,
    colors: &mut Vec<Rgb>,
    source: usize,
    target: usize,
) -> Result<(), PaletteError> {
    check_index(colors, source)?;
    check_index(colors, target)?;
    if source == target {
        return Err(PaletteError::SameColor);
    }

    let removed = (source + 1) as CellValue;
    // Target's value after the splice.
    let target_value = (if target > source { target } else { target + 1 }) as CellValue;
    colors.remove(source);
    grid.map_cells(|v| match v {
        v if v == removed => target_value,
        v if v > removed => v - 1,
        v => v,
    });
    Ok(())
}

/// Every non-zero cell refers to an existing colour.
pub fn is_consistent(grid: &Grid, colors: &[Rgb]) -> bool {
    (grid.max_value() as usize) <= colors.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(n: u8) -> Vec<Rgb> {
        (0..n).map(|i| Rgb::new(i, i, i)).collect()
    }

    fn sample() -> Grid {
        Grid::from_rows(4, 1, vec![vec![1, 2, 3, 0]]).unwrap()
    }

    #[test]
    fn delete_renumbers_higher_cells() {
        let mut g = sample();
        let mut colors = palette(3);
        delete_color(&mut g, &mut colors, 1).unwrap();
        assert_eq!(g.rows(), &[vec![1, 0, 2, 0]]);
        assert_eq!(colors, vec![Rgb::new(0, 0, 0), Rgb::new(2, 2, 2)]);
        assert!(is_consistent(&g, &colors));
    }

    #[test]
    fn delete_last_remaining_colour_is_refused() {
        let mut g = Grid::from_rows(2, 1, vec![vec![1, 0]]).unwrap();
        let mut colors = palette(1);
        assert_eq!(
            delete_color(&mut g, &mut colors, 0),
            Err(PaletteError::LastColor)
        );
        assert_eq!(g.rows(), &[vec![1, 0]]);
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn merge_down_and_up() {
        let mut g = sample();
        let mut colors = palette(3);
        merge_colors(&mut g, &mut colors, 2, 0).unwrap();
        assert_eq!(g.rows(), &[vec![1, 2, 1, 0]]);
        assert_eq!(colors.len(), 2);

        let mut g = sample();
        let mut colors = palette(3);
        merge_colors(&mut g, &mut colors, 0, 2).unwrap();
        // old 3 -> 2 after the splice; old 1 joins it.
        assert_eq!(g.rows(), &[vec![2, 1, 2, 0]]);
        assert_eq!(colors, vec![Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)]);
    }

    #[test]
    fn bad_indices_leave_everything_untouched() {
        let mut g = sample();
        let mut colors = palette(3);
        assert!(delete_color(&mut g, &mut colors, 3).is_err());
        assert!(merge_colors(&mut g, &mut colors, 1, 1).is_err());
        assert_eq!(g, sample());
        assert_eq!(colors.len(), 3);
    }
}
