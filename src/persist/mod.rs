//! The plain-data document shape, its file format, and the
//! best-effort storage sink the editor autosaves to.

pub mod format;
pub mod store;

pub use format::{export_json, export_now, import_json};
pub use store::{FileStore, MemoryStore, StateStore};

use crate::grid::Grid;
use crate::palettes::DEFAULT_PALETTE_ID;
use crate::types::{DEFAULT_ASPECT_RATIO, DEFAULT_GRID_SIZE, DEFAULT_PREVIEW_REPEAT, Rgb};

/// Everything that survives a save/load: the editable state plus the view
/// settings (aspect ratio, preview tiling, palette choice).
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDocument {
    pub grid: Grid,
    pub aspect_ratio: f64,
    pub pattern_colors: Vec<Rgb>,
    pub background_color: Rgb,
    pub repeat_x: u32,
    pub repeat_y: u32,
    pub active_palette: String,
    pub custom_palette: Option<Vec<Rgb>>,
}

impl Default for PatternDocument {
    fn default() -> Self {
        PatternDocument {
            grid: Grid::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            pattern_colors: vec![Rgb::BLACK],
            background_color: Rgb::WHITE,
            repeat_x: DEFAULT_PREVIEW_REPEAT,
            repeat_y: DEFAULT_PREVIEW_REPEAT,
            active_palette: DEFAULT_PALETTE_ID.to_string(),
            custom_palette: None,
        }
    }
}
