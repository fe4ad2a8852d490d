//! Pixel-grid pattern editor.
//!
//! The core (`grid`, `history`, `paint`, `geometry`, `session`) is pure and
//! synchronous; `persist` and `render` are the seams to storage and drawing;
//! `editor` is a terminal front end built on top of them.

pub mod editor;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod history;
pub mod paint;
pub mod palettes;
pub mod persist;
pub mod render;
pub mod session;
pub mod types;

pub use error::{CropRejected, EdgeResizeError, ImportError, PaletteError, ValidationError};
pub use grid::{ContentBounds, Edge, Grid};
pub use history::History;
pub use persist::PatternDocument;
pub use session::{EditorSession, Snapshot};
pub use types::{CellValue, Rgb};
