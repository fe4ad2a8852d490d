use std::path::Path;

use anyhow::{Context, Result};

use crate::palettes;
use crate::persist::{self, PatternDocument};
use crate::session::EditorSession;
use crate::types::CellValue;

use super::config::EditorConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Clear,
    DeleteColor { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Picking the colour that `source` is merged into.
    MergeColor {
        source: usize,
        /// Highlighted 0-based target index.
        target: usize,
    },
    Confirm {
        message: String,
        /// 0 = Yes, 1 = No
        selected: usize,
        action: ConfirmAction,
    },
}

pub struct EditorState {
    pub session: EditorSession,
    pub file_path: String,
    pub mode: Mode,
    pub config: EditorConfig,
    /// Keyboard cursor as (row, col).
    pub cursor: (usize, usize),
    pub status_message: Option<String>,
    /// Session revision at the last save or load.
    saved_revision: u64,
}

impl EditorState {
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with(path, EditorConfig::load())
    }

    /// A missing file opens a fresh default pattern that is saved to `path`.
    pub fn open_with(path: &str, config: EditorConfig) -> Result<Self> {
        let doc = if Path::new(path).exists() {
            let json =
                std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
            persist::import_json(&json).with_context(|| format!("Failed to parse {path}"))?
        } else {
            PatternDocument::default()
        };
        tracing::info!(path, width = doc.grid.width(), height = doc.grid.height(), "opened pattern");

        let session = EditorSession::from_document(doc)
            .with_repeat_policy(config.preview_repeat.clone());
        let saved_revision = session.revision();
        Ok(EditorState {
            session,
            file_path: path.to_string(),
            mode: Mode::Normal,
            config,
            cursor: (0, 0),
            status_message: None,
            saved_revision,
        })
    }

    pub fn save(&mut self) -> Result<()> {
        let json = persist::export_now(&self.session.to_document())?;
        std::fs::write(&self.file_path, &json)
            .with_context(|| format!("Failed to write {}", self.file_path))?;
        self.saved_revision = self.session.revision();
        self.status_message = Some("Saved".into());
        tracing::info!(path = %self.file_path, "saved pattern");
        Ok(())
    }

    pub fn dirty(&self) -> bool {
        self.session.revision() != self.saved_revision
    }

    /// Keep the cursor inside the grid after a resize or undo.
    pub fn clamp_cursor(&mut self) {
        let grid = self.session.grid();
        self.cursor.0 = self.cursor.0.min(grid.height() - 1);
        self.cursor.1 = self.cursor.1.min(grid.width() - 1);
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let grid = self.session.grid();
        let row = self.cursor.0.saturating_add_signed(d_row).min(grid.height() - 1);
        let col = self.cursor.1.saturating_add_signed(d_col).min(grid.width() - 1);
        self.cursor = (row, col);
    }

    /// Add the first palette swatch the pattern does not use yet, falling
    /// back to the first swatch. The new colour becomes active.
    pub fn add_swatch_color(&mut self) {
        let swatches = self.session.swatches();
        let color = palettes::first_unused(swatches, self.session.pattern_colors())
            .or_else(|| swatches.first().copied());
        let Some(color) = color else {
            return;
        };
        match self.session.add_color(color) {
            Ok(index) => {
                let _ = self.session.set_active_color((index + 1) as CellValue);
                self.status_message = Some(format!("Added colour {} {color}", index + 1));
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Recolour the active pattern colour to the next swatch of the palette.
    pub fn cycle_active_swatch(&mut self) {
        let index = self.session.active_color() as usize - 1;
        let Some(current) = self.session.pattern_colors().get(index).copied() else {
            return;
        };
        let swatches = self.session.swatches();
        if swatches.is_empty() {
            return;
        }
        let next = swatches
            .iter()
            .position(|&c| c == current)
            .map_or(0, |p| (p + 1) % swatches.len());
        let color = swatches[next];
        if let Err(e) = self.session.edit_color(index, color) {
            self.status_message = Some(e.to_string());
        }
    }

    pub fn cycle_palette(&mut self) {
        let has_custom = self.session.custom_palette().is_some();
        let next = palettes::next_palette_id(self.session.active_palette(), has_custom);
        self.session.set_active_palette(next);
        let name = palettes::builtin(next).map_or("Custom", |p| p.name);
        self.status_message = Some(format!("Palette: {name}"));
    }
}
