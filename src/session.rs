//! The live editing session.
//!
//! `EditorSession` owns the working grid and colours, the view settings, the
//! paint engine and the undo history. Every subsystem is driven through it,
//! so there is no ambient editor state anywhere else.
//!
//! Checkpoints (one history entry each): stroke end, resize, colour edit,
//! clear, and document load. View settings (aspect ratio, preview tiling,
//! palette choice) are not part of undo but are autosaved.

use crate::error::{CropRejected, EdgeResizeError, PaletteError};
use crate::geometry::PreviewRepeatPolicy;
use crate::grid::{self, Edge, Grid, recolor};
use crate::history::History;
use crate::paint::PaintEngine;
use crate::palettes::{self, CUSTOM_PALETTE_ID, DEFAULT_PALETTE_ID};
use crate::persist::{self, PatternDocument, StateStore};
use crate::render::ColorMap;
use crate::types::{
    CellValue, MAX_HISTORY_STATES, MAX_PATTERN_COLORS, Rgb, clamp_aspect_ratio, clamp_grid_size,
    clamp_preview_repeat,
};

/// The undoable part of the editor state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    pub pattern_colors: Vec<Rgb>,
    pub background_color: Rgb,
}

pub struct EditorSession {
    grid: Grid,
    pattern_colors: Vec<Rgb>,
    background_color: Rgb,
    aspect_ratio: f64,
    repeat_x: u32,
    repeat_y: u32,
    active_palette: String,
    custom_palette: Option<Vec<Rgb>>,
    repeat_policy: PreviewRepeatPolicy,
    history: History<Snapshot>,
    paint: PaintEngine,
    store: Option<Box<dyn StateStore>>,
    /// Bumped on every change to anything persisted.
    revision: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::from_document(PatternDocument::default())
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from `doc`, with `doc` as the only history entry.
    /// Values outside the current limits are clamped and cells that refer to
    /// missing colours are cleared.
    pub fn from_document(doc: PatternDocument) -> Self {
        let mut session = EditorSession {
            grid: Grid::new(2, 2),
            pattern_colors: vec![Rgb::BLACK],
            background_color: Rgb::WHITE,
            aspect_ratio: 1.0,
            repeat_x: 1,
            repeat_y: 1,
            active_palette: DEFAULT_PALETTE_ID.to_string(),
            custom_palette: None,
            repeat_policy: PreviewRepeatPolicy::default(),
            history: History::new(MAX_HISTORY_STATES),
            paint: PaintEngine::default(),
            store: None,
            revision: 0,
        };
        session.apply_document(doc);
        let initial = session.snapshot();
        session.history.init(&initial);
        session
    }

    /// Attach an autosave sink.
    pub fn with_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_repeat_policy(mut self, policy: PreviewRepeatPolicy) -> Self {
        self.repeat_policy = policy;
        self
    }

    /// Replace the whole state with an imported document (one checkpoint).
    pub fn load_document(&mut self, doc: PatternDocument) {
        self.paint.abandon_stroke();
        self.apply_document(doc);
        self.checkpoint();
    }

    pub fn to_document(&self) -> PatternDocument {
        PatternDocument {
            grid: self.grid.clone(),
            aspect_ratio: self.aspect_ratio,
            pattern_colors: self.pattern_colors.clone(),
            background_color: self.background_color,
            repeat_x: self.repeat_x,
            repeat_y: self.repeat_y,
            active_palette: self.active_palette.clone(),
            custom_palette: self.custom_palette.clone(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            pattern_colors: self.pattern_colors.clone(),
            background_color: self.background_color,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pattern_colors(&self) -> &[Rgb] {
        &self.pattern_colors
    }

    pub fn background_color(&self) -> Rgb {
        self.background_color
    }

    pub fn color_map(&self) -> ColorMap<'_> {
        ColorMap {
            background: self.background_color,
            pattern: &self.pattern_colors,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Requested tiling, before the grid-size cap.
    pub fn preview_repeat(&self) -> (u32, u32) {
        (self.repeat_x, self.repeat_y)
    }

    /// Tiling actually drawn for the current grid size.
    pub fn effective_preview_repeat(&self) -> (u32, u32) {
        let (w, h) = (self.grid.width(), self.grid.height());
        (
            self.repeat_policy.effective_repeat(self.repeat_x, w, h),
            self.repeat_policy.effective_repeat(self.repeat_y, w, h),
        )
    }

    pub fn max_preview_repeat(&self) -> u32 {
        self.repeat_policy
            .max_repeat(self.grid.width(), self.grid.height())
    }

    pub fn active_palette(&self) -> &str {
        &self.active_palette
    }

    pub fn custom_palette(&self) -> Option<&[Rgb]> {
        self.custom_palette.as_deref()
    }

    pub fn swatches(&self) -> &[Rgb] {
        palettes::swatches(&self.active_palette, self.custom_palette.as_deref())
    }

    pub fn active_color(&self) -> CellValue {
        self.paint.active_color
    }

    pub fn background_active(&self) -> bool {
        self.paint.background_active
    }

    pub fn in_stroke(&self) -> bool {
        self.paint.in_stroke()
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -----------------------------------------------------------------------
    // Painting
    // -----------------------------------------------------------------------

    /// Pointer down on `(row, col)`. An unfinished stroke is committed first.
    pub fn begin_stroke(&mut self, row: usize, col: usize) {
        self.end_stroke();
        self.paint.stroke_start(&self.grid, row, col);
    }

    /// Pointer over `(row, col)` during a stroke. `true` when a cell changed.
    pub fn continue_stroke(&mut self, row: usize, col: usize, erase_held: bool) -> bool {
        let changed = self.paint.stroke_move(&mut self.grid, row, col, erase_held);
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Pointer up or pointer leaving the canvas. Saves one history entry if
    /// the stroke changed anything; returns whether it did.
    pub fn end_stroke(&mut self) -> bool {
        match self.paint.stroke_end() {
            Some(summary) if summary.changed_cells > 0 => {
                tracing::debug!(cells = summary.changed_cells, "stroke committed");
                self.checkpoint();
                true
            }
            _ => false,
        }
    }

    /// Select the 1-based colour used for painting.
    pub fn set_active_color(&mut self, value: CellValue) -> Result<(), PaletteError> {
        if value == 0 || value as usize > self.pattern_colors.len() {
            return Err(PaletteError::OutOfRange {
                index: (value as usize).saturating_sub(1),
                len: self.pattern_colors.len(),
            });
        }
        self.paint.active_color = value;
        Ok(())
    }

    pub fn set_background_active(&mut self, active: bool) {
        self.paint.background_active = active;
    }

    // -----------------------------------------------------------------------
    // Grid operations
    // -----------------------------------------------------------------------

    /// Resize around the center; sizes are clamped to the grid limits first.
    pub fn resize_centered(&mut self, width: usize, height: usize) -> Result<(), CropRejected> {
        self.end_stroke();
        let width = clamp_grid_size(width as i64);
        let height = clamp_grid_size(height as i64);
        if width == self.grid.width() && height == self.grid.height() {
            return Ok(());
        }
        match grid::resize_centered(&self.grid, width, height) {
            Ok(resized) => {
                tracing::debug!(width, height, "resized around center");
                self.grid = resized;
                self.checkpoint();
                Ok(())
            }
            Err(e) => {
                tracing::info!(width, height, "centered resize refused: would crop content");
                Err(e)
            }
        }
    }

    pub fn resize_edge(&mut self, edge: Edge, delta: i64) -> Result<(), EdgeResizeError> {
        self.end_stroke();
        let resized = grid::resize_from_edge(&self.grid, edge, delta).inspect_err(|e| {
            tracing::info!(?edge, delta, reason = %e, "edge resize refused");
        })?;
        tracing::debug!(
            ?edge,
            delta,
            width = resized.width(),
            height = resized.height(),
            "resized from edge"
        );
        self.grid = resized;
        self.checkpoint();
        Ok(())
    }

    /// Blank every cell. Returns `false` if the grid was already blank.
    pub fn clear(&mut self) -> bool {
        self.end_stroke();
        if self.grid.is_blank() {
            return false;
        }
        self.grid.clear();
        self.checkpoint();
        true
    }

    // -----------------------------------------------------------------------
    // Colours
    // -----------------------------------------------------------------------

    /// Append a pattern colour; returns its 0-based index.
    pub fn add_color(&mut self, color: Rgb) -> Result<usize, PaletteError> {
        if self.pattern_colors.len() >= MAX_PATTERN_COLORS {
            return Err(PaletteError::Full {
                max: MAX_PATTERN_COLORS,
            });
        }
        self.pattern_colors.push(color);
        self.checkpoint();
        Ok(self.pattern_colors.len() - 1)
    }

    pub fn edit_color(&mut self, index: usize, color: Rgb) -> Result<(), PaletteError> {
        let len = self.pattern_colors.len();
        let slot = self
            .pattern_colors
            .get_mut(index)
            .ok_or(PaletteError::OutOfRange { index, len })?;
        if *slot != color {
            *slot = color;
            self.checkpoint();
        }
        Ok(())
    }

    pub fn delete_color(&mut self, index: usize) -> Result<(), PaletteError> {
        self.end_stroke();
        recolor::delete_color(&mut self.grid, &mut self.pattern_colors, index)?;
        self.shift_active_after_removal(index);
        self.checkpoint();
        Ok(())
    }

    pub fn merge_colors(&mut self, source: usize, target: usize) -> Result<(), PaletteError> {
        self.end_stroke();
        recolor::merge_colors(&mut self.grid, &mut self.pattern_colors, source, target)?;
        let removed = (source + 1) as CellValue;
        if self.paint.active_color == removed {
            let target_value = if target > source { target } else { target + 1 };
            self.paint.active_color = target_value as CellValue;
        } else {
            self.shift_active_after_removal(source);
        }
        self.checkpoint();
        Ok(())
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        if self.background_color != color {
            self.background_color = color;
            self.checkpoint();
        }
    }

    fn shift_active_after_removal(&mut self, index: usize) {
        let removed = (index + 1) as CellValue;
        if self.paint.active_color > removed {
            self.paint.active_color -= 1;
        }
        self.clamp_active_color();
    }

    fn clamp_active_color(&mut self) {
        let len = self.pattern_colors.len().max(1) as CellValue;
        self.paint.active_color = self.paint.active_color.clamp(1, len);
    }

    // -----------------------------------------------------------------------
    // View settings
    // -----------------------------------------------------------------------

    pub fn set_aspect_ratio(&mut self, ratio: f64) {
        let ratio = clamp_aspect_ratio(ratio);
        if ratio != self.aspect_ratio {
            self.aspect_ratio = ratio;
            self.touch();
        }
    }

    /// Requested repeats are clamped to `1..=10` and to the cap for the
    /// current grid size.
    pub fn set_preview_repeat(&mut self, repeat_x: u32, repeat_y: u32) {
        let max = self.max_preview_repeat();
        let x = clamp_preview_repeat(repeat_x as i64).min(max);
        let y = clamp_preview_repeat(repeat_y as i64).min(max);
        if (x, y) != (self.repeat_x, self.repeat_y) {
            self.repeat_x = x;
            self.repeat_y = y;
            self.touch();
        }
    }

    /// Returns `false` for an unknown palette id.
    pub fn set_active_palette(&mut self, id: &str) -> bool {
        if !palettes::is_known_id(id, self.custom_palette.as_deref()) {
            return false;
        }
        if self.active_palette != id {
            self.active_palette = id.to_string();
            self.touch();
        }
        true
    }

    pub fn set_custom_palette(&mut self, colors: Option<Vec<Rgb>>) {
        self.custom_palette = colors;
        if self.custom_palette.is_none() && self.active_palette == CUSTOM_PALETTE_ID {
            self.active_palette = DEFAULT_PALETTE_ID.to_string();
        }
        self.touch();
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.paint.abandon_stroke();
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.paint.abandon_stroke();
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn restore(&mut self, snapshot: Snapshot) {
        self.grid = snapshot.grid;
        self.pattern_colors = snapshot.pattern_colors;
        self.background_color = snapshot.background_color;
        self.clamp_active_color();
        self.touch();
    }

    fn checkpoint(&mut self) {
        debug_assert!(
            recolor::is_consistent(&self.grid, &self.pattern_colors),
            "grid refers to a colour the palette does not have"
        );
        let snapshot = self.snapshot();
        self.history.save(&snapshot);
        self.touch();
    }

    /// Record a change to persisted state and autosave it. Storage failures
    /// are logged and otherwise ignored.
    fn touch(&mut self) {
        self.revision += 1;
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.to_document()) {
            tracing::warn!(store = store.name(), error = %e, "autosave failed");
        }
    }

    fn apply_document(&mut self, doc: PatternDocument) {
        let PatternDocument {
            mut grid,
            aspect_ratio,
            mut pattern_colors,
            background_color,
            repeat_x,
            repeat_y,
            active_palette,
            custom_palette,
        } = doc;

        pattern_colors.truncate(MAX_PATTERN_COLORS);
        if pattern_colors.is_empty() {
            pattern_colors.push(Rgb::BLACK);
        }
        let len = pattern_colors.len();
        grid.map_cells(|v| if v as usize > len { 0 } else { v });

        let width = clamp_grid_size(grid.width() as i64);
        let height = clamp_grid_size(grid.height() as i64);
        let grid = persist::format::fit_to_bounds(grid, width, height);

        self.grid = grid;
        self.pattern_colors = pattern_colors;
        self.background_color = background_color;
        self.aspect_ratio = clamp_aspect_ratio(aspect_ratio);
        self.custom_palette = custom_palette;
        self.active_palette = if palettes::is_known_id(&active_palette, self.custom_palette.as_deref()) {
            active_palette
        } else {
            DEFAULT_PALETTE_ID.to_string()
        };
        let max = self.max_preview_repeat();
        self.repeat_x = clamp_preview_repeat(repeat_x as i64).min(max);
        self.repeat_y = clamp_preview_repeat(repeat_y as i64).min(max);
        self.clamp_active_color();
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("colors", &self.pattern_colors.len())
            .field("history", &self.history.len())
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageResult;
    use crate::persist::MemoryStore;

    fn paint(session: &mut EditorSession, cells: &[(usize, usize)]) {
        let (r0, c0) = cells[0];
        session.begin_stroke(r0, c0);
        for &(r, c) in cells {
            session.continue_stroke(r, c, false);
        }
        session.end_stroke();
    }

    #[test]
    fn one_history_entry_per_stroke() {
        let mut s = EditorSession::new();
        paint(&mut s, &[(0, 0), (0, 1), (0, 2), (1, 2)]);
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.grid().count_painted(), 4);

        assert!(s.undo());
        assert!(s.grid().is_blank());
        assert!(s.redo());
        assert_eq!(s.grid().count_painted(), 4);
    }

    #[test]
    fn stroke_without_changes_adds_no_entry() {
        let mut s = EditorSession::new();
        s.begin_stroke(0, 0);
        s.continue_stroke(0, 0, true);
        assert!(!s.end_stroke());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn same_colour_twice_toggles_back() {
        let mut s = EditorSession::new();
        paint(&mut s, &[(3, 3)]);
        assert_eq!(s.grid().get(3, 3), Some(1));
        paint(&mut s, &[(3, 3)]);
        assert_eq!(s.grid().get(3, 3), Some(0));
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn crop_rejection_leaves_state_untouched() {
        let mut s = EditorSession::new();
        paint(&mut s, &[(0, 0), (15, 15)]);
        let before = s.snapshot();
        let entries = s.history().len();
        assert_eq!(s.resize_centered(8, 8), Err(CropRejected));
        assert_eq!(
            s.resize_edge(Edge::Right, -1),
            Err(EdgeResizeError::CropRejected)
        );
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.history().len(), entries);
    }

    #[test]
    fn resize_is_undoable() {
        let mut s = EditorSession::new();
        s.resize_edge(Edge::Bottom, 4).unwrap();
        assert_eq!(s.grid().height(), 20);
        s.undo();
        assert_eq!(s.grid().height(), 16);
    }

    #[test]
    fn delete_colour_keeps_grid_and_palette_consistent() {
        let mut s = EditorSession::new();
        s.add_color(Rgb::new(255, 0, 0)).unwrap();
        s.add_color(Rgb::new(0, 255, 0)).unwrap();
        s.set_active_color(2).unwrap();
        paint(&mut s, &[(0, 0)]);
        s.set_active_color(3).unwrap();
        paint(&mut s, &[(0, 1)]);

        s.delete_color(1).unwrap();
        assert_eq!(s.pattern_colors().len(), 2);
        assert_eq!(s.grid().get(0, 0), Some(0));
        assert_eq!(s.grid().get(0, 1), Some(2));
        assert_eq!(s.active_color(), 2);

        s.undo();
        assert_eq!(s.pattern_colors().len(), 3);
        assert_eq!(s.grid().get(0, 0), Some(2));
    }

    #[test]
    fn merge_follows_the_merged_colour() {
        let mut s = EditorSession::new();
        s.add_color(Rgb::new(255, 0, 0)).unwrap();
        s.set_active_color(2).unwrap();
        paint(&mut s, &[(1, 1)]);
        s.merge_colors(1, 0).unwrap();
        assert_eq!(s.grid().get(1, 1), Some(1));
        assert_eq!(s.active_color(), 1);
    }

    #[test]
    fn preview_repeat_is_capped_by_grid_size() {
        let mut s = EditorSession::new();
        s.set_preview_repeat(10, 10);
        assert_eq!(s.preview_repeat(), (9, 9));
        s.resize_centered(60, 60).unwrap();
        assert_eq!(s.effective_preview_repeat(), (2, 2));
        s.set_preview_repeat(0, 0);
        assert_eq!(s.preview_repeat(), (1, 1));
    }

    #[test]
    fn from_document_repairs_inconsistent_state() {
        let mut grid = Grid::new(1, 1);
        grid.set(0, 0, 5);
        let doc = PatternDocument {
            grid,
            pattern_colors: Vec::new(),
            aspect_ratio: 99.0,
            active_palette: "nope".into(),
            ..Default::default()
        };
        let s = EditorSession::from_document(doc);
        assert_eq!((s.grid().width(), s.grid().height()), (2, 2));
        assert!(s.grid().is_blank());
        assert_eq!(s.pattern_colors(), &[Rgb::BLACK]);
        assert_eq!(s.aspect_ratio(), 10.0);
        assert_eq!(s.active_palette(), DEFAULT_PALETTE_ID);
    }

    #[test]
    fn oversized_document_keeps_what_fits() {
        let mut grid = Grid::new(101, 101);
        grid.set(0, 0, 1);
        grid.set(100, 100, 1);
        let s = EditorSession::from_document(PatternDocument {
            grid,
            ..Default::default()
        });
        assert_eq!((s.grid().width(), s.grid().height()), (100, 100));
        assert_eq!(s.grid().get(0, 0), Some(1));
        assert_eq!(s.grid().count_painted(), 1);
    }

    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn name(&self) -> &str {
            "BrokenStore"
        }
        fn load(&self) -> StorageResult<Option<PatternDocument>> {
            Ok(None)
        }
        fn save(&self, _: &PatternDocument) -> StorageResult<()> {
            Err(crate::error::StorageError::Unavailable("quota exceeded".into()))
        }
        fn clear(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn storage_failures_do_not_block_editing() {
        let mut s = EditorSession::new().with_store(Box::new(BrokenStore));
        paint(&mut s, &[(0, 0)]);
        s.set_aspect_ratio(2.0);
        assert_eq!(s.grid().get(0, 0), Some(1));
        assert_eq!(s.aspect_ratio(), 2.0);
    }

    #[test]
    fn checkpoints_are_autosaved() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut s = EditorSession::new().with_store(Box::new(SharedStore(store.clone())));
        paint(&mut s, &[(2, 2)]);
        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.grid.get(2, 2), Some(1));
    }

    struct SharedStore(std::sync::Arc<MemoryStore>);

    impl StateStore for SharedStore {
        fn name(&self) -> &str {
            self.0.name()
        }
        fn load(&self) -> StorageResult<Option<PatternDocument>> {
            self.0.load()
        }
        fn save(&self, doc: &PatternDocument) -> StorageResult<()> {
            self.0.save(doc)
        }
        fn clear(&self) -> StorageResult<()> {
            self.0.clear()
        }
    }
}
