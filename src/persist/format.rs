//! Versioned JSON pattern file.
//!
//! ```json
//! {
//!   "version": 1,
//!   "created": "2024-01-01T00:00:00Z",
//!   "grid": { "width": 2, "height": 2, "aspectRatio": 1.0, "cells": [[0, 1], [1, 0]] },
//!   "colors": { "background": "#FFFFFF", "pattern": ["#000000"] },
//!   "preview": { "repeatX": 3, "repeatY": 3 },
//!   "palette": { "active": "classic", "custom": null }
//! }
//! ```
//!
//! Import is strict about structure (version, required sections, row shape,
//! colour syntax) and lenient about numbers: out-of-range sizes, ratios and
//! repeat counts are clamped, and unusable cell values become background.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{GridShapeError, ImportError, ValidationError};
use crate::grid::{Grid, resize_centered};
use crate::palettes::{self, DEFAULT_PALETTE_ID};
use crate::types::{
    CellValue, DEFAULT_ASPECT_RATIO, DEFAULT_PREVIEW_REPEAT, MAX_PATTERN_COLORS, Rgb,
    clamp_aspect_ratio, clamp_grid_size, clamp_preview_repeat,
};

use super::PatternDocument;

pub const FORMAT_VERSION: u64 = 1;

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PatternFile<'a> {
    version: u64,
    created: &'a str,
    grid: GridSection<'a>,
    colors: ColorsSection<'a>,
    preview: PreviewSection,
    palette: PaletteSection<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GridSection<'a> {
    width: usize,
    height: usize,
    aspect_ratio: f64,
    cells: &'a [Vec<CellValue>],
}

#[derive(Serialize)]
struct ColorsSection<'a> {
    background: Rgb,
    pattern: &'a [Rgb],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewSection {
    repeat_x: u32,
    repeat_y: u32,
}

#[derive(Serialize)]
struct PaletteSection<'a> {
    active: &'a str,
    custom: Option<&'a [Rgb]>,
}

/// Serialise `doc` with the given `created` timestamp.
pub fn export_json(doc: &PatternDocument, created: &str) -> serde_json::Result<String> {
    let file = PatternFile {
        version: FORMAT_VERSION,
        created,
        grid: GridSection {
            width: doc.grid.width(),
            height: doc.grid.height(),
            aspect_ratio: doc.aspect_ratio,
            cells: doc.grid.rows(),
        },
        colors: ColorsSection {
            background: doc.background_color,
            pattern: &doc.pattern_colors,
        },
        preview: PreviewSection {
            repeat_x: doc.repeat_x,
            repeat_y: doc.repeat_y,
        },
        palette: PaletteSection {
            active: &doc.active_palette,
            custom: doc.custom_palette.as_deref(),
        },
    };
    serde_json::to_string_pretty(&file)
}

/// Serialise `doc` stamped with the current UTC time.
pub fn export_now(doc: &PatternDocument) -> serde_json::Result<String> {
    let created = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());
    export_json(doc, &created)
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse and validate a pattern file.
pub fn import_json(json: &str) -> Result<PatternDocument, ImportError> {
    let root: Value = serde_json::from_str(json)?;
    Ok(document_from_value(&root)?)
}

/// Validate an already-parsed pattern file.
pub fn document_from_value(root: &Value) -> Result<PatternDocument, ValidationError> {
    let root = root
        .as_object()
        .ok_or(ValidationError::WrongType { field: "root" })?;

    match root.get("version").and_then(Value::as_u64) {
        Some(FORMAT_VERSION) => {}
        _ => return Err(ValidationError::UnsupportedVersion),
    }

    let grid = section(root, "grid")?.ok_or(ValidationError::MissingField("grid"))?;
    let colors = section(root, "colors")?.ok_or(ValidationError::MissingField("colors"))?;

    let background_color = color_field(colors, "background")?;
    let mut pattern_colors = color_list(
        colors
            .get("pattern")
            .ok_or(ValidationError::MissingField("colors.pattern"))?,
        "colors.pattern",
    )?;
    pattern_colors.truncate(MAX_PATTERN_COLORS);
    if pattern_colors.is_empty() {
        pattern_colors.push(Rgb::BLACK);
    }

    let width = int_field(grid, "width")?.ok_or(ValidationError::MissingField("grid.width"))?;
    let height = int_field(grid, "height")?.ok_or(ValidationError::MissingField("grid.height"))?;
    let cells = read_cells(grid, width, height, pattern_colors.len())?;
    let cells = fit_to_bounds(cells, clamp_grid_size(width), clamp_grid_size(height));

    let aspect_ratio = match grid.get("aspectRatio") {
        None | Some(Value::Null) => DEFAULT_ASPECT_RATIO,
        Some(v) => clamp_aspect_ratio(v.as_f64().unwrap_or(DEFAULT_ASPECT_RATIO)),
    };

    let preview = section(root, "preview")?;
    let repeat = |key: &'static str| -> Result<u32, ValidationError> {
        let value = match preview {
            Some(p) => int_field(p, key)?,
            None => None,
        };
        Ok(value.map_or(DEFAULT_PREVIEW_REPEAT, clamp_preview_repeat))
    };
    let repeat_x = repeat("repeatX")?;
    let repeat_y = repeat("repeatY")?;

    let palette = section(root, "palette")?;
    let custom_palette = match palette.and_then(|p| p.get("custom")) {
        None | Some(Value::Null) => None,
        Some(v) => Some(color_list(v, "palette.custom")?),
    };
    let active_palette = palette
        .and_then(|p| p.get("active"))
        .and_then(Value::as_str)
        .filter(|id| palettes::is_known_id(id, custom_palette.as_deref()))
        .unwrap_or(DEFAULT_PALETTE_ID)
        .to_string();

    Ok(PatternDocument {
        grid: cells,
        aspect_ratio,
        pattern_colors,
        background_color,
        repeat_x,
        repeat_y,
        active_palette,
        custom_palette,
    })
}

/// An optional object-valued section. Present-but-not-an-object is an error.
fn section<'a>(
    root: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a Map<String, Value>>, ValidationError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ValidationError::WrongType { field: key }),
    }
}

/// Integer-valued field; fractional numbers are truncated.
fn int_field(map: &Map<String, Value>, key: &'static str) -> Result<Option<i64>, ValidationError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => match v.as_i64() {
            Some(n) => Ok(Some(n)),
            None => v
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Some(f.trunc() as i64))
                .ok_or(ValidationError::WrongType { field: key }),
        },
    }
}

fn color_field(map: &Map<String, Value>, key: &'static str) -> Result<Rgb, ValidationError> {
    let value = map
        .get(key)
        .ok_or(ValidationError::MissingField("colors.background"))?;
    value
        .as_str()
        .ok_or(ValidationError::WrongType { field: key })?
        .parse()
}

fn color_list(value: &Value, field: &'static str) -> Result<Vec<Rgb>, ValidationError> {
    value
        .as_array()
        .ok_or(ValidationError::WrongType { field })?
        .iter()
        .map(|c| -> Result<Rgb, ValidationError> {
            c.as_str()
                .ok_or(ValidationError::WrongType { field })?
                .parse()
        })
        .collect()
}

/// Rows must match the declared shape exactly; individual cells are
/// sanitised rather than rejected.
fn read_cells(
    grid: &Map<String, Value>,
    width: i64,
    height: i64,
    palette_len: usize,
) -> Result<Grid, ValidationError> {
    let rows = grid
        .get("cells")
        .ok_or(ValidationError::MissingField("grid.cells"))?
        .as_array()
        .ok_or(ValidationError::WrongType { field: "grid.cells" })?;

    if height < 0 || rows.len() as i64 != height {
        return Err(GridShapeError::RowCount {
            expected: height.max(0) as usize,
            actual: rows.len(),
        }
        .into());
    }

    let mut out = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let row = row
            .as_array()
            .ok_or(ValidationError::WrongType { field: "grid.cells" })?;
        if width < 0 || row.len() as i64 != width {
            return Err(GridShapeError::RowLength {
                row: r,
                expected: width.max(0) as usize,
                actual: row.len(),
            }
            .into());
        }
        out.push(row.iter().map(|v| sanitize_cell(v, palette_len)).collect());
    }

    Ok(Grid::from_rows(width as usize, height as usize, out)?)
}

/// Null, non-numeric, negative, or out-of-palette values become background.
fn sanitize_cell(value: &Value, palette_len: usize) -> CellValue {
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => {
            let n = f.trunc() as u64;
            if n as usize <= palette_len {
                n as CellValue
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Bring a declared-size grid into the allowed bounds. Content is kept
/// centered when it fits; otherwise the top-left corner survives.
/// Bring `grid` to `width × height`, centered when the content survives the
/// shift, otherwise cropped from the top-left with a warning.
pub(crate) fn fit_to_bounds(grid: Grid, width: usize, height: usize) -> Grid {
    if grid.width() == width && grid.height() == height {
        return grid;
    }
    match resize_centered(&grid, width, height) {
        Ok(resized) => resized,
        Err(_) => {
            tracing::warn!(
                from_width = grid.width(),
                from_height = grid.height(),
                width,
                height,
                "grid does not fit size limits, cropping from top-left"
            );
            let mut out = Grid::new(width, height);
            for (r, row) in grid.rows().iter().enumerate().take(height) {
                for (c, &v) in row.iter().enumerate().take(width) {
                    out.set(r, c, v);
                }
            }
            out
        }
    }
}
