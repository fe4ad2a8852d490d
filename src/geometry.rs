//! Cell and canvas sizes from viewport constraints.
//!
//! Everything here is pure: the host passes in the viewport and the layout
//! policy, and gets sizes back. Units are whatever the host draws in
//! (CSS pixels in a browser, character cells in the terminal editor).
//! Cell sizes stay fractional; only the final canvas sizes are rounded.

use serde::{Deserialize, Serialize};

use crate::types::{MAX_PREVIEW_REPEAT, MIN_PREVIEW_REPEAT, clamp_aspect_ratio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    Compact,
    Normal,
}

/// Vertical space the host reserves around the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allowances {
    pub header: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Viewports narrower than this are `Compact`.
    pub compact_breakpoint: f64,
    pub compact: Allowances,
    pub normal: Allowances,
    pub min_cell_size: f64,
    pub max_canvas_size: f64,
    /// Space between editor and preview when side by side.
    pub gap: f64,
    pub preview_scale: f64,
    /// Width of one drawing unit divided by its height. Applied after the
    /// pattern aspect ratio is clamped.
    pub unit_aspect: f64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        LayoutPolicy {
            compact_breakpoint: 768.0,
            compact: Allowances {
                header: 120.0,
                padding: 40.0,
            },
            normal: Allowances {
                header: 180.0,
                padding: 80.0,
            },
            min_cell_size: 4.0,
            max_canvas_size: 800.0,
            gap: 20.0,
            preview_scale: 0.5,
            unit_aspect: 1.0,
        }
    }
}

impl LayoutPolicy {
    /// Character-cell policy for the terminal editor: two rows of chrome,
    /// no canvas cap beyond the terminal itself.
    pub fn terminal() -> Self {
        LayoutPolicy {
            compact_breakpoint: 100.0,
            compact: Allowances {
                header: 2.0,
                padding: 0.0,
            },
            normal: Allowances {
                header: 2.0,
                padding: 1.0,
            },
            min_cell_size: 1.0,
            max_canvas_size: 10_000.0,
            gap: 2.0,
            preview_scale: 0.5,
            // Character cells are about twice as tall as they are wide.
            unit_aspect: 0.5,
        }
    }

    /// Cell height over width in drawing units for a clamped pattern ratio.
    pub fn unit_ratio(&self, aspect_ratio: f64) -> f64 {
        let unit = if self.unit_aspect.is_finite() && self.unit_aspect > 0.0 {
            self.unit_aspect
        } else {
            1.0
        };
        clamp_aspect_ratio(aspect_ratio) * unit
    }

    fn allowances(&self, class: ViewportClass) -> Allowances {
        match class {
            ViewportClass::Compact => self.compact,
            ViewportClass::Normal => self.normal,
        }
    }
}

/// Host-supplied viewport; read-only input to every computation here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub class: ViewportClass,
}

impl Viewport {
    /// Classify by width against the policy breakpoint.
    pub fn classify(width: f64, height: f64, policy: &LayoutPolicy) -> Self {
        let class = if width < policy.compact_breakpoint {
            ViewportClass::Compact
        } else {
            ViewportClass::Normal
        };
        Viewport {
            width,
            height,
            class,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    fn round(width: f64, height: f64) -> Self {
        CanvasSize {
            width: width.max(0.0).round() as u32,
            height: height.max(0.0).round() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub edit: CanvasSize,
    pub preview: CanvasSize,
    /// Size of one grid cell on the editor canvas.
    pub cell: CellSize,
    /// Size of one grid cell on the preview canvas.
    pub preview_cell: CellSize,
    pub stacked: bool,
}

/// Size of one cell so a `grid_w × grid_h` grid fits both the given width
/// and the viewport height, capped by `max_canvas_size` and floored at
/// `min_cell_size`. The floor wins when the two conflict.
pub fn calculate_cell_size(
    grid_w: usize,
    grid_h: usize,
    aspect_ratio: f64,
    max_available_width: f64,
    viewport: &Viewport,
    policy: &LayoutPolicy,
) -> CellSize {
    let aspect = policy.unit_ratio(aspect_ratio);
    let gw = grid_w.max(1) as f64;
    let gh = grid_h.max(1) as f64;
    let allow = policy.allowances(viewport.class);
    let available_height = (viewport.height - allow.header - allow.padding).max(0.0);

    let width_by_width = max_available_width.max(0.0) / gw;
    let height_by_height = available_height / gh;
    let width_by_height = height_by_height / aspect;

    // Binding constraint: whichever gives the smaller cell.
    let (mut width, mut height) = if width_by_width <= width_by_height {
        (width_by_width, width_by_width * aspect)
    } else {
        (width_by_height, height_by_height)
    };

    let total_w = width * gw;
    let total_h = height * gh;
    if total_w > policy.max_canvas_size || total_h > policy.max_canvas_size {
        let scale = (policy.max_canvas_size / total_w).min(policy.max_canvas_size / total_h);
        width *= scale;
        height *= scale;
    }

    let min = policy.min_cell_size.max(f64::MIN_POSITIVE);
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        width = min;
        height = min * aspect;
    }
    if width < min || height < min {
        let scale = (min / width).max(min / height);
        width *= scale;
        height *= scale;
    }

    CellSize { width, height }
}

/// Place the editor and the tiled preview: side by side when both fit in
/// `available_width`, otherwise stacked with the editor using the full width.
#[allow(clippy::too_many_arguments)]
pub fn layout_canvases(
    grid_w: usize,
    grid_h: usize,
    aspect_ratio: f64,
    repeat_x: u32,
    repeat_y: u32,
    available_width: f64,
    viewport: &Viewport,
    policy: &LayoutPolicy,
) -> CanvasLayout {
    let gw = grid_w.max(1) as f64;
    let gh = grid_h.max(1) as f64;
    let rx = repeat_x.max(1) as f64;
    let ry = repeat_y.max(1) as f64;
    let scale = policy.preview_scale;

    let sizes = |cell: CellSize| {
        let edit = (cell.width * gw, cell.height * gh);
        let preview = (edit.0 * rx * scale, edit.1 * ry * scale);
        (edit, preview)
    };

    let half = ((available_width - policy.gap) / 2.0).max(0.0);
    let mut cell = calculate_cell_size(grid_w, grid_h, aspect_ratio, half, viewport, policy);
    let (mut edit, mut preview) = sizes(cell);
    let mut preview_scale = scale;

    let stacked = edit.0 + policy.gap + preview.0 > available_width;
    if stacked {
        cell = calculate_cell_size(grid_w, grid_h, aspect_ratio, available_width, viewport, policy);
        (edit, preview) = sizes(cell);
        if preview.0 > edit.0 {
            let k = edit.0 / preview.0;
            preview = (edit.0, preview.1 * k);
            preview_scale *= k;
        }
    }

    CanvasLayout {
        edit: CanvasSize::round(edit.0, edit.1),
        preview: CanvasSize::round(preview.0, preview.1),
        cell,
        preview_cell: CellSize {
            width: cell.width * preview_scale,
            height: cell.height * preview_scale,
        },
        stacked,
    }
}

// ---------------------------------------------------------------------------
// Preview repeat cap
// ---------------------------------------------------------------------------

/// Grids whose larger side is at least `min_dimension` may tile at most
/// `max_repeat` times per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatStep {
    pub min_dimension: usize,
    pub max_repeat: u32,
}

/// Caps the preview tiling so the total rendered cells stay near a fixed
/// budget as the grid grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewRepeatPolicy {
    /// Checked in order; the first step whose `min_dimension` is reached wins.
    pub steps: Vec<RepeatStep>,
}

impl Default for PreviewRepeatPolicy {
    fn default() -> Self {
        // floor(sqrt(25_000) / max_dimension), as breakpoints.
        const TABLE: [(usize, u32); 9] = [
            (80, 1),
            (53, 2),
            (40, 3),
            (32, 4),
            (27, 5),
            (23, 6),
            (20, 7),
            (18, 8),
            (16, 9),
        ];
        PreviewRepeatPolicy {
            steps: TABLE
                .iter()
                .map(|&(min_dimension, max_repeat)| RepeatStep {
                    min_dimension,
                    max_repeat,
                })
                .collect(),
        }
    }
}

impl PreviewRepeatPolicy {
    pub fn max_repeat(&self, grid_w: usize, grid_h: usize) -> u32 {
        let dim = grid_w.max(grid_h);
        self.steps
            .iter()
            .find(|s| dim >= s.min_dimension)
            .map_or(MAX_PREVIEW_REPEAT, |s| s.max_repeat)
            .clamp(MIN_PREVIEW_REPEAT, MAX_PREVIEW_REPEAT)
    }

    /// The repeat actually drawn for a requested value.
    pub fn effective_repeat(&self, requested: u32, grid_w: usize, grid_h: usize) -> u32 {
        requested.clamp(MIN_PREVIEW_REPEAT, self.max_repeat(grid_w, grid_h))
    }
}
