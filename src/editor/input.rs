use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::error::EdgeResizeError;
use crate::grid::Edge;
use crate::types::{CellValue, MAX_GRID_SIZE};

use super::config::matches_binding;
use super::state::{ConfirmAction, EditorState, Mode};
use super::ui::Layout;

const ASPECT_STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Redraw,
    Quit,
}

pub fn handle_event(state: &mut EditorState, event: Event, layout: &Layout) -> Action {
    match event {
        Event::Key(key) => handle_key(state, key),
        Event::Mouse(mouse) => handle_mouse(state, mouse, layout),
        Event::Resize(_, _) => Action::Redraw,
        Event::FocusLost => {
            // Releases outside the window never arrive.
            if state.session.end_stroke() {
                Action::Redraw
            } else {
                Action::Continue
            }
        }
        _ => Action::Continue,
    }
}

fn handle_key(state: &mut EditorState, key: KeyEvent) -> Action {
    match &state.mode {
        Mode::Normal => handle_normal(state, key),
        Mode::MergeColor { .. } => handle_merge(state, key),
        Mode::Confirm { .. } => handle_confirm(state, key),
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

fn handle_mouse(state: &mut EditorState, mouse: MouseEvent, layout: &Layout) -> Action {
    if state.mode != Mode::Normal {
        return Action::Continue;
    }
    let grid = state.session.grid();
    let hit = layout.cell_at(mouse.column, mouse.row, grid.width(), grid.height());
    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);

    match mouse.kind {
        MouseEventKind::Down(button @ (MouseButton::Left | MouseButton::Right)) => {
            let Some((row, col)) = hit else {
                return Action::Continue;
            };
            state.cursor = (row, col);
            state.status_message = None;
            state.session.begin_stroke(row, col);
            state.session.continue_stroke(row, col, button == MouseButton::Right || shift);
            Action::Redraw
        }
        MouseEventKind::Drag(button) if state.session.in_stroke() => match hit {
            Some((row, col)) => {
                state.cursor = (row, col);
                let erase = button == MouseButton::Right || shift;
                if state.session.continue_stroke(row, col, erase) {
                    Action::Redraw
                } else {
                    Action::Continue
                }
            }
            // Leaving the canvas ends the stroke.
            None => {
                state.session.end_stroke();
                Action::Redraw
            }
        },
        MouseEventKind::Up(_) if state.session.in_stroke() => {
            state.session.end_stroke();
            Action::Redraw
        }
        _ => Action::Continue,
    }
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

fn handle_normal(state: &mut EditorState, key: KeyEvent) -> Action {
    let bindings = state.config.key_bindings.clone();

    if matches_binding(&bindings.quit, &key) {
        return Action::Quit;
    }
    if matches_binding(&bindings.save, &key) {
        if let Err(e) = state.save() {
            state.status_message = Some(format!("Save failed: {e:#}"));
        }
        return Action::Redraw;
    }
    if matches_binding(&bindings.undo, &key) {
        if !state.session.undo() {
            state.status_message = Some("Nothing to undo".into());
        }
        state.clamp_cursor();
        return Action::Redraw;
    }
    if matches_binding(&bindings.redo, &key) {
        if !state.session.redo() {
            state.status_message = Some("Nothing to redo".into());
        }
        state.clamp_cursor();
        return Action::Redraw;
    }

    // Edge resizes are checked before plain cursor movement: both use arrows.
    let edge_keys = [
        (&bindings.grow_top, Edge::Top, 1),
        (&bindings.grow_bottom, Edge::Bottom, 1),
        (&bindings.grow_left, Edge::Left, 1),
        (&bindings.grow_right, Edge::Right, 1),
        (&bindings.shrink_top, Edge::Top, -1),
        (&bindings.shrink_bottom, Edge::Bottom, -1),
        (&bindings.shrink_left, Edge::Left, -1),
        (&bindings.shrink_right, Edge::Right, -1),
    ];
    for (binding, edge, delta) in edge_keys {
        if matches_binding(binding, &key) {
            resize_edge(state, edge, delta);
            return Action::Redraw;
        }
    }

    let moves = [
        (&bindings.cursor_up, -1, 0),
        (&bindings.cursor_down, 1, 0),
        (&bindings.cursor_left, 0, -1),
        (&bindings.cursor_right, 0, 1),
    ];
    for (binding, d_row, d_col) in moves {
        if matches_binding(binding, &key) {
            state.move_cursor(d_row, d_col);
            return Action::Redraw;
        }
    }

    if matches_binding(&bindings.paint, &key) {
        let (row, col) = state.cursor;
        state.session.begin_stroke(row, col);
        state.session.continue_stroke(row, col, false);
        state.session.end_stroke();
        state.status_message = None;
        return Action::Redraw;
    }
    if matches_binding(&bindings.toggle_background, &key) {
        let active = !state.session.background_active();
        state.session.set_background_active(active);
        state.status_message = Some(if active { "Erasing".into() } else { "Painting".into() });
        return Action::Redraw;
    }
    if matches_binding(&bindings.grow_centered, &key) {
        let grid = state.session.grid();
        let (w, h) = (grid.width() + 1, grid.height() + 1);
        resize_centered(state, w.min(MAX_GRID_SIZE), h.min(MAX_GRID_SIZE));
        return Action::Redraw;
    }
    if matches_binding(&bindings.shrink_centered, &key) {
        let grid = state.session.grid();
        let (w, h) = (grid.width().saturating_sub(1), grid.height().saturating_sub(1));
        resize_centered(state, w, h);
        return Action::Redraw;
    }

    let repeat_keys = [
        (&bindings.repeat_x_less, -1, 0),
        (&bindings.repeat_x_more, 1, 0),
        (&bindings.repeat_y_less, 0, -1),
        (&bindings.repeat_y_more, 0, 1),
    ];
    for (binding, dx, dy) in repeat_keys {
        if matches_binding(binding, &key) {
            let (x, y) = state.session.preview_repeat();
            state
                .session
                .set_preview_repeat(x.saturating_add_signed(dx), y.saturating_add_signed(dy));
            let (x, y) = state.session.preview_repeat();
            state.status_message = Some(format!("Preview {x}×{y}"));
            return Action::Redraw;
        }
    }
    if matches_binding(&bindings.aspect_less, &key) || matches_binding(&bindings.aspect_more, &key) {
        let step = if matches_binding(&bindings.aspect_less, &key) { -ASPECT_STEP } else { ASPECT_STEP };
        let ratio = ((state.session.aspect_ratio() + step) * 10.0).round() / 10.0;
        state.session.set_aspect_ratio(ratio);
        state.status_message = Some(format!("Aspect {:.1}", state.session.aspect_ratio()));
        return Action::Redraw;
    }

    if matches_binding(&bindings.add_color, &key) {
        state.add_swatch_color();
        return Action::Redraw;
    }
    if matches_binding(&bindings.next_swatch, &key) {
        state.cycle_active_swatch();
        return Action::Redraw;
    }
    if matches_binding(&bindings.palette, &key) {
        state.cycle_palette();
        return Action::Redraw;
    }
    if matches_binding(&bindings.delete_color, &key) {
        if state.session.pattern_colors().len() <= 1 {
            state.status_message = Some("Cannot delete the last colour".into());
        } else {
            let index = state.session.active_color() as usize - 1;
            state.mode = Mode::Confirm {
                message: format!("Delete colour {}?", index + 1),
                selected: 0,
                action: ConfirmAction::DeleteColor { index },
            };
        }
        return Action::Redraw;
    }
    if matches_binding(&bindings.merge_color, &key) {
        if state.session.pattern_colors().len() <= 1 {
            state.status_message = Some("Nothing to merge into".into());
        } else {
            let source = state.session.active_color() as usize - 1;
            let target = if source == 0 { 1 } else { 0 };
            state.mode = Mode::MergeColor { source, target };
        }
        return Action::Redraw;
    }
    if matches_binding(&bindings.clear, &key) {
        if state.session.grid().is_blank() {
            state.status_message = Some("Grid is already blank".into());
        } else {
            state.mode = Mode::Confirm {
                message: "Clear the grid?".into(),
                selected: 0,
                action: ConfirmAction::Clear,
            };
        }
        return Action::Redraw;
    }

    // Digits pick pattern colours 1-9; 0 selects the tenth.
    if let KeyCode::Char(c @ '0'..='9') = key.code {
        if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            let value = match c.to_digit(10) {
                Some(0) => 10,
                Some(d) => d as CellValue,
                None => return Action::Continue,
            };
            match state.session.set_active_color(value) {
                Ok(()) => {
                    state.session.set_background_active(false);
                    state.status_message = None;
                }
                Err(e) => state.status_message = Some(e.to_string()),
            }
            return Action::Redraw;
        }
    }

    Action::Continue
}

fn resize_edge(state: &mut EditorState, edge: Edge, delta: i64) {
    match state.session.resize_edge(edge, delta) {
        Ok(()) => {
            let grid = state.session.grid();
            state.status_message = Some(format!("{}×{}", grid.width(), grid.height()));
            // Keep the cursor on the same content when the origin moves.
            match (edge, delta > 0) {
                (Edge::Top, true) => state.move_cursor(1, 0),
                (Edge::Left, true) => state.move_cursor(0, 1),
                (Edge::Top, false) => state.move_cursor(-1, 0),
                (Edge::Left, false) => state.move_cursor(0, -1),
                _ => {}
            }
            state.clamp_cursor();
        }
        Err(EdgeResizeError::CropRejected) => {
            state.status_message = Some("Resize would crop painted cells".into());
        }
        Err(EdgeResizeError::Unchanged) => {
            state.status_message = Some("Grid is at its size limit".into());
        }
    }
}

fn resize_centered(state: &mut EditorState, width: usize, height: usize) {
    match state.session.resize_centered(width, height) {
        Ok(()) => {
            let grid = state.session.grid();
            state.status_message = Some(format!("{}×{}", grid.width(), grid.height()));
            state.clamp_cursor();
        }
        Err(e) => state.status_message = Some(format!("Resize refused: {e}")),
    }
}

fn handle_merge(state: &mut EditorState, key: KeyEvent) -> Action {
    let bindings = state.config.key_bindings.clone();
    let Mode::MergeColor { source, target } = state.mode else {
        return Action::Continue;
    };
    let len = state.session.pattern_colors().len();

    if matches_binding(&bindings.cancel, &key) {
        state.mode = Mode::Normal;
        return Action::Redraw;
    }
    let step = |from: usize, forward: bool| {
        let mut next = from;
        loop {
            next = if forward { (next + 1) % len } else { (next + len - 1) % len };
            if next != source {
                return next;
            }
        }
    };
    if matches_binding(&bindings.cursor_down, &key) {
        state.mode = Mode::MergeColor { source, target: step(target, true) };
        return Action::Redraw;
    }
    if matches_binding(&bindings.cursor_up, &key) {
        state.mode = Mode::MergeColor { source, target: step(target, false) };
        return Action::Redraw;
    }
    if matches_binding(&bindings.confirm, &key) {
        state.mode = Mode::Normal;
        state.status_message = Some(match state.session.merge_colors(source, target) {
            Ok(()) => format!("Merged colour {} into {}", source + 1, target + 1),
            Err(e) => e.to_string(),
        });
        return Action::Redraw;
    }

    Action::Continue
}

fn handle_confirm(state: &mut EditorState, key: KeyEvent) -> Action {
    let (selected, action) = match &state.mode {
        Mode::Confirm { selected, action, .. } => (*selected, action.clone()),
        _ => return Action::Continue,
    };

    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            if let Mode::Confirm { selected: sel, .. } = &mut state.mode {
                *sel = if selected == 0 { 1 } else { 0 };
            }
            Action::Redraw
        }
        KeyCode::Char('y') => {
            run_confirmed(state, action);
            Action::Redraw
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            Action::Redraw
        }
        KeyCode::Enter => {
            if selected == 0 {
                run_confirmed(state, action);
            } else {
                state.mode = Mode::Normal;
            }
            Action::Redraw
        }
        _ => Action::Continue,
    }
}

fn run_confirmed(state: &mut EditorState, action: ConfirmAction) {
    state.mode = Mode::Normal;
    state.status_message = Some(match action {
        ConfirmAction::Clear => {
            state.session.clear();
            "Cleared".into()
        }
        ConfirmAction::DeleteColor { index } => match state.session.delete_color(index) {
            Ok(()) => format!("Deleted colour {}", index + 1),
            Err(e) => e.to_string(),
        },
    });
}
