use std::io;

use crossterm::{cursor, queue, style, terminal};

use super::state::{EditorState, Mode};
use super::ui::Layout;

pub fn render_statusbar(stdout: &mut io::Stdout, layout: &Layout, state: &EditorState) -> anyhow::Result<()> {
    let y = layout.status_y;
    let session = &state.session;
    let grid = session.grid();

    // Row 1: grid facts
    queue!(
        stdout,
        cursor::MoveTo(0, y),
        terminal::Clear(terminal::ClearType::CurrentLine),
    )?;
    let (rx, ry) = session.effective_preview_repeat();
    let history = session.history();
    queue!(
        stdout,
        style::Print(format!(
            " {}×{}  aspect {:.1}  preview {rx}×{ry} (max {})  cursor {},{}  history {}/{}",
            grid.width(),
            grid.height(),
            session.aspect_ratio(),
            session.max_preview_repeat(),
            state.cursor.0 + 1,
            state.cursor.1 + 1,
            history.index() + 1,
            history.len(),
        )),
    )?;

    // Row 2: mode + status
    queue!(
        stdout,
        cursor::MoveTo(0, y + 1),
        terminal::Clear(terminal::ClearType::CurrentLine),
    )?;
    let mode_str = match &state.mode {
        Mode::Normal if session.background_active() => "ERASE",
        Mode::Normal => "PAINT",
        Mode::MergeColor { .. } => "MERGE",
        Mode::Confirm { .. } => "CONFIRM",
    };
    let dirty_str = if state.dirty() { " [modified]" } else { "" };
    let status = match &state.mode {
        Mode::Confirm { message, .. } => message.as_str(),
        _ => state.status_message.as_deref().unwrap_or(""),
    };
    queue!(
        stdout,
        style::SetAttribute(style::Attribute::Dim),
        style::Print(format!(" {mode_str} | {}{dirty_str} ", state.file_path)),
        style::SetAttribute(style::Attribute::Reset),
        style::Print(status),
    )?;

    Ok(())
}
