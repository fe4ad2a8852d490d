use std::io;

use crossterm::{cursor, queue, style};

use crate::palettes;
use crate::types::Rgb;

use super::canvas::to_terminal;
use super::state::{EditorState, Mode};
use super::ui::Layout;

pub fn render_right_panel(stdout: &mut io::Stdout, layout: &Layout, state: &EditorState) -> anyhow::Result<()> {
    if layout.right_panel_width == 0 {
        return Ok(());
    }

    let panel_x = layout.canvas_x + layout.canvas_width;
    let pw = layout.right_panel_width;
    let cy = layout.canvas_y;
    let bottom = cy + layout.canvas_height;

    for y in 0..layout.canvas_height {
        queue!(stdout, cursor::MoveTo(panel_x, cy + y), style::Print("\u{2502}"))?;
    }

    let title = match &state.mode {
        Mode::MergeColor { .. } => "Merge into",
        Mode::Confirm { .. } => "Confirm",
        Mode::Normal => "Colours",
    };
    queue!(
        stdout,
        cursor::MoveTo(panel_x + 2, cy),
        style::SetAttribute(style::Attribute::Bold),
        style::Print(title),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    queue!(stdout, cursor::MoveTo(panel_x, cy + 1), style::Print("\u{253c}"))?;
    for _ in 1..pw {
        queue!(stdout, style::Print("\u{2500}"))?;
    }

    if let Mode::Confirm { message, selected, .. } = &state.mode {
        queue!(stdout, cursor::MoveTo(panel_x + 2, cy + 2), style::Print(message))?;
        for (i, label) in ["Yes", "No"].iter().enumerate() {
            let y = cy + 4 + i as u16;
            if y >= bottom {
                break;
            }
            queue!(stdout, cursor::MoveTo(panel_x + 2, y))?;
            if i == *selected {
                queue!(
                    stdout,
                    style::SetAttribute(style::Attribute::Reverse),
                    style::Print(format!("> {label}")),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
            } else {
                queue!(stdout, style::Print(format!("  {label}")))?;
            }
        }
        return Ok(());
    }

    let session = &state.session;
    let active = session.active_color() as usize - 1;
    let highlighted = match state.mode {
        Mode::MergeColor { target, .. } => Some(target),
        _ => None,
    };

    let mut y = cy + 2;
    for (i, &color) in session.pattern_colors().iter().enumerate() {
        if y >= bottom {
            return Ok(());
        }
        let marker = if i == active && !session.background_active() { '>' } else { ' ' };
        queue!(stdout, cursor::MoveTo(panel_x + 2, y), style::Print(marker))?;
        print_swatch(stdout, color)?;
        let label = format!(" {:>2} {color}", i + 1);
        if highlighted == Some(i) {
            queue!(
                stdout,
                style::SetAttribute(style::Attribute::Reverse),
                style::Print(label),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        } else {
            queue!(stdout, style::Print(label))?;
        }
        y += 1;
    }

    y += 1;
    if y < bottom {
        let marker = if session.background_active() { '>' } else { ' ' };
        queue!(stdout, cursor::MoveTo(panel_x + 2, y), style::Print(marker))?;
        print_swatch(stdout, session.background_color())?;
        queue!(stdout, style::Print(format!(" bg {}", session.background_color())))?;
    }

    y += 2;
    if y < bottom {
        let name = palettes::builtin(session.active_palette()).map_or("Custom", |p| p.name);
        queue!(
            stdout,
            cursor::MoveTo(panel_x + 2, y),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!("Palette: {name}")),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    y += 1;
    if y < bottom {
        queue!(stdout, cursor::MoveTo(panel_x + 2, y))?;
        let max = (pw.saturating_sub(3) / 2) as usize;
        for &color in session.swatches().iter().take(max) {
            print_swatch(stdout, color)?;
        }
    }

    Ok(())
}

fn print_swatch(stdout: &mut io::Stdout, color: Rgb) -> anyhow::Result<()> {
    queue!(
        stdout,
        style::SetBackgroundColor(to_terminal(color)),
        style::Print("  "),
        style::ResetColor,
    )?;
    Ok(())
}
