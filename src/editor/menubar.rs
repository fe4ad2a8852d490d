use std::io;

use crossterm::{cursor, queue, style, terminal};

use super::state::{EditorState, Mode};
use super::ui::Layout;

/// Items are listed in a consistent order:
///   paint → resize → colours → view → global
fn mode_items(state: &EditorState) -> Vec<&'static str> {
    match &state.mode {
        Mode::Normal => vec![
            "[Space] paint",
            "[e]rase",
            "[Shift+←→↑↓] grow",
            "[Alt+←→↑↓] shrink",
            "[=][-] resize",
            "[1-9] colour",
            "[n]ew colour",
            "[Tab] swatch",
            "[d]el",
            "[m]erge",
            "[p]alette",
            "[[/]] repeat x",
            "[{/}] repeat y",
            "[<][>] aspect",
            "[c]lear",
            "[Ctrl-z] undo",
            "[Ctrl-y] redo",
            "[Ctrl-s]ave",
            "[q]uit",
        ],
        Mode::MergeColor { .. } => vec!["[↑][↓] target", "[Enter] merge", "[Esc] cancel"],
        Mode::Confirm { .. } => vec!["[↑][↓] select", "[Enter] confirm", "[y]es", "[n]o"],
    }
}

pub fn render_menubar(stdout: &mut io::Stdout, layout: &Layout, state: &EditorState) -> anyhow::Result<()> {
    if layout.menu_h == 0 {
        return Ok(());
    }

    let items = mode_items(state);

    let mut line: u16 = 0;
    let mut x: u16 = 1;

    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;

    for (i, item) in items.iter().enumerate() {
        let item_w = item.chars().count() as u16;

        if i > 0 {
            if x + 2 + item_w > layout.term_width {
                if line + 1 < layout.menu_h {
                    line += 1;
                    x = 1;
                    queue!(
                        stdout,
                        cursor::MoveTo(0, line),
                        terminal::Clear(terminal::ClearType::CurrentLine),
                        style::Print(" "),
                    )?;
                } else {
                    break;
                }
            } else {
                queue!(stdout, style::Print("  "))?;
                x += 2;
            }
        }

        if x + item_w > layout.term_width {
            break;
        }

        print_menu_item(stdout, item)?;
        x += item_w;
    }

    for l in line + 1..layout.menu_h {
        queue!(
            stdout,
            cursor::MoveTo(0, l),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
    }

    Ok(())
}

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(stdout: &mut io::Stdout, item: &str) -> anyhow::Result<()> {
    for (text, bold) in split_menu_item(item) {
        let attr = if bold { style::Attribute::Bold } else { style::Attribute::Dim };
        queue!(
            stdout,
            style::SetAttribute(attr),
            style::Print(text),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}

/// Split into `(text, is_key)` runs. An unclosed `[` is treated as plain text.
fn split_menu_item(item: &str) -> Vec<(&str, bool)> {
    let mut runs = Vec::new();
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            runs.push((rest, false));
            break;
        };
        if open > 0 {
            runs.push((&rest[..open], false));
        }
        rest = &rest[open..];
        match rest.find(']') {
            Some(close) => {
                runs.push((&rest[..=close], true));
                rest = &rest[close + 1..];
            }
            None => {
                runs.push((rest, false));
                break;
            }
        }
    }
    runs
}
