use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::geometry::{LayoutPolicy, PreviewRepeatPolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub key_bindings: KeyBindings,
    /// Layout in character cells. Cell widths are in columns, heights in rows.
    #[serde(default = "LayoutPolicy::terminal")]
    pub layout: LayoutPolicy,
    #[serde(default)]
    pub preview_repeat: PreviewRepeatPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub paint: String,
    pub toggle_background: String,
    pub cursor_up: String,
    pub cursor_down: String,
    pub cursor_left: String,
    pub cursor_right: String,
    pub grow_top: String,
    pub grow_bottom: String,
    pub grow_left: String,
    pub grow_right: String,
    pub shrink_top: String,
    pub shrink_bottom: String,
    pub shrink_left: String,
    pub shrink_right: String,
    pub grow_centered: String,
    pub shrink_centered: String,
    pub repeat_x_less: String,
    pub repeat_x_more: String,
    pub repeat_y_less: String,
    pub repeat_y_more: String,
    pub aspect_less: String,
    pub aspect_more: String,
    pub add_color: String,
    pub delete_color: String,
    pub merge_color: String,
    pub next_swatch: String,
    pub clear: String,
    pub palette: String,
    pub undo: String,
    pub redo: String,
    pub save: String,
    pub quit: String,
    pub confirm: String,
    pub cancel: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            paint: "Space".into(),
            toggle_background: "e".into(),
            cursor_up: "Up".into(),
            cursor_down: "Down".into(),
            cursor_left: "Left".into(),
            cursor_right: "Right".into(),
            grow_top: "Shift-Up".into(),
            grow_bottom: "Shift-Down".into(),
            grow_left: "Shift-Left".into(),
            grow_right: "Shift-Right".into(),
            shrink_top: "Alt-Up".into(),
            shrink_bottom: "Alt-Down".into(),
            shrink_left: "Alt-Left".into(),
            shrink_right: "Alt-Right".into(),
            grow_centered: "=".into(),
            shrink_centered: "-".into(),
            repeat_x_less: "[".into(),
            repeat_x_more: "]".into(),
            repeat_y_less: "{".into(),
            repeat_y_more: "}".into(),
            aspect_less: "<".into(),
            aspect_more: ">".into(),
            add_color: "n".into(),
            delete_color: "d".into(),
            merge_color: "m".into(),
            next_swatch: "Tab".into(),
            clear: "c".into(),
            palette: "p".into(),
            undo: "Ctrl-z".into(),
            redo: "Ctrl-y".into(),
            save: "Ctrl-s".into(),
            quit: "q".into(),
            confirm: "Enter".into(),
            cancel: "Esc".into(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            key_bindings: KeyBindings::default(),
            layout: LayoutPolicy::terminal(),
            preview_repeat: PreviewRepeatPolicy::default(),
        }
    }
}

impl EditorConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => Self::parse(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %config_path.display(), error = %e, "invalid editor config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        let mut config: EditorConfig = serde_json::from_str(json)?;
        let unit = config.layout.unit_aspect;
        if !(unit.is_finite() && unit > 0.0) {
            config.layout.unit_aspect = LayoutPolicy::terminal().unit_aspect;
        }
        Ok(config)
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("pixel-pattern");
        path.push("editor.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
///
/// Bindings are a key name optionally prefixed by one of `Ctrl-`, `Alt-` or
/// `Shift-`. Shift is ignored for plain character bindings, since terminals
/// report `{` as Shift+`{` on most layouts.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Shift-") {
        return event.modifiers.contains(KeyModifiers::SHIFT)
            && !event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl-x or Alt-x.
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }
    // Named keys with Shift held belong to the `Shift-` bindings.
    let is_char = matches!(event.code, KeyCode::Char(_));
    if !is_char && event.modifiers.contains(KeyModifiers::SHIFT) {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_bindings_ignore_ctrl_and_alt() {
        assert!(matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::ALT)));
        assert!(matches_binding("{", &key(KeyCode::Char('{'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn shifted_arrows_are_distinct_from_plain_arrows() {
        let shift_up = key(KeyCode::Up, KeyModifiers::SHIFT);
        assert!(matches_binding("Shift-Up", &shift_up));
        assert!(!matches_binding("Up", &shift_up));
        assert!(!matches_binding("Shift-Up", &key(KeyCode::Up, KeyModifiers::NONE)));
        assert!(matches_binding("Alt-Left", &key(KeyCode::Left, KeyModifiers::ALT)));
    }

    #[test]
    fn ctrl_and_function_keys() {
        assert!(matches_binding("Ctrl-z", &key(KeyCode::Char('z'), KeyModifiers::CONTROL)));
        assert!(matches_binding("F5", &key(KeyCode::F(5), KeyModifiers::NONE)));
        assert!(!matches_binding("ab", &key(KeyCode::Char('a'), KeyModifiers::NONE)));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = EditorConfig::parse(r#"{"key_bindings":{"quit":"x"}}"#).unwrap();
        assert_eq!(config.key_bindings.quit, "x");
        assert_eq!(config.key_bindings.undo, "Ctrl-z");
        assert_eq!(config.layout, LayoutPolicy::terminal());
    }

    #[test]
    fn bad_unit_aspect_falls_back() {
        let config = EditorConfig::parse(r#"{"layout":{"unit_aspect":-1}}"#).unwrap();
        assert_eq!(config.layout.unit_aspect, 0.5);
    }
}
