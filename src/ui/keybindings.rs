//! Keyboard shortcuts registry.
//!
//! Single source for the footer bar and the help dialog. Editing keys
//! (characters, arrows, Backspace) always go to the focused field, so every
//! command lives on a function key or Tab.

use crossterm::event::KeyCode;

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    pub alt_key: Option<KeyCode>,
    pub description: &'static str,
    /// Short label for the footer; `None` keeps it out of the footer
    pub footer: Option<&'static str>,
    pub context: ShortcutContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Step editor screen
    Editor,
    /// Any open dialog
    Dialog,
}

impl ShortcutContext {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Editor => "Editor",
            ShortcutContext::Dialog => "Dialogs",
        }
    }

    pub fn all() -> &'static [ShortcutContext] {
        &[ShortcutContext::Editor, ShortcutContext::Dialog]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "F2", "Tab", "Shift+Tab")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for help dialog (left-padded to 14 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<14}", self.key_display())
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => format!("{key:?}"),
    }
}

pub static SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        key: KeyCode::F(1),
        alt_key: None,
        description: "Toggle help",
        footer: Some("Help"),
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::F(2),
        alt_key: None,
        description: "Add a step at the end",
        footer: Some("Add step"),
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::F(3),
        alt_key: None,
        description: "Save SOP",
        footer: Some("Save"),
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::F(4),
        alt_key: None,
        description: "Load SOP",
        footer: Some("Load"),
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::F(5),
        alt_key: None,
        description: "Choose image for the focused step",
        footer: Some("Image"),
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::F(6),
        alt_key: None,
        description: "Remove image from the focused step",
        footer: None,
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::F(10),
        alt_key: None,
        description: "Quit (also Ctrl+C)",
        footer: Some("Quit"),
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::Tab,
        alt_key: Some(KeyCode::BackTab),
        description: "Next / previous field",
        footer: None,
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::PageDown,
        alt_key: Some(KeyCode::PageUp),
        description: "Next / previous step",
        footer: None,
        context: ShortcutContext::Editor,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Confirm",
        footer: None,
        context: ShortcutContext::Dialog,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Cancel",
        footer: None,
        context: ShortcutContext::Dialog,
    },
    Shortcut {
        key: KeyCode::Up,
        alt_key: Some(KeyCode::Down),
        description: "Move selection",
        footer: None,
        context: ShortcutContext::Dialog,
    },
    Shortcut {
        key: KeyCode::Tab,
        alt_key: None,
        description: "Switch between list and path input (image picker)",
        footer: None,
        context: ShortcutContext::Dialog,
    },
];

pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// (key, label) pairs shown in the editor footer
pub fn footer_entries() -> Vec<(String, &'static str)> {
    shortcuts_for_context(ShortcutContext::Editor)
        .filter_map(|s| s.footer.map(|label| (s.key_display(), label)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicate_keys_per_context() {
        for context in ShortcutContext::all() {
            let mut seen = HashSet::new();
            for shortcut in shortcuts_for_context(*context) {
                assert!(
                    seen.insert(format!("{:?}", shortcut.key)),
                    "duplicate {:?} in {:?}",
                    shortcut.key,
                    context
                );
            }
        }
    }

    #[test]
    fn test_editor_commands_avoid_text_keys() {
        for shortcut in shortcuts_for_context(ShortcutContext::Editor) {
            assert!(
                !matches!(shortcut.key, KeyCode::Char(_)),
                "{} would be swallowed by text fields",
                shortcut.description
            );
        }
    }

    #[test]
    fn test_footer_entries() {
        let footer = footer_entries();
        assert_eq!(footer[0], ("F1".to_string(), "Help"));
        assert!(footer.iter().any(|(k, l)| k == "F3" && *l == "Save"));
        assert!(footer.iter().all(|(k, _)| k != "F6"));
    }

    #[test]
    fn test_key_display_with_alt() {
        let tab = shortcuts_for_context(ShortcutContext::Editor)
            .find(|s| s.key == KeyCode::Tab)
            .unwrap();
        assert_eq!(tab.key_display(), "Tab/Shift+Tab");
    }
}
