//! Text input widgets used by step cards and dialogs

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// An editable text field
pub enum FormField {
    /// Single-line text input
    TextInput {
        value: String,
        /// Cursor position in characters, not bytes
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
        rows: u16,
    },
}

impl FormField {
    pub fn text_input(placeholder: impl Into<String>, max_length: Option<usize>) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.into(),
            max_length,
        }
    }

    pub fn text_area(placeholder: impl Into<String>, rows: u16) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.into(),
            rows: rows.max(1),
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    /// Replace the content, leaving the cursor at the end
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                let lines: Vec<String> = if new_value.is_empty() {
                    vec![String::new()]
                } else {
                    new_value.split('\n').map(str::to_string).collect()
                };
                let mut fresh = TextArea::new(lines);
                fresh.move_cursor(tui_textarea::CursorMove::Bottom);
                fresh.move_cursor(tui_textarea::CursorMove::End);
                **textarea = fresh;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FormField::TextInput { value, .. } => value.trim().is_empty(),
            FormField::TextArea { textarea, .. } => {
                textarea.lines().iter().all(|l| l.trim().is_empty())
            }
        }
    }

    /// Handle a key event, returns true if the field's content changed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                ..
            } => {
                let len = value.chars().count();
                // Ctrl/Alt chords are commands, not text
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    return false;
                }
                match key.code {
                    KeyCode::Char(c) => {
                        if max_length.map(|m| len < m).unwrap_or(true) {
                            value.insert(byte_index(value, *cursor_pos), c);
                            *cursor_pos += 1;
                            return true;
                        }
                        false
                    }
                    KeyCode::Backspace => {
                        if *cursor_pos > 0 {
                            *cursor_pos -= 1;
                            value.remove(byte_index(value, *cursor_pos));
                            return true;
                        }
                        false
                    }
                    KeyCode::Delete => {
                        if *cursor_pos < len {
                            value.remove(byte_index(value, *cursor_pos));
                            return true;
                        }
                        false
                    }
                    KeyCode::Left => {
                        *cursor_pos = cursor_pos.saturating_sub(1);
                        false
                    }
                    KeyCode::Right => {
                        if *cursor_pos < len {
                            *cursor_pos += 1;
                        }
                        false
                    }
                    KeyCode::Home => {
                        *cursor_pos = 0;
                        false
                    }
                    KeyCode::End => {
                        *cursor_pos = len;
                        false
                    }
                    _ => false,
                }
            }
            // TextArea handles its own key events
            FormField::TextArea { textarea, .. } => {
                textarea.input(key)
            }
        }
    }

    /// Rows needed to render this field, including borders for text areas
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 1,
            FormField::TextArea { rows, .. } => rows + 2,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                max_length,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(&text, *cursor_pos), '|');
                    }
                    let suffix = max_length
                        .filter(|_| focused)
                        .map(|m| format!(" ({}/{})", value.chars().count(), m))
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(text),
                        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                    ])
                };

                let para = Paragraph::new(content).style(Style::default().fg(if focused {
                    Color::White
                } else {
                    Color::Gray
                }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
                ..
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));

                frame.render_widget(&**textarea, area);
            }
        }
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
