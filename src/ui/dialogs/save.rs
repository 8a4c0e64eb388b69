use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::ui::form_field::FormField;

/// Prompt for the name to save the current SOP under
pub struct SaveDialog {
    pub visible: bool,
    name: FormField,
    /// Names already in the store, for the overwrite hint
    existing: Vec<String>,
    step_count: usize,
}

impl SaveDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            name: FormField::text_input("Enter a name for this SOP", Some(64)),
            existing: Vec::new(),
            step_count: 0,
        }
    }

    /// Show the prompt, pre-filled with the session's current name if any
    pub fn show(&mut self, current_name: Option<&str>, existing: Vec<String>, step_count: usize) {
        self.name.set_value(current_name.unwrap_or_default());
        self.existing = existing;
        self.step_count = step_count;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.name.set_value("");
        self.existing.clear();
    }

    pub fn name(&self) -> String {
        self.name.value()
    }

    /// Whether saving under the typed name replaces an existing SOP
    pub fn will_overwrite(&self) -> bool {
        let name = self.name.value();
        let name = name.trim();
        self.existing.iter().any(|e| e == name)
    }

    /// Returns the chosen name on Enter. An empty name cancels.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        match key.code {
            KeyCode::Enter => {
                let name = self.name.value().trim().to_string();
                self.hide();
                if name.is_empty() {
                    None
                } else {
                    Some(name)
                }
            }
            KeyCode::Esc => {
                self.hide();
                None
            }
            _ => {
                self.name.handle_key(key);
                None
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Save SOP ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Summary
                Constraint::Length(1), // Name input
                Constraint::Length(2), // Overwrite hint
                Constraint::Min(1),    // Instructions
            ])
            .margin(1)
            .split(inner);

        let noun = if self.step_count == 1 { "step" } else { "steps" };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("Saving {} {}. Name:", self.step_count, noun),
                Style::default().fg(Color::Gray),
            ))),
            chunks[0],
        );

        self.name.render(frame, chunks[1], true);

        if self.will_overwrite() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "An SOP with this name exists and will be replaced.",
                    Style::default().fg(Color::Yellow),
                ))),
                chunks[2],
            );
        }

        let instructions = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" to save  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" to cancel"),
        ]);
        frame.render_widget(
            Paragraph::new(instructions).alignment(Alignment::Center),
            chunks[3],
        );
    }
}
