use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{centered_rect, wrap_selection};

/// Picks a stored SOP to load
pub struct LoadDialog {
    pub visible: bool,
    documents: Vec<String>,
    list_state: ListState,
    /// Where the documents live, shown in the title
    location: String,
}

impl LoadDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            documents: Vec::new(),
            list_state: ListState::default(),
            location: String::new(),
        }
    }

    pub fn show(&mut self, documents: Vec<String>, location: impl Into<String>) {
        self.list_state
            .select(if documents.is_empty() { None } else { Some(0) });
        self.documents = documents;
        self.location = location.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.documents.clear();
        self.list_state.select(None);
    }

    pub fn selected(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.documents.get(i))
            .map(String::as_str)
    }

    /// Returns the document to load on Enter
    pub fn handle_key(&mut self, key: KeyCode) -> Option<String> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = wrap_selection(self.list_state.selected(), self.documents.len(), false);
                self.list_state.select(i);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = wrap_selection(self.list_state.selected(), self.documents.len(), true);
                self.list_state.select(i);
            }
            KeyCode::Enter => {
                let chosen = self.selected().map(str::to_string);
                if chosen.is_some() {
                    self.hide();
                }
                return chosen;
            }
            KeyCode::Esc => {
                self.hide();
            }
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(50, 60, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Load SOP ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                self.location.as_str(),
                Style::default().fg(Color::DarkGray),
            )),
            chunks[0],
        );

        if self.documents.is_empty() {
            frame.render_widget(
                Paragraph::new("No saved SOPs yet.")
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = self
                .documents
                .iter()
                .map(|name| ListItem::new(Line::from(name.as_str())))
                .collect();
            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .add_modifier(Modifier::REVERSED)
                        .fg(Color::Cyan),
                )
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let instructions = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" load (replaces current steps)  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(
            Paragraph::new(instructions).alignment(Alignment::Center),
            chunks[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<String> {
        vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()]
    }

    #[test]
    fn test_show_selects_first_document() {
        let mut dialog = LoadDialog::new();
        dialog.show(docs(), "/tmp/sops");
        assert!(dialog.visible);
        assert_eq!(dialog.selected(), Some("alpha"));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut dialog = LoadDialog::new();
        dialog.show(docs(), "");
        dialog.handle_key(KeyCode::Up);
        assert_eq!(dialog.selected(), Some("gamma"));
        dialog.handle_key(KeyCode::Down);
        assert_eq!(dialog.selected(), Some("alpha"));
        dialog.handle_key(KeyCode::Char('j'));
        assert_eq!(dialog.selected(), Some("beta"));
    }

    #[test]
    fn test_enter_returns_selection() {
        let mut dialog = LoadDialog::new();
        dialog.show(docs(), "");
        dialog.handle_key(KeyCode::Down);
        assert_eq!(dialog.handle_key(KeyCode::Enter).as_deref(), Some("beta"));
        assert!(!dialog.visible);
    }

    #[test]
    fn test_enter_with_no_documents_stays_open() {
        let mut dialog = LoadDialog::new();
        dialog.show(vec![], "");
        assert_eq!(dialog.handle_key(KeyCode::Enter), None);
        assert!(dialog.visible);
        dialog.handle_key(KeyCode::Esc);
        assert!(!dialog.visible);
    }
}
