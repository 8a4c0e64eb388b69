//! Image picker: choose a file under the configured images directory or
//! type any path. Only the path is returned; the file is never opened.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{centered_rect, wrap_selection};
use crate::config::Config;
use crate::ui::form_field::FormField;

/// Upper bound on listed candidates so a huge directory stays responsive
const MAX_CANDIDATES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDialogFocus {
    List,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDialogResult {
    /// Step the image is for
    pub step_index: usize,
    pub path: String,
}

pub struct ImageDialog {
    pub visible: bool,
    pub focus: ImageDialogFocus,
    step_index: usize,
    root: PathBuf,
    candidates: Vec<PathBuf>,
    list_state: ListState,
    path_input: FormField,
}

/// Image files directly under `root` or one directory below it, sorted.
pub fn discover_images(root: &Path, config: &Config) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let mut found = Vec::new();

    for pattern in [format!("{escaped}/*"), format!("{escaped}/*/*")] {
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "Invalid image search pattern");
                continue;
            }
        };
        found.extend(paths.filter_map(Result::ok).filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| config.is_image_extension(e))
        }));
    }

    found.sort();
    found.truncate(MAX_CANDIDATES);
    tracing::debug!(root = %root.display(), count = found.len(), "Discovered images");
    found
}

impl ImageDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            focus: ImageDialogFocus::List,
            step_index: 0,
            root: PathBuf::new(),
            candidates: Vec::new(),
            list_state: ListState::default(),
            path_input: FormField::text_input("Type an image path", None),
        }
    }

    pub fn show(
        &mut self,
        step_index: usize,
        current: &str,
        root: PathBuf,
        candidates: Vec<PathBuf>,
    ) {
        let preselect = candidates
            .iter()
            .position(|c| c.to_string_lossy() == current)
            .or(if candidates.is_empty() { None } else { Some(0) });

        self.step_index = step_index;
        self.root = root;
        self.list_state.select(preselect);
        self.focus = if candidates.is_empty() {
            ImageDialogFocus::Path
        } else {
            ImageDialogFocus::List
        };
        self.candidates = candidates;
        self.path_input.set_value(current);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.candidates.clear();
        self.list_state.select(None);
        self.path_input.set_value("");
    }

    pub fn selected_candidate(&self) -> Option<&Path> {
        self.list_state
            .selected()
            .and_then(|i| self.candidates.get(i))
            .map(PathBuf::as_path)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ImageDialogResult> {
        match key.code {
            KeyCode::Esc => {
                self.hide();
                return None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    ImageDialogFocus::List => ImageDialogFocus::Path,
                    ImageDialogFocus::Path if !self.candidates.is_empty() => ImageDialogFocus::List,
                    ImageDialogFocus::Path => ImageDialogFocus::Path,
                };
                return None;
            }
            KeyCode::Enter => {
                let path = match self.focus {
                    ImageDialogFocus::List => self
                        .selected_candidate()
                        .map(|p| p.to_string_lossy().to_string()),
                    ImageDialogFocus::Path => {
                        let typed = self.path_input.value().trim().to_string();
                        (!typed.is_empty()).then_some(typed)
                    }
                };
                let result = path.map(|path| ImageDialogResult {
                    step_index: self.step_index,
                    path,
                });
                if result.is_some() {
                    self.hide();
                }
                return result;
            }
            _ => {}
        }

        match self.focus {
            ImageDialogFocus::List => match key.code {
                KeyCode::Up => {
                    let i = wrap_selection(self.list_state.selected(), self.candidates.len(), false);
                    self.list_state.select(i);
                }
                KeyCode::Down => {
                    let i = wrap_selection(self.list_state.selected(), self.candidates.len(), true);
                    self.list_state.select(i);
                }
                _ => {}
            },
            ImageDialogFocus::Path => {
                self.path_input.handle_key(key);
            }
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" Image for Step {} ", self.step_index + 1))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Candidates
                Constraint::Length(1), // Path label
                Constraint::Length(1), // Path input
                Constraint::Length(1), // Instructions
            ])
            .split(inner);

        let list_focused = self.focus == ImageDialogFocus::List;
        let list_block = Block::default()
            .title(format!(" {} ", self.root.display()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if list_focused {
                Color::Cyan
            } else {
                Color::Gray
            }));

        if self.candidates.is_empty() {
            frame.render_widget(
                Paragraph::new("No images found here. Type a path below.")
                    .style(Style::default().fg(Color::Gray))
                    .block(list_block),
                chunks[0],
            );
        } else {
            let items: Vec<ListItem> = self
                .candidates
                .iter()
                .map(|p| {
                    let shown = p.strip_prefix(&self.root).unwrap_or(p);
                    ListItem::new(Line::from(shown.to_string_lossy().to_string()))
                })
                .collect();
            let list = List::new(items)
                .block(list_block)
                .highlight_style(
                    Style::default()
                        .add_modifier(Modifier::REVERSED)
                        .fg(Color::Cyan),
                )
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        frame.render_widget(
            Paragraph::new(Span::styled("Path:", Style::default().fg(Color::Gray))),
            chunks[1],
        );
        self.path_input
            .render(frame, chunks[2], self.focus == ImageDialogFocus::Path);

        let instructions = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" select  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" list/path  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(
            Paragraph::new(instructions).alignment(Alignment::Center),
            chunks[3],
        );
    }
}
