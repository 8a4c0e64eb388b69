//! Main screen: one card per step, in authoring order.
//!
//! Cards own the text widgets; every edit is written straight back to the
//! [`StepEditor`], which stays the only source of truth for saving.

use std::path::Path;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::UiConfig;
use crate::sop::{Step, StepEditor};
use crate::ui::form_field::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Title,
    Summary,
}

/// Widgets for a single step
pub struct StepCard {
    pub title: FormField,
    pub summary: FormField,
}

impl StepCard {
    fn new(step: &Step, ui: &UiConfig) -> Self {
        let mut title = FormField::text_input("Step title (required)", Some(ui.title_max_length));
        title.set_value(&step.title);
        let mut summary = FormField::text_area("Summary", ui.summary_height);
        summary.set_value(&step.summary);
        Self { title, summary }
    }

    fn field_mut(&mut self, field: StepField) -> &mut FormField {
        match field {
            StepField::Title => &mut self.title,
            StepField::Summary => &mut self.summary,
        }
    }

    /// Borders + title row + summary box + image row
    fn height(&self) -> u16 {
        2 + self.title.render_height() + self.summary.render_height() + 1
    }
}

pub struct EditorView {
    cards: Vec<StepCard>,
    focus: Option<(usize, StepField)>,
    /// Index of the first card drawn
    scroll: usize,
    ui: UiConfig,
}

impl EditorView {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            cards: Vec::new(),
            focus: None,
            scroll: 0,
            ui: ui.clone(),
        }
    }

    /// Recreate all cards from the editor, e.g. after a load.
    pub fn rebuild(&mut self, steps: &[Step]) {
        self.cards = steps.iter().map(|s| StepCard::new(s, &self.ui)).collect();
        self.scroll = 0;
        self.focus = if self.cards.is_empty() {
            None
        } else {
            Some((0, StepField::Title))
        };
    }

    /// Add a card for a step just appended to the editor and focus its title.
    pub fn push_card(&mut self, step: &Step) {
        self.cards.push(StepCard::new(step, &self.ui));
        self.focus = Some((self.cards.len() - 1, StepField::Title));
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn focus(&self) -> Option<(usize, StepField)> {
        self.focus
    }

    pub fn focused_step(&self) -> Option<usize> {
        self.focus.map(|(i, _)| i)
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            Some((i, StepField::Title)) => Some((i, StepField::Summary)),
            Some((i, StepField::Summary)) if i + 1 < self.cards.len() => {
                Some((i + 1, StepField::Title))
            }
            other => other,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            Some((i, StepField::Summary)) => Some((i, StepField::Title)),
            Some((i, StepField::Title)) if i > 0 => Some((i - 1, StepField::Summary)),
            other => other,
        };
    }

    pub fn next_step(&mut self) {
        if let Some((i, _)) = self.focus {
            if i + 1 < self.cards.len() {
                self.focus = Some((i + 1, StepField::Title));
            }
        }
    }

    pub fn prev_step(&mut self) {
        if let Some((i, _)) = self.focus {
            self.focus = Some((i.saturating_sub(1), StepField::Title));
        }
    }

    /// Send an editing key to the focused field and copy the new value into
    /// the editor. Returns true if the step changed.
    pub fn handle_key(&mut self, key: KeyEvent, editor: &mut StepEditor) -> bool {
        let Some((index, field)) = self.focus else {
            return false;
        };
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };

        let widget = card.field_mut(field);
        if !widget.handle_key(key) {
            return false;
        }

        let value = widget.value();
        match field {
            StepField::Title => editor.set_title(index, &value),
            StepField::Summary => editor.set_summary(index, &value),
        }
        true
    }

    /// First card to draw so the focused card fits in `height` rows
    fn scroll_for(&self, height: u16) -> usize {
        let Some(focused) = self.focused_step() else {
            return 0;
        };
        let mut first = self.scroll.min(focused);
        while first < focused {
            let needed: u32 = self.cards[first..=focused]
                .iter()
                .map(|c| u32::from(c.height()))
                .sum();
            if needed <= u32::from(height) {
                break;
            }
            first += 1;
        }
        first
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, editor: &StepEditor) {
        if self.cards.is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from("No steps yet."),
                Line::from(vec![
                    Span::raw("Press "),
                    Span::styled("F2", Style::default().fg(Color::Yellow)),
                    Span::raw(" to add the first step or "),
                    Span::styled("F4", Style::default().fg(Color::Yellow)),
                    Span::raw(" to load an SOP."),
                ]),
            ])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
            frame.render_widget(hint, area);
            return;
        }

        self.scroll = self.scroll_for(area.height);

        let mut y = area.y;
        let bottom = area.y + area.height;
        for index in self.scroll..self.cards.len() {
            let height = self.cards[index].height();
            if y + height > bottom {
                break;
            }
            let card_area = Rect::new(area.x, y, area.width, height);
            let focused_field = self.focus.filter(|(i, _)| *i == index).map(|(_, f)| f);
            let step = editor.step(index);
            render_card(
                frame,
                card_area,
                index,
                &mut self.cards[index],
                step,
                focused_field,
            );
            y += height;
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    index: usize,
    card: &mut StepCard,
    step: Option<&Step>,
    focused: Option<StepField>,
) {
    let border_color = if focused.is_some() {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let missing_title = step.is_some_and(|s| !s.has_title());

    let mut title_spans = vec![Span::styled(
        format!(" Step {} ", index + 1),
        Style::default()
            .fg(border_color)
            .add_modifier(Modifier::BOLD),
    )];
    if missing_title {
        title_spans.push(Span::styled(
            "untitled ",
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .title(Line::from(title_spans))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(card.title.render_height()),
            Constraint::Length(card.summary.render_height()),
            Constraint::Length(1),
        ])
        .split(inner);

    let title_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(10), Constraint::Min(1)])
        .split(rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled("Title:", Style::default().fg(Color::Gray))),
        title_row[0],
    );
    card.title
        .render(frame, title_row[1], focused == Some(StepField::Title));

    card.summary
        .render(frame, rows[1], focused == Some(StepField::Summary));

    frame.render_widget(Paragraph::new(image_line(step)), rows[2]);
}

/// Text-only stand-in for an image preview
fn image_line(step: Option<&Step>) -> Line<'static> {
    let label = Span::styled("Image:    ", Style::default().fg(Color::Gray));
    let Some(step) = step.filter(|s| s.has_image()) else {
        return Line::from(vec![
            label,
            Span::styled("No image", Style::default().fg(Color::DarkGray)),
        ]);
    };

    let name = step.image_file_name().unwrap_or_default();
    if Path::new(&step.image_reference).is_file() {
        Line::from(vec![
            label,
            Span::styled(name, Style::default().fg(Color::Green)),
        ])
    } else {
        Line::from(vec![
            label,
            Span::styled(name, Style::default().fg(Color::Yellow)),
            Span::styled(" (file not found)", Style::default().fg(Color::DarkGray)),
        ])
    }
}
