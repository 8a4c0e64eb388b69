use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::config::Config;
use crate::sop::{DocumentStore, SopError, StepEditor};
use crate::ui::dialogs::{discover_images, ImageDialogResult};
use crate::ui::keybindings::footer_entries;
use crate::ui::{EditorView, HelpDialog, ImageDialog, LoadDialog, SaveDialog, TerminalGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Outcome of the last user action, shown above the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

pub struct App {
    config: Config,
    store: DocumentStore,
    editor: StepEditor,
    view: EditorView,
    help_dialog: HelpDialog,
    save_dialog: SaveDialog,
    load_dialog: LoadDialog,
    image_dialog: ImageDialog,
    status: Option<Status>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store = DocumentStore::from_config(&config);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: DocumentStore) -> Self {
        let view = EditorView::new(&config.ui);
        Self {
            config,
            store,
            editor: StepEditor::new(),
            view,
            help_dialog: HelpDialog::new(),
            save_dialog: SaveDialog::new(),
            load_dialog: LoadDialog::new(),
            image_dialog: ImageDialog::new(),
            status: None,
            should_quit: false,
        }
    }

    pub fn editor(&self) -> &StepEditor {
        &self.editor
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run(&mut self) -> Result<()> {
        let mut guard = TerminalGuard::enter()?;
        tracing::info!(documents = %self.store.dir().display(), "Editor started");

        while !self.should_quit {
            guard.terminal().draw(|f| self.render(f))?;

            // Blocking read: every action runs to completion before the next
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }

        tracing::info!("Editor closed");
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.help_dialog.visible {
            self.help_dialog.visible = false;
            return;
        }

        if self.save_dialog.visible {
            if let Some(name) = self.save_dialog.handle_key(key) {
                self.save_as(&name);
            }
            return;
        }

        if self.load_dialog.visible {
            if let Some(name) = self.load_dialog.handle_key(key.code) {
                self.load(&name);
            }
            return;
        }

        if self.image_dialog.visible {
            if let Some(result) = self.image_dialog.handle_key(key) {
                self.apply_image(result);
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => self.help_dialog.toggle(),
            KeyCode::F(2) => self.add_step(),
            KeyCode::F(3) => self.open_save_dialog(),
            KeyCode::F(4) => self.open_load_dialog(),
            KeyCode::F(5) => self.open_image_dialog(),
            KeyCode::F(6) => self.clear_image(),
            KeyCode::F(10) => self.should_quit = true,
            KeyCode::Tab => self.view.next_field(),
            KeyCode::BackTab => self.view.prev_field(),
            KeyCode::PageDown => self.view.next_step(),
            KeyCode::PageUp => self.view.prev_step(),
            _ => {
                self.view.handle_key(key, &mut self.editor);
            }
        }
    }

    pub fn add_step(&mut self) {
        let index = self.editor.add_step();
        if let Some(step) = self.editor.step(index) {
            self.view.push_card(step);
        }
        tracing::debug!(step = index + 1, "Added step");
        self.status = Some(Status::info(format!("Added step {}", index + 1)));
    }

    fn open_save_dialog(&mut self) {
        let existing = self.store.list().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not list SOPs for overwrite check");
            Vec::new()
        });
        self.save_dialog
            .show(self.editor.document_name(), existing, self.editor.len());
    }

    /// Save the session under `name`. A failed save leaves both the session
    /// and any stored document untouched.
    pub fn save_as(&mut self, name: &str) {
        match self.store.save(name, self.editor.steps()) {
            Ok(path) => {
                let name = name.trim().to_string();
                self.status = Some(Status::info(format!(
                    "Saved '{}' ({} steps) to {}",
                    name,
                    self.editor.len(),
                    path.display()
                )));
                self.editor.set_document_name(name);
            }
            Err(e) => self.report(&e),
        }
    }

    fn open_load_dialog(&mut self) {
        match self.store.list() {
            Ok(names) => self
                .load_dialog
                .show(names, self.store.dir().display().to_string()),
            Err(e) => self.report(&e),
        }
    }

    /// Replace the session with a stored document. On failure the current
    /// steps are kept.
    pub fn load(&mut self, name: &str) {
        match self.store.load(name) {
            Ok(steps) => {
                let count = steps.len();
                self.editor.replace_steps(steps);
                self.editor.set_document_name(name.trim());
                self.view.rebuild(self.editor.steps());
                self.status = Some(Status::info(format!(
                    "Loaded '{}' ({} steps)",
                    name.trim(),
                    count
                )));
            }
            Err(e) => self.report(&e),
        }
    }

    fn open_image_dialog(&mut self) {
        let Some(index) = self.view.focused_step() else {
            self.status = Some(Status::error("Add a step before choosing an image"));
            return;
        };
        let current = self
            .editor
            .step(index)
            .map(|s| s.image_reference.clone())
            .unwrap_or_default();
        let root = self.config.images_path();
        let candidates = discover_images(&root, &self.config);
        self.image_dialog.show(index, &current, root, candidates);
    }

    pub fn apply_image(&mut self, result: ImageDialogResult) {
        self.editor.set_image(result.step_index, &result.path);
        tracing::debug!(step = result.step_index + 1, image = %result.path, "Image attached");
        self.status = Some(Status::info(format!(
            "Step {}: image set to {}",
            result.step_index + 1,
            result.path
        )));
    }

    fn clear_image(&mut self) {
        if let Some(index) = self.view.focused_step() {
            self.editor.clear_image(index);
            self.status = Some(Status::info(format!("Step {}: image removed", index + 1)));
        }
    }

    fn report(&mut self, err: &SopError) {
        if !err.is_validation() {
            tracing::warn!(error = %err, "Action failed");
        }
        let text = match err {
            SopError::Validation { step } => {
                format!("Each step must have a title (step {step} is empty)")
            }
            other => other.to_string(),
        };
        self.status = Some(Status::error(text));
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Steps
                Constraint::Length(1), // Status
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.view.render(frame, chunks[1], &self.editor);
        self.render_status(frame, chunks[2]);
        render_footer(frame, chunks[3]);

        self.help_dialog.render(frame);
        self.save_dialog.render(frame);
        self.load_dialog.render(frame);
        self.image_dialog.render(frame);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let name = self.editor.document_name().unwrap_or("(unsaved)");
        let noun = if self.editor.len() == 1 { "step" } else { "steps" };
        let header = Line::from(vec![
            Span::styled(
                " SOP Maker ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {} {}", self.editor.len(), noun),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(status) = &self.status else {
            return;
        };
        let color = match status.kind {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", status.text),
                Style::default().fg(color),
            )),
            area,
        );
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (key, label) in footer_entries() {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sop::Step;
    use crate::ui::StepField;
    use tempfile::TempDir;

    fn test_app(temp_dir: &TempDir) -> App {
        let mut config = Config::default();
        config.paths.documents = temp_dir.path().join("sops").to_string_lossy().to_string();
        config.paths.images = temp_dir.path().to_string_lossy().to_string();
        let store = DocumentStore::from_config(&config);
        App::with_store(config, store)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c).into());
        }
    }

    #[test]
    fn test_add_step_and_type_title() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(2).into());
        type_str(&mut app, "Wear gloves");
        app.handle_key(KeyCode::Tab.into());
        type_str(&mut app, "Nitrile");

        assert_eq!(app.editor().len(), 1);
        assert_eq!(
            app.editor().steps()[0],
            Step::new("Wear gloves").with_summary("Nitrile")
        );
    }

    #[test]
    fn test_save_through_dialog_writes_document() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(2).into());
        type_str(&mut app, "Check pressure");
        app.handle_key(KeyCode::F(3).into());
        type_str(&mut app, "boiler");
        app.handle_key(KeyCode::Enter.into());

        assert_eq!(app.status().unwrap().kind, StatusKind::Info);
        assert_eq!(app.editor().document_name(), Some("boiler"));
        let stored = DocumentStore::new(temp_dir.path().join("sops"))
            .load("boiler")
            .unwrap();
        assert_eq!(stored, vec![Step::new("Check pressure")]);
    }

    #[test]
    fn test_save_with_untitled_step_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(2).into());
        type_str(&mut app, "First");
        app.handle_key(KeyCode::F(2).into());
        app.save_as("partial");

        let status = app.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("step 2"));
        assert_eq!(app.editor().len(), 2);
        assert_eq!(app.editor().document_name(), None);
        assert!(!temp_dir.path().join("sops").join("partial.json").exists());
    }

    #[test]
    fn test_load_replaces_session_steps() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        DocumentStore::new(temp_dir.path().join("sops"))
            .save("stored", &[Step::new("One"), Step::new("Two")])
            .unwrap();

        for _ in 0..3 {
            app.handle_key(KeyCode::F(2).into());
        }
        app.handle_key(KeyCode::F(4).into());
        app.handle_key(KeyCode::Enter.into());

        assert_eq!(app.editor().len(), 2);
        assert_eq!(app.editor().steps()[1].title, "Two");
        assert_eq!(app.editor().document_name(), Some("stored"));
        assert_eq!(app.view.focus(), Some((0, StepField::Title)));
    }

    #[test]
    fn test_failed_load_keeps_session() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(2).into());
        type_str(&mut app, "Mine");
        app.load("missing");

        assert_eq!(app.status().unwrap().kind, StatusKind::Error);
        assert!(app.status().unwrap().text.contains("not found"));
        assert_eq!(app.editor().steps(), &[Step::new("Mine")]);
    }

    #[test]
    fn test_image_pick_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("gauge.png"), b"").unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(2).into());
        app.handle_key(KeyCode::F(5).into());
        app.handle_key(KeyCode::Enter.into());

        let expected = temp_dir.path().join("gauge.png");
        assert_eq!(
            app.editor().steps()[0].image_reference,
            expected.to_string_lossy()
        );

        app.handle_key(KeyCode::F(6).into());
        assert!(!app.editor().steps()[0].has_image());
    }

    #[test]
    fn test_image_without_steps_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(5).into());
        assert!(!app.image_dialog.visible);
        assert_eq!(app.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_function_keys_ignored_while_dialog_open() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(3).into());
        app.handle_key(KeyCode::F(10).into());
        assert!(!app.should_quit());
        app.handle_key(KeyCode::Esc.into());
        app.handle_key(KeyCode::F(10).into());
        assert!(app.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits_without_typing() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(2).into());
        type_str(&mut app, "Vent");
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(app.editor().steps()[0].title, "Vent");
        assert!(!app.should_quit());

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        assert_eq!(app.editor().steps()[0].title, "Vent");
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handle_key(KeyCode::F(1).into());
        assert!(app.help_dialog.visible);
        app.handle_key(KeyCode::Char('x').into());
        assert!(!app.help_dialog.visible);
        assert!(app.editor().is_empty());
    }
}
