//! The editing session: an ordered, freely mutable list of steps.
//!
//! Nothing is validated here. Titles are only checked when the session is
//! handed to [`DocumentStore::save`](super::DocumentStore::save).

use super::Step;

#[derive(Debug, Clone, Default)]
pub struct StepEditor {
    steps: Vec<Step>,
    /// Name the session was last saved under or loaded from
    document_name: Option<String>,
}

impl StepEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank step and return its index.
    pub fn add_step(&mut self) -> usize {
        self.steps.push(Step::default());
        self.steps.len() - 1
    }

    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }

    /// Drop every current step and take `steps` in their given order.
    pub fn replace_steps(&mut self, steps: Vec<Step>) {
        self.clear_steps();
        self.steps.extend(steps);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn set_title(&mut self, index: usize, title: &str) {
        if let Some(step) = self.steps.get_mut(index) {
            step.title = title.to_string();
        }
    }

    pub fn set_summary(&mut self, index: usize, summary: &str) {
        if let Some(step) = self.steps.get_mut(index) {
            step.summary = summary.to_string();
        }
    }

    pub fn set_image(&mut self, index: usize, image: &str) {
        if let Some(step) = self.steps.get_mut(index) {
            step.image_reference = image.to_string();
        }
    }

    pub fn clear_image(&mut self, index: usize) {
        self.set_image(index, "");
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document_name.as_deref()
    }

    pub fn set_document_name(&mut self, name: impl Into<String>) {
        self.document_name = Some(name.into());
    }
}
