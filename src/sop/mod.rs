//! Standard Operating Procedure documents: the step model, the editing
//! session that holds steps in authoring order, and the on-disk store.

pub mod editor;
mod error;
pub mod store;

pub use editor::StepEditor;
pub use error::SopError;
pub use store::DocumentStore;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One titled, described, optionally illustrated unit of a procedure.
///
/// Every field defaults to an empty string when absent from a stored
/// document, so older or hand-edited files load without special casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Path of an external image. Empty means no image is attached.
    #[serde(default, rename = "image")]
    pub image_reference: String,
}

impl Step {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image_reference = image.into();
        self
    }

    /// A step may only be persisted once its title is non-empty. Titles are
    /// taken as typed, so whitespace counts.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn has_image(&self) -> bool {
        !self.image_reference.is_empty()
    }

    /// File name of the referenced image, for compact display.
    pub fn image_file_name(&self) -> Option<String> {
        if !self.has_image() {
            return None;
        }
        let name = Path::new(&self.image_reference)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.image_reference.clone());
        Some(name)
    }
}

/// A named, ordered set of steps as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Document {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// 1-based number of the first step without a title, if any
    pub fn first_untitled_step(&self) -> Option<usize> {
        first_untitled_step(&self.steps)
    }
}

pub(crate) fn first_untitled_step(steps: &[Step]) -> Option<usize> {
    steps.iter().position(|s| !s.has_title()).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_missing_fields_default_to_empty() {
        let step: Step = serde_json::from_str(r#"{"title": "Unlock door"}"#).unwrap();
        assert_eq!(step.title, "Unlock door");
        assert_eq!(step.summary, "");
        assert_eq!(step.image_reference, "");
        assert!(!step.has_image());
    }

    #[test]
    fn test_step_image_serializes_under_image_key() {
        let step = Step::new("Inspect").with_image("/tmp/valve.png");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["image"], "/tmp/valve.png");
        assert!(json.get("image_reference").is_none());
    }

    #[test]
    fn test_only_empty_title_is_missing() {
        assert!(Step::new("   ").has_title());
        assert!(!Step::default().has_title());
        assert!(Step::new(" Calibrate ").has_title());
    }

    #[test]
    fn test_image_file_name() {
        let step = Step::new("Photo").with_image("shots/panel-a.jpg");
        assert_eq!(step.image_file_name().as_deref(), Some("panel-a.jpg"));
        assert_eq!(Step::new("No photo").image_file_name(), None);
    }

    #[test]
    fn test_first_untitled_step_is_one_based() {
        let doc = Document::new(
            "startup",
            vec![Step::new("Power on"), Step::default(), Step::new("Log in")],
        );
        assert_eq!(doc.first_untitled_step(), Some(2));

        let ok = Document::new("ok", vec![Step::new("Only")]);
        assert_eq!(ok.first_untitled_step(), None);
    }
}
