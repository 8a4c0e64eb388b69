use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by document save and load.
///
/// None of these are fatal; the editing session is left as it was.
#[derive(Error, Debug)]
pub enum SopError {
    #[error("step {step}: title required")]
    Validation { step: usize },

    #[error("invalid document name '{0}'")]
    InvalidName(String),

    #[error("document '{0}' not found")]
    NotFound(String),

    #[error("document '{name}' is not a valid SOP: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Steps could not be turned into JSON. Nothing was written.
    #[error("could not encode document '{name}': {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SopError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SopError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SopError::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SopError::NotFound(_))
    }
}
