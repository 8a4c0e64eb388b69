//! JSON persistence for SOP documents.
//!
//! Each document is `<name>.json` in the documents directory: an array of
//! `{"title", "summary", "image"}` objects in authoring order, indented with
//! four spaces. Writes go through a temp file in the same directory and are
//! renamed into place, so a document is either fully replaced or untouched.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use super::{first_untitled_step, SopError, Step};
use crate::config::Config;

const EXTENSION: &str = "json";

pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.documents_path())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a document of this name is stored at.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, SopError> {
        let name = validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Validate every step and write the whole document, replacing any
    /// previous document with the same name.
    pub fn save(&self, name: &str, steps: &[Step]) -> Result<PathBuf, SopError> {
        let path = self.path_for(name)?;

        if let Some(step) = first_untitled_step(steps) {
            tracing::warn!(document = %name.trim(), step, "Save rejected: step has no title");
            return Err(SopError::Validation { step });
        }

        let contents = encode(steps).map_err(|source| SopError::Encode {
            name: name.trim().to_string(),
            source,
        })?;

        fs::create_dir_all(&self.dir).map_err(|e| SopError::io(&self.dir, e))?;

        let mut staged = stage_in(&self.dir, &path).map_err(|e| SopError::io(&self.dir, e))?;
        staged
            .write_all(&contents)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| SopError::io(staged.path(), e))?;
        staged
            .persist(&path)
            .map_err(|e| SopError::io(&path, e.error))?;

        tracing::info!(
            document = %name.trim(),
            steps = steps.len(),
            path = %path.display(),
            "Saved SOP"
        );
        Ok(path)
    }

    /// Read a stored document back in its stored order.
    pub fn load(&self, name: &str) -> Result<Vec<Step>, SopError> {
        let path = self.path_for(name)?;
        let name = name.trim();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SopError::NotFound(name.to_string()));
            }
            Err(e) => return Err(SopError::io(&path, e)),
        };

        let steps: Vec<Step> =
            serde_json::from_str(&contents).map_err(|source| SopError::Parse {
                name: name.to_string(),
                source,
            })?;

        tracing::info!(document = %name, steps = steps.len(), "Loaded SOP");
        Ok(steps)
    }

    /// Names of all stored documents, sorted.
    pub fn list(&self) -> Result<Vec<String>, SopError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SopError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SopError::io(&self.dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                // Names that trim to something else would load a different file
                if validate_name(stem).is_ok_and(|n| n == stem) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();

        tracing::debug!(dir = %self.dir.display(), count = names.len(), "Listed SOPs");
        Ok(names)
    }
}

/// Trim a user-supplied document name and reject anything that is empty or
/// would escape the documents directory.
pub fn validate_name(name: &str) -> Result<&str, SopError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.contains('/')
        || trimmed.contains('\\')
    {
        return Err(SopError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Temp file next to the target. New documents get 0666 minus the umask,
/// replaced documents keep their current permissions.
fn stage_in(dir: &Path, target: &Path) -> std::io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let staged = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(target) {
        staged.as_file().set_permissions(existing.permissions())?;
    }
    Ok(staged)
}

fn encode(steps: &[Step]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    steps.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
