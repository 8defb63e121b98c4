//! Known locations ("places") shown as shortcuts next to the listing.
//!
//! Places are stored one path per line in a plain text file so they can be
//! edited by hand or through the web form.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// An ordered list of folder shortcuts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Places {
    entries: Vec<String>,
}

impl Places {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses newline-delimited text, dropping blank lines.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let entries = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect();
        Self { entries }
    }

    /// The editable text form, one place per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = self.entries.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    /// Return a new `Places` with `path` appended unless already present.
    #[must_use]
    pub fn with_place(self, path: impl Into<String>) -> Self {
        let path = path.into();
        let mut entries = self.entries;
        if !entries.contains(&path) {
            entries.push(path);
        }
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads places from `path`. A missing file is an empty list.
    pub fn load(path: &Path) -> CoreResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::from_text(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("places file {} not found, using none", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(CoreError::from_io(path, e)),
        }
    }

    /// Persists places to `path`, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_text()).map_err(|e| CoreError::from_io(path, e))?;
        tracing::info!("saved {} places to {}", self.len(), path.display());
        Ok(())
    }
}
