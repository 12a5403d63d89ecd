//! Project layout: root discovery and the version manifest.

use std::fs;
use std::path::{Path, PathBuf};

use toml_edit::DocumentMut;
use tracing::debug;

use crate::error::{MexReleaseError, Result};

/// File name of the version manifest, also the marker of a project root
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Walks up from `start` and returns the first directory holding a
/// `pyproject.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        if dir.join(MANIFEST_FILE).is_file() {
            debug!(root = %dir.display(), "found project root");
            return Ok(dir.to_path_buf());
        }
    }
    Err(MexReleaseError::ProjectRootNotFound(start.to_path_buf()))
}

/// The `pyproject.toml` of a project, kept as an editable document so a
/// version bump leaves comments and formatting untouched.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    doc: DocumentMut,
}

impl Manifest {
    /// Load the manifest of the project at `root`
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_from(root.join(MANIFEST_FILE))
    }

    /// Load a manifest from an explicit file path
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| {
            MexReleaseError::manifest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(path, &content)
    }

    /// Parse manifest content that belongs at `path`
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let doc = content.parse::<DocumentMut>()?;
        Ok(Manifest {
            path: path.into(),
            doc,
        })
    }

    /// Where [save](Manifest::save) writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `project.name`
    pub fn name(&self) -> Result<String> {
        self.project_string("name")
    }

    /// `project.version`, exactly as written
    pub fn version(&self) -> Result<String> {
        self.project_string("version")
    }

    /// Replace `project.version`, keeping the rest of the document as is
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        let project = self
            .doc
            .get_mut("project")
            .and_then(|item| item.as_table_like_mut())
            .ok_or_else(|| MexReleaseError::manifest("Missing [project] table"))?;

        match project.get_mut("version").and_then(|item| item.as_value_mut()) {
            Some(value) => {
                // Keep whatever whitespace/comment decoration surrounds the old value
                let decor = value.decor().clone();
                *value = toml_edit::Value::from(version);
                *value.decor_mut() = decor;
            }
            None => {
                project.insert("version", toml_edit::value(version));
            }
        }
        Ok(())
    }

    /// Write the document back to its file
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.doc.to_string())?;
        debug!(path = %self.path.display(), "manifest written");
        Ok(())
    }

    /// The document as it would be written
    pub fn render(&self) -> String {
        self.doc.to_string()
    }

    fn project_string(&self, key: &str) -> Result<String> {
        let project = self
            .doc
            .get("project")
            .and_then(|item| item.as_table_like())
            .ok_or_else(|| MexReleaseError::manifest("Missing [project] table"))?;

        project
            .get(key)
            .and_then(|item| item.as_str())
            .map(str::to_string)
            .ok_or_else(|| MexReleaseError::manifest(format!("Missing string field project.{key}")))
    }
}
