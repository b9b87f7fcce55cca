//! Checked-out project working tree

use std::path::{Path, PathBuf};

/// A project checked out for a goal invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    base_dir: PathBuf,
}

impl Project {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root of the working tree
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a project-relative path
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(rel)
    }

    /// Check if a regular file exists at a project-relative path
    pub fn has_file(&self, rel: impl AsRef<Path>) -> bool {
        self.path(rel).is_file()
    }

    /// Check if a directory exists at a project-relative path
    pub fn has_directory(&self, rel: impl AsRef<Path>) -> bool {
        self.path(rel).is_dir()
    }
}
