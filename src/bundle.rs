//! Destination bundle handles.
//!
//! A bundle is a flat directory owned by one bundling run. Handles are passed
//! into every engine operation explicitly, never held as ambient state, so
//! the engine can be exercised against temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ArtifactorError, Result};

/// Which bundle a role directory routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleTarget {
    Content,
    Test,
}

/// A flat destination directory receiving normalized content files.
#[derive(Debug, Clone)]
pub struct Bundle {
    dir: PathBuf,
}

impl Bundle {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a flattened file will be written to.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Create the bundle directory for a fresh run. Unless `preserve` is set,
    /// contents left over from a previous run are removed first.
    pub fn prepare(&self, preserve: bool) -> Result<()> {
        if !preserve && self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|e| ArtifactorError::BundleCleanFailed {
                path: self.dir.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        fs::create_dir_all(&self.dir).map_err(|e| ArtifactorError::FileWriteFailed {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
