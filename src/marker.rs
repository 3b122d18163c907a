//! Persisted build marker used for change detection.
//!
//! The marker is a single file, `.last_build_sha`, inside each repository's
//! clone directory. It holds the short hash of the last commit that built
//! successfully for every platform. A missing file means no prior build.

use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the marker inside the clone directory.
pub const MARKER_FILE: &str = ".last_build_sha";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMarker {
    path: PathBuf,
}

impl BuildMarker {
    pub fn new(repo_dir: &Path) -> Self {
        Self {
            path: repo_dir.join(MARKER_FILE),
        }
    }

    /// Last built short hash, or an empty string when there is none.
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// True when `current` is non-empty and equals the recorded hash.
    pub fn is_unchanged(&self, current: &str) -> Result<bool> {
        Ok(!current.is_empty() && self.read()? == current)
    }

    /// Records `sha` as the last successful build, without a trailing newline.
    pub fn write(&self, sha: &str) -> Result<()> {
        fs::write(&self.path, sha)?;
        Ok(())
    }
}
