//! Scoped ownership of transient per-file artifacts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A file that must not outlive one pipeline run.
///
/// Dropping the guard removes the file. Removal is best-effort: a missing
/// file or a failed delete is logged at debug level and otherwise ignored, so
/// cleanup can never change the outcome of the run that owned it.
#[derive(Debug)]
pub struct TransientArtifact {
    path: PathBuf,
}

impl TransientArtifact {
    /// Take ownership of `path`, removing whatever a previous run left there.
    /// The file does not need to exist.
    pub fn acquire(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        discard(&path);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientArtifact {
    fn drop(&mut self) {
        discard(&self.path);
    }
}

/// Delete `path`, ignoring every failure. Returns whether a file was removed.
pub fn discard(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            tracing::debug!("Could not remove {}: {e}", path.display());
            false
        }
    }
}
