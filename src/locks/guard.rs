//! RAII lock guard implementation.

use super::operations::{lock_path, release};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// RAII guard for a lock marker.
///
/// When dropped, the marker is deleted. If deletion fails, a warning is
/// logged but no panic occurs.
#[derive(Debug)]
pub struct LockGuard {
    /// The locked target.
    target: PathBuf,

    /// Path to the lock marker.
    path: PathBuf,

    /// Whether the lock has been released manually.
    released: bool,
}

impl LockGuard {
    pub(super) fn new(target: &Path) -> Self {
        Self {
            target: target.to_path_buf(),
            path: lock_path(target),
            released: false,
        }
    }

    /// Get the path to the lock marker.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock, reporting a failure to delete the marker.
    ///
    /// A marker that is already gone counts as released.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        release(&self.target)
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = release(&self.target)
        {
            tracing::warn!(
                lock = %self.path.display(),
                error = %e,
                "failed to release lock"
            );
        }
    }
}
