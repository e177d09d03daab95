//! Lock marker acquisition, inspection, and release.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use crate::error::{DictgenError, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to a target path to form its lock marker.
pub const LOCK_SUFFIX: &str = ".lock";

/// Path of the lock marker for `target`.
///
/// The suffix is appended to the whole path, so `Dict.cxx` maps to
/// `Dict.cxx.lock` rather than replacing the extension.
pub fn lock_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Try to lock `target`.
///
/// Returns `Ok(Some(guard))` if this call created the marker and
/// `Ok(None)` if a marker already existed; an existing marker is never
/// modified. Any other failure to create the marker is an error.
pub fn try_acquire(target: &Path, action: &str) -> Result<Option<LockGuard>> {
    let path = lock_path(target);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DictgenError::IoError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(lock = %path.display(), "lock already held");
            return Ok(None);
        }
        Err(e) => {
            return Err(DictgenError::IoError(format!(
                "failed to create lock '{}': {}",
                path.display(),
                e
            )));
        }
    };

    // The guard owns the marker from here on, so a failed write removes it.
    let guard = LockGuard::new(target);
    let written = write_metadata(&mut file, action);
    drop(file);
    written?;

    tracing::debug!(lock = %guard.path().display(), "lock acquired");
    Ok(Some(guard))
}

fn write_metadata(file: &mut File, action: &str) -> Result<()> {
    let json = LockMetadata::new(action).to_json()?;
    file.write_all(json.as_bytes())
        .map_err(|e| DictgenError::IoError(format!("failed to write lock metadata: {}", e)))?;
    file.sync_all()
        .map_err(|e| DictgenError::IoError(format!("failed to sync lock file: {}", e)))
}

/// Whether a lock marker exists for `target`.
pub fn is_locked(target: &Path) -> bool {
    lock_path(target).exists()
}

/// Delete the lock marker for `target` if present.
///
/// Removing a marker that does not exist is a no-op. [`LockGuard`] releases
/// through this on both explicit release and drop.
pub fn release(target: &Path) -> Result<()> {
    let path = lock_path(target);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DictgenError::IoError(format!(
            "failed to release lock '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Read the holder of `target`'s lock, if the marker exists and carries metadata.
pub fn read_holder(target: &Path) -> Option<LockMetadata> {
    LockMetadata::from_file(lock_path(target)).ok()
}
