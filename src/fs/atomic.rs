//! Atomic filesystem operations for dictgen.
//!
//! All atomic writes follow this pattern:
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename it over the destination
//!
//! `rename` is atomic on POSIX when source and destination share a
//! filesystem, and replaces an existing destination on Windows as well.
//! The temporary file is named `.{filename}.{pid}.tmp` so concurrent writers
//! from different processes never share a temp path.

use crate::error::{DictgenError, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DictgenError::IoError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;
    atomic_replace(&temp_path, path)
}

/// Copy `source` to `destination` byte for byte, publishing it atomically.
pub fn copy_atomic<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let content = fs::read(source).map_err(|e| {
        DictgenError::IoError(format!(
            "failed to copy '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))
    })?;

    atomic_write(destination, &content)
}

fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new(""));
    let filename = target.file_name().ok_or_else(|| {
        DictgenError::IoError(format!("invalid file path '{}'", target.display()))
    })?;

    let mut temp_name = OsString::from(".");
    temp_name.push(filename);
    temp_name.push(format!(".{}.tmp", std::process::id()));
    Ok(parent.join(temp_name))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        DictgenError::IoError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let written = file.write_all(content).and_then(|_| file.sync_all());
    if let Err(e) = written {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(DictgenError::IoError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        DictgenError::IoError(format!(
            "failed to atomically replace '{}': {}",
            target.display(),
            e
        ))
    })?;

    sync_parent_dir(target);
    Ok(())
}

/// Persist the directory entry of a freshly renamed file.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) {}
