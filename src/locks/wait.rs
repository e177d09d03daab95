//! Waiting for a peer process to release its lock.

use super::operations::{is_locked, lock_path, read_holder};
use crate::config::Config;
use crate::error::{DictgenError, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// How to wait for a lock held by another process.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Interval between existence checks.
    pub poll_interval: Duration,
    /// Give up after this long; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Locks older than this are reported as possibly orphaned.
    pub stale_minutes: u32,
}

impl WaitOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            timeout: config.wait_timeout(),
            stale_minutes: config.lock_stale_minutes,
        }
    }
}

/// Block until the lock marker for `target` disappears.
///
/// Returns how long the wait took. Fails with a `LockError` once
/// `options.timeout` elapses while the marker still exists. A stale marker is
/// reported once but never removed.
pub fn wait_for_unlock(target: &Path, options: &WaitOptions) -> Result<Duration> {
    let start = Instant::now();
    let mut reported_stale = false;

    while is_locked(target) {
        let elapsed = start.elapsed();

        if let Some(timeout) = options.timeout
            && elapsed >= timeout
        {
            return Err(timeout_error(target, timeout));
        }

        if !reported_stale
            && let Some(holder) = read_holder(target)
            && holder.is_orphaned(options.stale_minutes)
        {
            reported_stale = true;
            tracing::warn!(
                lock = %lock_path(target).display(),
                holder = %holder.describe(),
                "lock looks orphaned; remove it if its holder is no longer running"
            );
        }

        let sleep_for = match options.timeout {
            Some(timeout) => options.poll_interval.min(timeout.saturating_sub(elapsed)),
            None => options.poll_interval,
        };
        std::thread::sleep(sleep_for);
    }

    Ok(start.elapsed())
}

fn timeout_error(target: &Path, timeout: Duration) -> DictgenError {
    let holder = read_holder(target)
        .map(|meta| format!("\nLock {}", meta.describe()))
        .unwrap_or_default();

    DictgenError::LockError(format!(
        "'{}' still locked after {:.1}s{}\n\
         Fix: if no other build job is generating this file, delete '{}' and rerun.",
        target.display(),
        timeout.as_secs_f64(),
        holder,
        lock_path(target).display()
    ))
}
