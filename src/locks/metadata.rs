//! Lock metadata written into lock markers.

use crate::error::{DictgenError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Who holds a lock marker, and since when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Owner of the lock (`user@HOST`).
    pub owner: String,

    /// Process ID of the lock holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the lock was created (RFC3339).
    pub created_at: DateTime<Utc>,

    /// What the holder is doing.
    pub action: String,
}

impl LockMetadata {
    /// Create metadata for the current process with the current timestamp.
    pub fn new(action: &str) -> Self {
        Self {
            owner: owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: action.to_string(),
        }
    }

    /// Parse lock metadata from a marker file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DictgenError::IoError(format!(
                "failed to read lock file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            DictgenError::IoError(format!(
                "failed to parse lock file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DictgenError::IoError(format!("failed to serialize lock metadata: {}", e))
        })
    }

    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Whether the marker has outlived any plausible generator run.
    pub fn is_orphaned(&self, stale_minutes: u32) -> bool {
        self.age() > Duration::minutes(i64::from(stale_minutes))
    }

    /// One-line description used in wait diagnostics.
    pub fn describe(&self) -> String {
        let pid = self.pid.map(|pid| format!(" (pid {})", pid)).unwrap_or_default();
        format!(
            "held by {}{} for {}, action: {}",
            self.owner,
            pid,
            format_age(self.age()),
            self.action
        )
    }
}

/// Compact age such as `42m`, `3h05m` or `2d07h`.
fn format_age(age: Duration) -> String {
    let minutes = age.num_minutes().max(0);
    match (minutes / (24 * 60), minutes / 60 % 24, minutes % 60) {
        (0, 0, m) => format!("{}m", m),
        (0, h, m) => format!("{}h{:02}m", h, m),
        (d, h, _) => format!("{}d{:02}h", d, h),
    }
}

/// `user@host` of the current process, the identity a waiting job reports.
fn owner_string() -> String {
    let user = ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string());

    let host = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}@{}", user, host)
}
