//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};

/// Configuration for a dictgen invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Tool settings
    // =========================================================================
    /// Flags placed between `-f <target>` and the input files.
    #[serde(default = "default_tool_flags")]
    pub tool_flags: Vec<String>,

    /// Seconds after which the tool is killed (0 disables the timeout).
    #[serde(default)]
    pub tool_timeout_secs: u64,

    /// Whether a failing tool makes dictgen itself exit non-zero.
    #[serde(default)]
    pub propagate_tool_failure: bool,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Interval between lock checks while waiting for a peer.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Seconds to wait for a peer's lock before giving up (0 waits forever).
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Minutes after which a lock being waited on is reported as possibly orphaned.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_flags: default_tool_flags(),
            tool_timeout_secs: 0,
            propagate_tool_failure: false,
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_secs: default_wait_timeout_secs(),
            lock_stale_minutes: default_lock_stale_minutes(),
        }
    }
}

fn default_tool_flags() -> Vec<String> {
    vec!["-c".to_string(), "-p".to_string()]
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_wait_timeout_secs() -> u64 {
    30 * 60
}

fn default_lock_stale_minutes() -> u32 {
    60
}
