//! Config loading, validation, and duration accessors.

use super::model::Config;
use crate::error::{DictgenError, Result};
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DictgenError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| DictgenError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// - `poll_interval_ms` must be positive
    /// - `lock_stale_minutes` must be positive
    /// - `tool_flags` entries must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(DictgenError::UserError(
                "config validation failed: poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.lock_stale_minutes == 0 {
            return Err(DictgenError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.tool_flags.iter().any(|flag| flag.trim().is_empty()) {
            return Err(DictgenError::UserError(
                "config validation failed: tool_flags entries must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Bound on waiting for a peer's lock; `None` means wait forever.
    pub fn wait_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.wait_timeout_secs)
    }

    /// Bound on the tool's runtime; `None` means no timeout.
    pub fn tool_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.tool_timeout_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
