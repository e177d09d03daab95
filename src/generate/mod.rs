//! The lock-guarded generator.
//!
//! Several build jobs may ask for the same dictionary at once. The first to
//! lock the target runs the generator, copies the result to
//! `{target}_completed` and unlocks; everyone else waits for the lock to go
//! away and relies on the winner's completed marker.


use crate::config::Config;
use crate::error::{DictgenError, Result};
use crate::fs::copy_atomic;
use crate::locks::{self, WaitOptions};
use crate::tool::{ToolInvocation, ToolOutcome, run_tool};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Suffix appended to a target path to form its completed marker.
pub const COMPLETED_SUFFIX: &str = "_completed";

/// Action recorded in lock metadata while generating.
const LOCK_ACTION: &str = "generate";

/// Path of the completed marker for `target`.
pub fn completed_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(COMPLETED_SUFFIX);
    PathBuf::from(name)
}

/// What to generate.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Generator command (may include leading arguments).
    pub tool: String,
    /// Dictionary file to produce.
    pub target: PathBuf,
    /// Input files (and pass-through flags) for the generator.
    pub inputs: Vec<OsString>,
}

/// How to generate.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub tool_flags: Vec<String>,
    pub tool_timeout: Option<Duration>,
    pub propagate_tool_failure: bool,
    pub wait: WaitOptions,
}

impl GenerateOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tool_flags: config.tool_flags.clone(),
            tool_timeout: config.tool_timeout(),
            propagate_tool_failure: config.propagate_tool_failure,
            wait: WaitOptions::from_config(config),
        }
    }
}

/// What a `generate` call ended up doing.
#[derive(Debug)]
pub enum GenerateReport {
    /// This process held the lock and ran the generator.
    Generated { outcome: ToolOutcome },
    /// Another process held the lock; this one waited for it.
    Waited { waited: Duration },
}

/// Generate `request.target` unless another process is already doing so.
///
/// When the lock is acquired the generator runs, its captured output is
/// printed to `console` if it fails, and the target is copied to its
/// completed marker whatever the exit status. Tool failure only becomes an
/// error when `propagate_tool_failure` is set, and only after the copy.
pub fn generate(
    request: &GenerateRequest,
    options: &GenerateOptions,
    console: &mut dyn Write,
) -> Result<GenerateReport> {
    let target = request.target.as_path();
    let invocation =
        ToolInvocation::new(&request.tool, target, &options.tool_flags, &request.inputs)?;

    let Some(guard) = locks::try_acquire(target, LOCK_ACTION)? else {
        tracing::warn!("File {} is locked. Waiting for unlock.", target.display());
        let waited = locks::wait_for_unlock(target, &options.wait)?;
        tracing::info!(
            dict = %target.display(),
            waited_ms = waited.as_millis() as u64,
            "lock released by peer"
        );
        return Ok(GenerateReport::Waited { waited });
    };

    let outcome = run_tool(&invocation, options.tool_timeout)?;
    if !outcome.is_success() {
        write_diagnostics(console, &outcome)?;
    }

    let completed = completed_path(target);
    copy_atomic(target, &completed)?;
    tracing::debug!(completed = %completed.display(), "completed marker written");

    guard.release()?;

    if !outcome.is_success() {
        let message = format!(
            "'{}' failed ({}) while generating '{}'",
            invocation.command_line(),
            outcome.status_description(),
            target.display()
        );
        if options.propagate_tool_failure {
            return Err(DictgenError::ToolError(message));
        }
        tracing::warn!("{}", message);
    }

    Ok(GenerateReport::Generated { outcome })
}

/// Replay the generator's captured stderr, then stdout.
fn write_diagnostics(console: &mut dyn Write, outcome: &ToolOutcome) -> Result<()> {
    console
        .write_all(&outcome.stderr)
        .and_then(|_| console.write_all(&outcome.stdout))
        .and_then(|_| console.flush())
        .map_err(|e| DictgenError::IoError(format!("failed to print generator output: {}", e)))
}
