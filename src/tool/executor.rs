//! Generator subprocess executor.
//!
//! Runs the tool synchronously with output capture and an optional timeout.
//! Output goes to anonymous temporary files rather than pipes, so a chatty
//! tool can never block on a full pipe while we poll for its exit.

use super::invocation::ToolInvocation;
use crate::error::{DictgenError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Result of running the generator.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    /// Exit code of the process (None if killed, terminated by a signal, or never started).
    pub exit_code: Option<i32>,
    /// Whether the process could not be started at all.
    pub spawn_failed: bool,
    /// Whether the process was killed due to timeout.
    pub timed_out: bool,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        !self.spawn_failed && !self.timed_out && self.exit_code == Some(0)
    }

    /// Short human-readable description of how the tool ended.
    pub fn status_description(&self) -> String {
        if self.spawn_failed {
            "could not be started".to_string()
        } else if self.timed_out {
            format!("killed after {:.1}s timeout", self.duration.as_secs_f64())
        } else {
            match self.exit_code {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            }
        }
    }
}

/// Run the generator and wait for it, killing it if `timeout` elapses.
///
/// A non-zero exit and a program that cannot be started are both reported
/// through the returned outcome; the latter carries the launch error as its
/// stderr. Only a failure to capture output or supervise the process is an
/// error.
pub fn run_tool(invocation: &ToolInvocation, timeout: Option<Duration>) -> Result<ToolOutcome> {
    let stdout_file = capture_file("stdout")?;
    let stderr_file = capture_file("stderr")?;

    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(clone_handle(&stdout_file)?))
        .stderr(Stdio::from(clone_handle(&stderr_file)?));

    tracing::info!(command = %invocation.command_line(), "running generator");

    let start = Instant::now();
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(
                program = %invocation.program,
                error = %e,
                "generator could not be started"
            );
            return Ok(ToolOutcome {
                exit_code: None,
                spawn_failed: true,
                timed_out: false,
                stdout: Vec::new(),
                stderr: format!(
                    "failed to execute '{}': {}\n\
                     Fix: ensure the generator is installed and in PATH.\n",
                    invocation.program, e
                )
                .into_bytes(),
                duration: start.elapsed(),
            });
        }
    };

    let (exit_code, timed_out) = match timeout {
        Some(timeout) => wait_with_timeout(&mut child, timeout)?,
        None => {
            let status = child.wait().map_err(|e| {
                DictgenError::ToolError(format!("failed to wait for generator: {}", e))
            })?;
            (status.code(), false)
        }
    };
    let duration = start.elapsed();

    let outcome = ToolOutcome {
        exit_code,
        spawn_failed: false,
        timed_out,
        stdout: read_back(stdout_file)?,
        stderr: read_back(stderr_file)?,
        duration,
    };

    tracing::info!(
        status = %outcome.status_description(),
        elapsed_ms = duration.as_millis() as u64,
        stdout_bytes = outcome.stdout.len(),
        stderr_bytes = outcome.stderr.len(),
        "generator finished"
    );

    Ok(outcome)
}

fn capture_file(stream: &str) -> Result<File> {
    tempfile::tempfile().map_err(|e| {
        DictgenError::IoError(format!("failed to create {} capture file: {}", stream, e))
    })
}

fn clone_handle(file: &File) -> Result<File> {
    file.try_clone()
        .map_err(|e| DictgenError::IoError(format!("failed to duplicate capture file: {}", e)))
}

fn read_back(mut file: File) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut buf))
        .map_err(|e| DictgenError::IoError(format!("failed to read captured output: {}", e)))?;
    Ok(buf)
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    tracing::warn!(
                        timeout_secs = timeout.as_secs_f64(),
                        "generator timed out; killing it"
                    );
                    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(DictgenError::ToolError(format!(
                    "failed to check generator status: {}",
                    e
                )));
            }
        }
    }
}
