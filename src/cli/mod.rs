//! CLI argument parsing for dictgen.
//!
//! Uses clap derive macros. TOOL, DICT_FILE and the inputs arrive as a single
//! optional list: a short command line falls back to printing usage and
//! exiting cleanly, and no option is recognised once TOOL has been seen.

use crate::error::{DictgenError, Result};
use crate::generate::GenerateRequest;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Generate a dictionary with an external tool, guarded by a lock file so
/// parallel build jobs targeting the same output run the tool only once.
///
/// Everything after DICT_FILE is passed to the tool as input, including
/// arguments that start with `-`, so options must come first.
#[derive(Parser, Debug)]
#[command(name = "dictgen")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "dictgen [OPTIONS] <TOOL> <DICT_FILE> <INPUT_FILES>...")]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Exit with a failure code when the generator fails.
    #[arg(long)]
    pub strict: bool,

    /// Seconds to wait for another job's lock before giving up (0 waits forever).
    #[arg(long, value_name = "SECS")]
    pub wait_timeout: Option<u64>,

    /// Interval between lock checks while waiting.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Seconds after which the generator is killed (0 disables).
    #[arg(long, value_name = "SECS")]
    pub tool_timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// TOOL, then DICT_FILE, then the generator's input files.
    ///
    /// Collected as one list so option parsing stops at TOOL.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub positionals: Vec<OsString>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The generation request, or `None` when fewer than three positionals were given.
    pub fn request(&self) -> Result<Option<GenerateRequest>> {
        let [tool, dict_file, inputs @ ..] = self.positionals.as_slice() else {
            return Ok(None);
        };
        if inputs.is_empty() {
            return Ok(None);
        }

        let tool = tool.to_str().ok_or_else(|| {
            DictgenError::UserError(format!(
                "tool command '{}' is not valid UTF-8",
                tool.to_string_lossy()
            ))
        })?;

        Ok(Some(GenerateRequest {
            tool: tool.to_string(),
            target: PathBuf::from(dict_file),
            inputs: inputs.to_vec(),
        }))
    }

    /// Usage line printed for a short command line.
    pub fn usage() -> String {
        Cli::command().render_usage().to_string()
    }
}
