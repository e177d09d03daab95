//! Building the generator command line.

use crate::error::{DictgenError, Result};
use std::ffi::OsString;
use std::path::Path;

/// A fully resolved generator command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to the program, in order.
    pub args: Vec<OsString>,
}

impl ToolInvocation {
    /// Build the invocation `<tool> -f <target> <flags...> <inputs...>`.
    ///
    /// `tool` is split with shell-words rules, so it may carry its own leading
    /// arguments (`"env ROOTSYS=/opt/root rootcint"`).
    pub fn new(
        tool: &str,
        target: &Path,
        flags: &[String],
        inputs: &[OsString],
    ) -> Result<Self> {
        let words = shell_words::split(tool).map_err(|e| {
            DictgenError::UserError(format!(
                "failed to parse tool command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                tool, e
            ))
        })?;

        let mut words = words.into_iter();
        let program = words.next().ok_or_else(|| {
            DictgenError::UserError(format!("tool command is empty after parsing: '{}'", tool))
        })?;

        let mut args: Vec<OsString> = words.map(OsString::from).collect();
        args.push(OsString::from("-f"));
        args.push(target.as_os_str().to_os_string());
        args.extend(flags.iter().map(OsString::from));
        args.extend(inputs.iter().cloned());

        Ok(Self { program, args })
    }

    /// Shell-quoted rendering of the command line, for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.clone());
        words.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        shell_words::join(words)
    }
}
