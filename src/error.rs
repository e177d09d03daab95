//! Error types for dictgen.
//!
//! Uses thiserror for derive macros; every variant maps to one exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for dictgen operations.
#[derive(Error, Debug)]
pub enum DictgenError {
    /// Invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The generator tool failed (strict mode) or could not be started.
    #[error("Tool failed: {0}")]
    ToolError(String),

    /// A filesystem operation failed.
    #[error("{0}")]
    IoError(String),

    /// The lock held by another process was not released in time.
    #[error("Lock wait failed: {0}")]
    LockError(String),
}

impl DictgenError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DictgenError::UserError(_) => exit_codes::USER_ERROR,
            DictgenError::ToolError(_) => exit_codes::TOOL_FAILURE,
            DictgenError::IoError(_) => exit_codes::IO_FAILURE,
            DictgenError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for dictgen operations.
pub type Result<T> = std::result::Result<T, DictgenError>;
