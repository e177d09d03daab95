//! Exit code constants for the dictgen CLI.
//!
//! - 0: Success (also: usage too short, tool failure outside strict mode)
//! - 1: User error (bad arguments, invalid config)
//! - 2: Tool failure (strict mode, or the tool could not be started)
//! - 3: Filesystem failure (copy, lock creation/removal)
//! - 4: Lock wait timed out

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// The generator tool failed and failure propagation is enabled, or it could not be spawned.
pub const TOOL_FAILURE: i32 = 2;

/// Filesystem failure while copying the completed marker or handling the lock marker.
pub const IO_FAILURE: i32 = 3;

/// Gave up waiting for another process to release the lock.
pub const LOCK_FAILURE: i32 = 4;
