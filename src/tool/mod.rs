//! External dictionary generator invocation.
//!
//! The generator (historically `rootcint`) is called as
//! `<tool> -f <target> <flags...> <inputs...>` with flags defaulting to
//! `-c -p`. Its output is captured so it can be replayed on failure.

mod executor;
mod invocation;

pub use executor::{ToolOutcome, run_tool};
pub use invocation::ToolInvocation;
