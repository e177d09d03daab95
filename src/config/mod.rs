//! Configuration model for dictgen.
//!
//! An optional YAML file (passed with `--config`) tunes how the generator is
//! invoked and how long a process waits for a peer's lock. Unknown fields are
//! ignored for forward compatibility and every field has a default, so running
//! without a config file reproduces the classic behavior.

mod model;
mod operations;


pub use model::Config;
