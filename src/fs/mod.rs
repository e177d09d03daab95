//! Filesystem utilities for dictgen.
//!
//! The completed marker is a downstream signal, so it is published with an
//! atomic write: readers see either no marker or the full copy.

pub mod atomic;

pub use atomic::copy_atomic;
