//! Lock markers guarding dictionary generation.
//!
//! A target `foo/Dict.cxx` is locked by the sibling file `foo/Dict.cxx.lock`.
//! Existence of the marker means "locked"; nothing else is consulted, so a
//! zero-byte marker left behind by an older helper still counts.
//!
//! # Acquisition
//!
//! Markers are created with **create_new** semantics (exclusive create), so
//! two build jobs racing for the same target can never both win.
//!
//! # Marker Payload
//!
//! The acquiring process writes JSON metadata into the marker:
//! - `owner`: `user@HOST`
//! - `pid`: the process ID
//! - `created_at`: RFC3339 timestamp
//! - `action`: what the holder is doing (`generate`)
//!
//! The payload only feeds diagnostics for waiting processes.
//!
//! # RAII Guards
//!
//! An acquired lock is represented by a [`LockGuard`] that deletes the marker
//! when dropped. If deletion fails during drop, a warning is logged.

mod guard;
mod metadata;
mod operations;
mod wait;

#[cfg(test)]
mod tests;

pub use guard::LockGuard;
pub use metadata::LockMetadata;
pub use operations::{LOCK_SUFFIX, is_locked, lock_path, read_holder, release, try_acquire};
pub use wait::{WaitOptions, wait_for_unlock};
