//! Tests for the locks subsystem.

use super::*;
use chrono::{Duration as ChronoDuration, Utc};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

fn target_in(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("G__Dict.cxx")
}

fn quick_wait(timeout_ms: Option<u64>) -> WaitOptions {
    WaitOptions {
        poll_interval: Duration::from_millis(20),
        timeout: timeout_ms.map(Duration::from_millis),
        stale_minutes: 60,
    }
}

#[test]
fn test_lock_path_appends_suffix() {
    let target = PathBuf::from("/build/dict/G__Dict.cxx");
    assert_eq!(
        lock_path(&target),
        PathBuf::from("/build/dict/G__Dict.cxx.lock")
    );
}

#[test]
fn test_lock_path_without_extension() {
    assert_eq!(lock_path(Path::new("Dict")), PathBuf::from("Dict.lock"));
}

#[test]
fn test_lock_metadata_creation() {
    let meta = LockMetadata::new("generate");

    assert!(meta.owner.contains('@'));
    assert_eq!(meta.pid, Some(std::process::id()));
    assert_eq!(meta.action, "generate");
    assert!(meta.age().num_minutes() < 1);
}

#[test]
fn test_lock_metadata_serialization() {
    let meta = LockMetadata::new("generate");
    let json = meta.to_json().unwrap();

    assert!(json.contains("owner"));
    assert!(json.contains("created_at"));

    let parsed: LockMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.action, "generate");
    assert_eq!(parsed.pid, meta.pid);
}

#[test]
fn test_describe_formats_age() {
    let mut meta = LockMetadata::new("generate");
    assert!(meta.describe().contains(" for 0m,"));

    meta.created_at = Utc::now() - ChronoDuration::minutes(125);
    assert!(meta.describe().contains(" for 2h05m,"));

    meta.created_at = Utc::now() - ChronoDuration::hours(75);
    assert!(meta.describe().contains(" for 3d03h,"));
}

#[test]
fn test_lock_metadata_is_orphaned() {
    let mut meta = LockMetadata::new("generate");
    assert!(!meta.is_orphaned(60));

    meta.created_at = Utc::now() - ChronoDuration::minutes(90);
    assert!(meta.is_orphaned(60));
}

#[test]
fn test_metadata_without_pid_parses() {
    let json = r#"{"owner":"builder@node7","created_at":"2024-01-01T00:00:00Z","action":"generate"}"#;
    let meta: LockMetadata = serde_json::from_str(json).unwrap();

    assert_eq!(meta.pid, None);
    assert!(meta.describe().starts_with("held by builder@node7 for "));
}

#[test]
fn test_describe_mentions_owner_and_pid() {
    let meta = LockMetadata::new("generate");
    let text = meta.describe();
    assert!(text.contains(&meta.owner));
    assert!(text.contains(&std::process::id().to_string()));
}

#[test]
fn test_acquire_unlocked_target() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    let guard = try_acquire(&target, "generate").unwrap();

    assert!(guard.is_some());
    assert!(lock_path(&target).exists());
    assert!(is_locked(&target));

    let holder = read_holder(&target).unwrap();
    assert_eq!(holder.action, "generate");
}

#[test]
fn test_acquire_locked_target_leaves_marker_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    std::fs::write(lock_path(&target), "someone else").unwrap();

    let guard = try_acquire(&target, "generate").unwrap();

    assert!(guard.is_none());
    assert_eq!(
        std::fs::read_to_string(lock_path(&target)).unwrap(),
        "someone else"
    );
}

#[test]
fn test_second_acquire_fails_while_first_held() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    let first = try_acquire(&target, "generate").unwrap();
    let second = try_acquire(&target, "generate").unwrap();

    assert!(first.is_some());
    assert!(second.is_none());

    drop(first);
    assert!(try_acquire(&target, "generate").unwrap().is_some());
}

#[test]
fn test_acquire_creates_missing_parent_dir() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("dict").join("Dict.cxx");

    let guard = try_acquire(&target, "generate").unwrap();

    assert!(guard.is_some());
    assert!(is_locked(&target));
}

#[test]
fn test_concurrent_acquire_has_single_winner() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let target = target.clone();
            std::thread::spawn(move || {
                // Keep the guard alive until every thread has tried.
                let guard = try_acquire(&target, "generate").unwrap();
                std::thread::sleep(Duration::from_millis(100));
                guard.is_some()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn test_guard_drop_releases_lock() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    {
        let _guard = try_acquire(&target, "generate").unwrap().unwrap();
        assert!(is_locked(&target));
    }

    assert!(!is_locked(&target));
}

#[test]
fn test_guard_explicit_release() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    let guard = try_acquire(&target, "generate").unwrap().unwrap();
    assert_eq!(guard.path(), lock_path(&target).as_path());
    guard.release().unwrap();

    assert!(!is_locked(&target));
}

#[test]
fn test_guard_release_tolerates_missing_marker() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    let guard = try_acquire(&target, "generate").unwrap().unwrap();
    std::fs::remove_file(lock_path(&target)).unwrap();

    assert!(guard.release().is_ok());
}

#[test]
fn test_release_removes_existing_marker() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    std::fs::write(lock_path(&target), "").unwrap();

    release(&target).unwrap();

    assert!(!is_locked(&target));
}

#[test]
fn test_release_without_marker_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    assert!(release(&target).is_ok());
    assert!(!is_locked(&target));
}

#[test]
fn test_read_holder_ignores_legacy_empty_marker() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    std::fs::write(lock_path(&target), "").unwrap();

    assert!(is_locked(&target));
    assert!(read_holder(&target).is_none());
}

#[test]
fn test_wait_returns_immediately_when_unlocked() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);

    let waited = wait_for_unlock(&target, &quick_wait(Some(1000))).unwrap();
    assert!(waited < Duration::from_millis(500));
}

#[test]
fn test_wait_returns_after_peer_releases() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    std::fs::write(lock_path(&target), "").unwrap();

    let releaser = {
        let target = target.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(150));
            release(&target).unwrap();
        })
    };

    let waited = wait_for_unlock(&target, &quick_wait(None)).unwrap();
    releaser.join().unwrap();

    assert!(waited >= Duration::from_millis(100));
    assert!(!is_locked(&target));
}

#[test]
fn test_wait_times_out_on_orphaned_lock() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    let _held = try_acquire(&target, "generate").unwrap().unwrap();

    let err = wait_for_unlock(&target, &quick_wait(Some(100))).unwrap_err();

    assert_eq!(err.exit_code(), crate::exit_codes::LOCK_FAILURE);
    let message = err.to_string();
    assert!(message.contains("still locked"));
    assert!(message.contains("held by"));
    // The marker belongs to its holder and must survive the timeout.
    assert!(is_locked(&target));
}

/// Collects everything a `fmt` subscriber writes.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[test]
fn test_wait_reports_orphaned_lock_once_and_keeps_it() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    let mut holder = LockMetadata::new("generate");
    holder.created_at = Utc::now() - ChronoDuration::minutes(120);
    std::fs::write(lock_path(&target), holder.to_json().unwrap()).unwrap();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        wait_for_unlock(&target, &quick_wait(Some(300)))
    });

    assert_eq!(
        result.unwrap_err().exit_code(),
        crate::exit_codes::LOCK_FAILURE
    );
    let text = logs.text();
    assert_eq!(text.matches("lock looks orphaned").count(), 1, "logs: {}", text);
    assert!(text.contains("2h00m"));
    assert!(is_locked(&target));
}

#[test]
fn test_wait_fresh_lock_is_not_reported_orphaned() {
    let temp_dir = TempDir::new().unwrap();
    let target = target_in(&temp_dir);
    let _held = try_acquire(&target, "generate").unwrap().unwrap();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .finish();

    let _ = tracing::subscriber::with_default(subscriber, || {
        wait_for_unlock(&target, &quick_wait(Some(100)))
    });

    assert!(!logs.text().contains("lock looks orphaned"));
}

#[test]
fn test_wait_options_from_config() {
    let config = crate::config::Config {
        poll_interval_ms: 250,
        wait_timeout_secs: 0,
        lock_stale_minutes: 5,
        ..Default::default()
    };

    let options = WaitOptions::from_config(&config);

    assert_eq!(options.poll_interval, Duration::from_millis(250));
    assert_eq!(options.timeout, None);
    assert_eq!(options.stale_minutes, 5);
}
