//! Durable rotation cursor.
//!
//! The cursor is a small JSON record `{"current_joke_id": N}` living next to
//! the database. Every access holds one process-wide mutex, and every failure
//! to read it degrades to the default value of 1.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value used whenever the record is missing or invalid.
pub const DEFAULT_CURSOR: i64 = 1;

/// On-disk shape of the cursor record.
#[derive(Debug, Serialize, Deserialize)]
struct CursorRecord {
    current_joke_id: i64,
}

/// Reasons a persisted cursor could not be used.
#[derive(Error, Debug)]
pub enum CursorFault {
    /// No record exists yet.
    #[error("cursor record not found")]
    Missing,

    /// The record exists but could not be read.
    #[error("cursor record unreadable: {0}")]
    Unreadable(#[source] std::io::Error),

    /// The record is not valid JSON, lacks the field, or is not an integer.
    #[error("cursor record malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The stored value is below 1.
    #[error("cursor value {0} is out of range")]
    OutOfRange(i64),
}

/// File-backed cursor guarded by a single mutex.
#[derive(Debug)]
pub struct CursorStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CursorStore {
    /// Creates a store for the record at `path`. Nothing is touched on disk yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted cursor, resetting the record to 1 if unusable.
    pub fn read(&self) -> i64 {
        self.lock().read()
    }

    /// Persists `value`. Failures are logged, never returned.
    pub fn write(&self, value: i64) {
        self.lock().write(value);
    }

    /// Persists `value`, returning any failure to the caller.
    ///
    /// # Errors
    /// Returns error if the record cannot be serialized or written.
    pub fn try_write(&self, value: i64) -> crate::domain::Result<()> {
        let _held = self.lock.lock();
        self.store(value)
    }

    /// Holds the cursor lock until the guard is dropped, so a caller can
    /// read and then write without another thread interleaving.
    pub fn lock(&self) -> CursorGuard<'_> {
        CursorGuard {
            store: self,
            _held: self.lock.lock(),
        }
    }

    fn load(&self) -> std::result::Result<i64, CursorFault> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(CursorFault::Missing),
            Err(e) => return Err(CursorFault::Unreadable(e)),
        };

        let record: CursorRecord =
            serde_json::from_str(&content).map_err(CursorFault::Malformed)?;

        if record.current_joke_id < DEFAULT_CURSOR {
            return Err(CursorFault::OutOfRange(record.current_joke_id));
        }

        Ok(record.current_joke_id)
    }

    fn store(&self, value: i64) -> crate::domain::Result<()> {
        use crate::domain::AppError;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create cursor directory", e))?;
        }

        let content = serde_json::to_string_pretty(&CursorRecord {
            current_joke_id: value,
        })
        .map_err(AppError::json_parse)?;

        fs::write(&self.path, content)
            .map_err(|e| AppError::io(format!("Failed to write {}", self.path.display()), e))
    }
}

/// Exclusive access to the cursor for the guard's lifetime.
pub struct CursorGuard<'a> {
    store: &'a CursorStore,
    _held: MutexGuard<'a, ()>,
}

impl CursorGuard<'_> {
    /// Reads the cursor; see [`CursorStore::read`].
    pub fn read(&self) -> i64 {
        match self.store.load() {
            Ok(value) => value,
            Err(fault) => {
                match &fault {
                    CursorFault::Missing => tracing::info!(
                        path = %self.store.path.display(),
                        "Cursor record not found, creating with {DEFAULT_CURSOR}"
                    ),
                    _ => tracing::warn!(
                        path = %self.store.path.display(),
                        error = %fault,
                        "Resetting cursor to {DEFAULT_CURSOR}"
                    ),
                }
                self.write(DEFAULT_CURSOR);
                DEFAULT_CURSOR
            }
        }
    }

    /// Writes the cursor; see [`CursorStore::write`].
    pub fn write(&self, value: i64) {
        if let Err(e) = self.store.store(value) {
            tracing::error!(value, error = %e, "Failed to persist cursor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn stored(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_record_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.json");
        let cursor = CursorStore::new(&path);

        assert_eq!(cursor.read(), 1);
        assert_eq!(stored(&path)["current_joke_id"], 1);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let cursor = CursorStore::new(dir.path().join("state/counter.json"));

        cursor.write(42);
        assert_eq!(cursor.read(), 42);
    }

    #[test]
    fn test_try_write_surfaces_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.json");
        fs::create_dir(&path).unwrap();

        assert!(CursorStore::new(&path).try_write(3).is_err());
    }

    #[test]
    fn test_invalid_records_reset_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.json");
        let cursor = CursorStore::new(&path);

        for content in [
            "not json",
            "{}",
            r#"{"current_joke_id": "three"}"#,
            r#"{"current_joke_id": 2.5}"#,
            r#"{"current_joke_id": 0}"#,
            r#"{"current_joke_id": -4}"#,
        ] {
            fs::write(&path, content).unwrap();
            assert_eq!(cursor.read(), 1, "content: {content}");
            assert_eq!(stored(&path)["current_joke_id"], 1);
        }
    }

    #[test]
    fn test_unreadable_record_resets() {
        let dir = tempdir().unwrap();
        // A directory at the record path cannot be read as a file
        let path = dir.path().join("counter.json");
        fs::create_dir(&path).unwrap();
        let cursor = CursorStore::new(&path);

        assert!(matches!(cursor.load(), Err(CursorFault::Unreadable(_))));
        assert_eq!(cursor.read(), 1);
    }

    #[test]
    fn test_guard_serializes_read_modify_write() {
        let dir = tempdir().unwrap();
        let cursor = Arc::new(CursorStore::new(dir.path().join("counter.json")));
        cursor.write(1);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cursor = Arc::clone(&cursor);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let guard = cursor.lock();
                        let value = guard.read();
                        guard.write(value + 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cursor.read(), 201);
    }
}
