// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cursor persistence: the lower bound for "new" activities.
//!
//! The cursor is written exactly once per run, after a verified upload
//! or a confirmed-empty fetch. A failed run leaves it untouched so the
//! next invocation retries the same window.

use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::fs_utils::atomic_write;

/// Where a run's cursor value comes from.
///
/// Both variants exist in the deployment's history; they are distinct
/// policies, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorSource {
    /// The persisted cursor file, bootstrapped from `LAST_UPLOAD_DATE`
    /// when no file exists yet.
    #[default]
    Stored,
    /// A fixed look-back window from the run's start time, ignoring the
    /// stored value.
    Window,
}

impl CursorSource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "stored" => Some(Self::Stored),
            "window" => Some(Self::Window),
            _ => None,
        }
    }
}

/// Reads and writes the persisted cursor timestamp.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stored cursor, if one has been recorded.
    pub fn load(&self) -> Result<Option<i64>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };

        raw.trim().parse().map(Some).map_err(|_| {
            AppError::Configuration(format!(
                "Cursor file {} is malformed: {:?}",
                self.path.display(),
                raw.trim()
            ))
        })
    }

    /// Persist `timestamp` as the cursor for the next run.
    pub fn record(&self, timestamp: i64) -> Result<()> {
        atomic_write(&self.path, format!("{}\n", timestamp).as_bytes())?;
        tracing::info!(timestamp, "Cursor advanced");
        Ok(())
    }

    /// Resolve the fetch cursor for a run starting at `now`.
    pub fn resolve(
        &self,
        source: CursorSource,
        now: i64,
        window_secs: i64,
        bootstrap: Option<i64>,
    ) -> Result<i64> {
        match source {
            CursorSource::Window => Ok(now - window_secs),
            CursorSource::Stored => match self.load()? {
                Some(ts) => Ok(ts),
                None => bootstrap.ok_or_else(|| {
                    AppError::Configuration(
                        "No stored cursor and LAST_UPLOAD_DATE is not set; \
                         set it once to bootstrap the first run"
                            .to_string(),
                    )
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> CursorStore {
        CursorStore::new(dir.path().join("last_upload"))
    }

    #[test]
    fn test_load_absent_cursor_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store(&dir).load().unwrap(), None);
    }

    #[test]
    fn test_record_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.record(1_612_222_646).unwrap();
        assert_eq!(store.load().unwrap(), Some(1_612_222_646));
    }

    #[test]
    fn test_load_malformed_cursor_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("last_upload"), "yesterday\n").unwrap();
        assert!(matches!(
            store(&dir).load(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_resolve_stored_prefers_file_over_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.record(2000).unwrap();
        let cursor = store
            .resolve(CursorSource::Stored, 5000, 86_400, Some(1000))
            .unwrap();
        assert_eq!(cursor, 2000);
    }

    #[test]
    fn test_resolve_stored_falls_back_to_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let cursor = store(&dir)
            .resolve(CursorSource::Stored, 5000, 86_400, Some(1000))
            .unwrap();
        assert_eq!(cursor, 1000);
    }

    #[test]
    fn test_resolve_stored_without_bootstrap_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = store(&dir).resolve(CursorSource::Stored, 5000, 86_400, None);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_resolve_window_ignores_stored_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.record(2000).unwrap();
        let cursor = store
            .resolve(CursorSource::Window, 100_000, 86_400, None)
            .unwrap();
        assert_eq!(cursor, 100_000 - 86_400);
    }
}
