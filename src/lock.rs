// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run lock to prevent overlapping invocations.
//!
//! The token and cursor files are read-then-written over the course of a
//! run, so two overlapping runs could corrupt them. A lock file with
//! create-new semantics makes the second invocation fail fast instead.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Held for the duration of a run; the lock file is removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock, failing if another run holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    AppError::Configuration(format!(
                        "Another run appears to be in progress (lock file {} exists); \
                         remove it if that run crashed",
                        path.display()
                    ))
                } else {
                    AppError::Io(e)
                }
            })?;

        // PID for whoever has to clean up after a crash
        let _ = writeln!(file, "{}", std::process::id());

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
