// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Application error type covering every way a sync run can fail.
///
/// The cursor only advances on a successful run, so all of these are
/// fatal for the current run and retried by the next scheduled one.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Token refresh failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Activity fetch failed (HTTP {status})")]
    Fetch { status: u16 },

    #[error("Portal rejected the CSV upload")]
    UploadRejected,

    #[error("Strava API error: {0}")]
    Api(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, AppError>;
