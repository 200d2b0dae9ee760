// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The sync pipeline: one linear run per invocation.
//!
//! Handles the core workflow:
//! 1. Ensure the credential pair is fresh
//! 2. Fetch activities newer than the cursor
//! 3. Build the CSV export
//! 4. Upload it through the portal
//! 5. Record the new cursor
//!
//! The cursor only advances after a verified upload or a confirmed-empty
//! fetch, so a failed run leaves the same window for the next one.

use std::path::PathBuf;

use chrono::{Local, Utc};

use crate::config::Config;
use crate::error::Result;
use crate::models::DatePolicy;
use crate::services::cursor::{CursorSource, CursorStore};
use crate::services::export::{build_export, write_csv};
use crate::services::strava::StravaClient;
use crate::services::tokens::TokenManager;
use crate::services::upload::Uploader;

/// What a completed run did.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Activities were exported and the portal accepted the upload.
    Uploaded { count: usize },
    /// The fetch window contained nothing new.
    NoNewActivities,
}

/// One-shot sync pipeline.
pub struct SyncPipeline<U: Uploader> {
    strava: StravaClient,
    tokens: TokenManager,
    cursor: CursorStore,
    uploader: U,
    export_path: PathBuf,
    date_policy: DatePolicy,
    cursor_source: CursorSource,
    window_secs: i64,
    bootstrap_cursor: Option<i64>,
}

impl<U: Uploader> SyncPipeline<U> {
    pub fn new(
        strava: StravaClient,
        tokens: TokenManager,
        cursor: CursorStore,
        uploader: U,
        config: &Config,
    ) -> Self {
        Self {
            strava,
            tokens,
            cursor,
            uploader,
            export_path: config.export_path.clone(),
            date_policy: config.date_policy,
            cursor_source: config.cursor_source,
            window_secs: config.window_secs,
            bootstrap_cursor: config.bootstrap_cursor,
        }
    }

    /// Execute one run.
    pub async fn run(&self) -> Result<RunOutcome> {
        let now = Utc::now().timestamp();

        // 1. Credentials (refreshed and persisted if needed)
        let pair = self.tokens.ensure_fresh(now).await?;

        // 2. Fetch
        let after =
            self.cursor
                .resolve(self.cursor_source, now, self.window_secs, self.bootstrap_cursor)?;
        let activities = self.strava.list_activities(&pair.access_token, after).await?;
        tracing::info!(count = activities.len(), after, "Fetched activities");

        if activities.is_empty() {
            // Confirmed nothing to do still advances the cursor
            self.cursor.record(now)?;
            return Ok(RunOutcome::NoNewActivities);
        }

        // 3. Export
        let rows = build_export(&activities, self.date_policy, Local::now().date_naive())?;
        write_csv(&rows, &self.export_path)?;
        tracing::info!(
            path = %self.export_path.display(),
            rows = rows.len(),
            "Export written"
        );

        // 4. Upload (the driver verifies the portal's success indicator)
        self.uploader.upload(&self.export_path).await?;

        // 5. Advance the cursor only now that the upload is confirmed
        self.cursor.record(now)?;

        Ok(RunOutcome::Uploaded { count: rows.len() })
    }
}
