// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Craw-Sync uploader
//!
//! Fetches new Strava activities and pushes them to the race-club
//! results portal. Performs exactly one run per invocation; scheduling
//! is cron's job.

use craw_sync::config::Config;
use craw_sync::error::{AppError, Result};
use craw_sync::lock::RunLock;
use craw_sync::services::{
    CursorStore, PortalUploader, RunOutcome, StravaClient, SyncPipeline, TokenManager, TokenStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "Sync run failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env().map_err(|e| AppError::Configuration(e.to_string()))?;
    std::fs::create_dir_all(&config.state_dir)?;

    // One run at a time; a second invocation fails fast instead of
    // racing on the token and cursor files.
    let _lock = RunLock::acquire(&config.state_dir.join("craw-sync.lock"))?;

    let strava = StravaClient::new(config.client_id.clone(), config.client_secret.clone());
    let tokens = TokenManager::new(
        strava.clone(),
        TokenStore::new(config.state_dir.join("strava_tokens.json")),
    );
    let cursor = CursorStore::new(config.state_dir.join("last_upload"));
    let uploader = PortalUploader::new(&config);

    let pipeline = SyncPipeline::new(strava, tokens, cursor, uploader, &config);
    match pipeline.run().await? {
        RunOutcome::Uploaded { count } => {
            tracing::info!(count, "Upload complete");
        }
        RunOutcome::NoNewActivities => {
            tracing::info!("There were no new activities");
        }
    }

    Ok(())
}

/// Initialize logging with env-filter control.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("craw_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
