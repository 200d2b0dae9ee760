// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for integration tests.

use std::path::PathBuf;

use craw_sync::config::Config;
use craw_sync::models::TokenPair;
use tempfile::TempDir;

/// State directory for one test run.
pub struct TestState {
    pub dir: TempDir,
}

impl TestState {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp state dir"),
        }
    }

    #[allow(dead_code)]
    pub fn token_path(&self) -> PathBuf {
        self.dir.path().join("strava_tokens.json")
    }

    #[allow(dead_code)]
    pub fn cursor_path(&self) -> PathBuf {
        self.dir.path().join("last_upload")
    }

    #[allow(dead_code)]
    pub fn export_path(&self) -> PathBuf {
        self.dir.path().join("daily_upload.csv")
    }

    #[allow(dead_code)]
    pub fn seed_tokens(&self, pair: &TokenPair) {
        std::fs::write(self.token_path(), serde_json::to_string(pair).unwrap()).unwrap();
    }

    #[allow(dead_code)]
    pub fn seed_cursor(&self, timestamp: i64) {
        std::fs::write(self.cursor_path(), format!("{}\n", timestamp)).unwrap();
    }

    #[allow(dead_code)]
    pub fn read_cursor(&self) -> Option<String> {
        std::fs::read_to_string(self.cursor_path()).ok()
    }
}

/// A token pair expiring far in the future (year 2100).
#[allow(dead_code)]
pub fn fresh_pair() -> TokenPair {
    TokenPair {
        access_token: "fresh-access".to_string(),
        refresh_token: "fresh-refresh".to_string(),
        expires_at: 4_102_444_800,
    }
}

/// A token pair that expired long ago.
#[allow(dead_code)]
pub fn expired_pair() -> TokenPair {
    TokenPair {
        access_token: "stale-access".to_string(),
        refresh_token: "stale-refresh".to_string(),
        expires_at: 1,
    }
}

/// The sample hike from the provider, provider metadata included.
#[allow(dead_code)]
pub fn hike_activity_json() -> serde_json::Value {
    serde_json::json!({
        "id": 4719328717u64,
        "name": "Afternoon Hike",
        "type": "Hike",
        "distance": 1757.3,
        "moving_time": 1010,
        "elapsed_time": 1063,
        "total_elevation_gain": 8.6,
        "start_date": "2021-02-01T22:37:26Z",
        "start_date_local": "2021-02-01T17:37:26Z",
        "athlete": {"id": 69777155, "resource_state": 1},
        "map": {"id": "a4719328717", "summary_polyline": "ehvpFzm"}
    })
}

/// Test config pointed at the temp state dir.
#[allow(dead_code)]
pub fn test_config(state: &TestState) -> Config {
    let mut config = Config::default();
    config.state_dir = state.dir.path().to_path_buf();
    config.export_path = state.export_path();
    config.bootstrap_cursor = Some(1_000);
    config
}
