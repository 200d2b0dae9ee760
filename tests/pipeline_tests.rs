// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end pipeline runs against a mock Strava server and a fake
//! uploader, with real state files in a temp directory.

mod common;

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::TestState;
use craw_sync::error::{AppError, Result};
use craw_sync::services::{
    CursorStore, RunOutcome, StravaClient, SyncPipeline, TokenManager, TokenStore, Uploader,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records uploaded CSV contents instead of driving a browser.
#[derive(Clone, Default)]
struct FakeUploader {
    uploads: Arc<Mutex<Vec<String>>>,
    reject: bool,
}

#[async_trait]
impl Uploader for FakeUploader {
    async fn upload(&self, csv_path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(csv_path).expect("export file readable");
        self.uploads.lock().unwrap().push(contents);
        if self.reject {
            return Err(AppError::UploadRejected);
        }
        Ok(())
    }
}

fn pipeline(
    server: &MockServer,
    state: &TestState,
    uploader: FakeUploader,
) -> SyncPipeline<FakeUploader> {
    let config = common::test_config(state);
    let strava = StravaClient::with_base_url(
        server.uri(),
        config.client_id.clone(),
        config.client_secret.clone(),
    );
    let tokens = TokenManager::new(strava.clone(), TokenStore::new(state.token_path()));
    let cursor = CursorStore::new(state.cursor_path());
    SyncPipeline::new(strava, tokens, cursor, uploader, &config)
}

#[tokio::test]
async fn uploads_new_activities_and_advances_the_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(query_param("after", "1000"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![common::hike_activity_json()]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let state = TestState::new();
    state.seed_tokens(&common::fresh_pair());
    state.seed_cursor(1000);

    let uploader = FakeUploader::default();
    let before = chrono::Utc::now().timestamp();
    let outcome = pipeline(&server, &state, uploader.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(outcome, RunOutcome::Uploaded { count: 1 });

    let uploads = uploader.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(
        uploads[0],
        "Activity Date,Distance in Miles,Activity Type\n2021-02-01,1.09,Walk\n"
    );

    let cursor: i64 = state.read_cursor().unwrap().trim().parse().unwrap();
    assert!(cursor >= before);
}

#[tokio::test]
async fn empty_fetch_skips_upload_but_records_the_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&server)
        .await;

    let state = TestState::new();
    state.seed_tokens(&common::fresh_pair());
    state.seed_cursor(1000);

    let uploader = FakeUploader::default();
    let before = chrono::Utc::now().timestamp();
    let outcome = pipeline(&server, &state, uploader.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(outcome, RunOutcome::NoNewActivities);
    assert!(uploader.uploads.lock().unwrap().is_empty());
    assert!(!state.export_path().exists());

    let cursor: i64 = state.read_cursor().unwrap().trim().parse().unwrap();
    assert!(cursor >= before);
}

#[tokio::test]
async fn null_body_counts_as_no_new_activities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let state = TestState::new();
    state.seed_tokens(&common::fresh_pair());
    state.seed_cursor(1000);

    let outcome = pipeline(&server, &state, FakeUploader::default())
        .run()
        .await
        .expect("run");
    assert_eq!(outcome, RunOutcome::NoNewActivities);
}

#[tokio::test]
async fn fetch_failure_leaves_the_cursor_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let state = TestState::new();
    state.seed_tokens(&common::fresh_pair());
    state.seed_cursor(1000);

    let uploader = FakeUploader::default();
    let err = pipeline(&server, &state, uploader.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Fetch { status: 404 }));
    assert!(uploader.uploads.lock().unwrap().is_empty());
    assert_eq!(state.read_cursor().unwrap(), "1000\n");
}

#[tokio::test]
async fn rejected_upload_leaves_the_cursor_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![common::hike_activity_json()]),
        )
        .mount(&server)
        .await;

    let state = TestState::new();
    state.seed_tokens(&common::fresh_pair());
    state.seed_cursor(1000);

    let uploader = FakeUploader {
        reject: true,
        ..FakeUploader::default()
    };
    let err = pipeline(&server, &state, uploader.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UploadRejected));
    // The upload was attempted, but the cursor must not move
    assert_eq!(uploader.uploads.lock().unwrap().len(), 1);
    assert_eq!(state.read_cursor().unwrap(), "1000\n");
}

#[tokio::test]
async fn expired_tokens_are_refreshed_mid_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_at": 4_102_444_800i64
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .and(wiremock::matchers::header(
            "authorization",
            "Bearer new-access",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&server)
        .await;

    let state = TestState::new();
    state.seed_tokens(&common::expired_pair());
    state.seed_cursor(1000);

    let outcome = pipeline(&server, &state, FakeUploader::default())
        .run()
        .await
        .expect("run");
    assert_eq!(outcome, RunOutcome::NoNewActivities);

    // The refreshed pair is already on disk for the next run
    let persisted = std::fs::read_to_string(state.token_path()).unwrap();
    assert!(persisted.contains("new-refresh"));
}
