// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for token refresh and activity listing.
//!
//! Handles:
//! - Listing activities newer than the cursor timestamp
//! - Refreshing an expired token pair

use crate::error::{AppError, Result};
use crate::models::{Activity, TokenPair};

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_url(
            "https://www.strava.com".to_string(),
            client_id,
            client_secret,
        )
    }

    /// Create a client against an arbitrary base URL (for tests).
    pub fn with_base_url(base_url: String, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            client_id,
            client_secret,
        }
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair> {
        let url = format!("{}/oauth/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Api(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, body = %body, "Strava token refresh failed");
            return Err(AppError::Auth { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Api(format!("Failed to parse token response: {}", e)))
    }

    /// List activities that started after the given Unix timestamp.
    ///
    /// Strava treats `after` as an exclusive bound, so a cursor recorded
    /// at instant T never re-fetches an activity starting exactly at T.
    pub async fn list_activities(&self, access_token: &str, after: i64) -> Result<Vec<Activity>> {
        let url = format!("{}/api/v3/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("after", after.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Api(format!("Activity fetch request failed: {}", e)))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(AppError::Fetch { status });
        }

        // Strava occasionally returns an empty or null body instead of []
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Api(format!("Failed to read activities body: {}", e)))?;
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(Vec::new());
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Api(format!("Failed to parse activities: {}", e)))
    }
}
