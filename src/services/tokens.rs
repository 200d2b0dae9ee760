// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token persistence and refresh.
//!
//! The token pair lives in a small JSON file between runs; it is the
//! only credential state. If the file is missing or unreadable the
//! operator has to bootstrap it once by hand with a valid refresh token
//! (the initial OAuth authorization flow is out of scope).

use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::fs_utils::atomic_write;
use crate::models::TokenPair;
use crate::services::strava::StravaClient;

/// Reads and writes the persisted token pair.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted pair.
    pub fn load(&self) -> Result<TokenPair> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Configuration(format!(
                "Cannot read token file {} ({}); bootstrap it once with a valid refresh token",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::Configuration(format!(
                "Token file {} is malformed: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Persist the pair, overwriting the previous one.
    pub fn save(&self, pair: &TokenPair) -> Result<()> {
        let json = serde_json::to_string_pretty(pair).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Token serialization failed: {}", e))
        })?;
        atomic_write(&self.path, json.as_bytes())
    }
}

/// Token lifecycle on top of the store: load, refresh when needed,
/// persist the replacement.
pub struct TokenManager {
    client: StravaClient,
    store: TokenStore,
}

impl TokenManager {
    pub fn new(client: StravaClient, store: TokenStore) -> Self {
        Self { client, store }
    }

    /// Return a pair guaranteed valid as of `now`.
    ///
    /// An expired (or nearly expired) pair is refreshed against Strava
    /// and persisted before it is returned, so the file always matches
    /// what the caller holds.
    pub async fn ensure_fresh(&self, now: i64) -> Result<TokenPair> {
        let pair = self.store.load()?;
        if !pair.needs_refresh(now) {
            return Ok(pair);
        }

        tracing::info!(expires_at = pair.expires_at, "Access token expired, refreshing");
        let refreshed = self.client.refresh_token(&pair.refresh_token).await?;
        self.store.save(&refreshed)?;
        tracing::info!(expires_at = refreshed.expires_at, "Token refreshed and persisted");

        Ok(refreshed)
    }
}
