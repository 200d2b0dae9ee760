// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted Strava OAuth credential pair.

use serde::{Deserialize, Serialize};

/// Margin before token expiration when we proactively refresh (5 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Access/refresh token pair persisted between runs.
///
/// Matches both the token file on disk and the refresh-endpoint response
/// body, which carries the same three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp at which `access_token` stops working
    pub expires_at: i64,
}

impl TokenPair {
    /// Whether the access token must be refreshed before the next API call.
    pub fn needs_refresh(&self, now: i64) -> bool {
        now + TOKEN_REFRESH_MARGIN_SECS >= self.expires_at
    }
}
