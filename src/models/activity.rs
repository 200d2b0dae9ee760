// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity summary as returned by the activities list endpoint.

use serde::Deserialize;

/// One activity from the athlete-activities endpoint.
///
/// Strava returns a few dozen more fields (map polylines, kudos counts,
/// gear IDs, ...); everything not listed here is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Activity type (Run, Ride, Hike, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Start time in the athlete's local timezone (`YYYY-MM-DDTHH:MM:SSZ`)
    pub start_date_local: String,
    /// Distance in meters
    pub distance: f64,
}
