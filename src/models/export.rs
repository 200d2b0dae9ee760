// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export rows for the portal's CSV upload.

use chrono::NaiveDate;

/// Meters per statute mile.
const METERS_PER_MILE: f64 = 1609.34;

/// Which date each export row carries.
///
/// Both variants exist in the deployment's history and are not
/// interchangeable: `ActivityDate` is backfill-correct, `RunDate` stamps
/// everything with the day of the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    /// The activity's own start date, truncated to the calendar day.
    #[default]
    ActivityDate,
    /// The date of the run performing the upload.
    RunDate,
}

impl DatePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "activity-date" => Some(Self::ActivityDate),
            "run-date" => Some(Self::RunDate),
            _ => None,
        }
    }
}

/// One line of the generated CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    /// Distance in miles, already rounded to 2 decimal places
    pub miles: f64,
    pub activity_type: String,
}

/// Convert a distance in meters to miles, rounded to 2 decimal places.
///
/// Ties round to even so boundary values are stable across platforms.
pub fn meters_to_miles(meters: f64) -> f64 {
    ((meters / METERS_PER_MILE) * 100.0).round_ties_even() / 100.0
}

/// Normalize a provider activity type for the portal.
///
/// The portal has no "Hike" type; everything else passes through
/// verbatim, case-sensitively.
pub fn normalize_activity_type(raw: &str) -> &str {
    if raw == "Hike" {
        "Walk"
    } else {
        raw
    }
}
