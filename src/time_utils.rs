// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{NaiveDate, NaiveDateTime};

/// Format Strava uses for `start_date_local` (the trailing `Z` is not a
/// timezone here; the value is already in the athlete's local time).
const START_DATE_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a `start_date_local` timestamp and truncate to the calendar day.
pub fn parse_local_start_date(raw: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(raw, START_DATE_LOCAL_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

/// Format a calendar day the way the portal's CSV importer expects it.
pub fn format_export_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
