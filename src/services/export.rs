// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export building and CSV serialization.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::fs_utils::atomic_write;
use crate::models::export::{meters_to_miles, normalize_activity_type};
use crate::models::{Activity, DatePolicy, ExportRow};
use crate::time_utils::{format_export_date, parse_local_start_date};

/// Header row the portal's CSV importer expects.
pub const CSV_HEADER: &str = "Activity Date,Distance in Miles,Activity Type";

/// Build export rows, one per activity, preserving input order.
pub fn build_export(
    records: &[Activity],
    policy: DatePolicy,
    run_date: NaiveDate,
) -> Result<Vec<ExportRow>> {
    records
        .iter()
        .map(|activity| {
            let date = match policy {
                DatePolicy::RunDate => run_date,
                DatePolicy::ActivityDate => parse_local_start_date(&activity.start_date_local)
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "Invalid start_date_local for activity {}: {:?}",
                            activity.id,
                            activity.start_date_local
                        ))
                    })?,
            };

            Ok(ExportRow {
                date,
                miles: meters_to_miles(activity.distance),
                activity_type: normalize_activity_type(&activity.activity_type).to_string(),
            })
        })
        .collect()
}

/// Serialize rows to CSV text (UTF-8, `\n` line endings).
pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for row in rows {
        let _ = writeln!(
            out,
            "{},{:.2},{}",
            format_export_date(row.date),
            row.miles,
            csv_escape(&row.activity_type)
        );
    }

    out
}

/// Write the CSV export, overwriting any existing file at `path`.
pub fn write_csv(rows: &[ExportRow], path: &Path) -> Result<()> {
    atomic_write(path, render_csv(rows).as_bytes())
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
