// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Craw-Sync: push Strava activities to the race-club results portal.
//!
//! One invocation performs a single linear run: refresh the stored OAuth
//! tokens if they are expired, fetch activities newer than the stored
//! cursor, write the portal's three-column CSV export, drive a browser
//! session through the portal's upload form, and advance the cursor.

pub mod config;
pub mod error;
pub mod fs_utils;
pub mod lock;
pub mod models;
pub mod services;
pub mod time_utils;
