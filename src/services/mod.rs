// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cursor;
pub mod export;
pub mod strava;
pub mod sync;
pub mod tokens;
pub mod upload;

pub use cursor::{CursorSource, CursorStore};
pub use strava::StravaClient;
pub use sync::{RunOutcome, SyncPipeline};
pub use tokens::{TokenManager, TokenStore};
pub use upload::{ChromeFormDriver, FormDriver, PortalUploader, Uploader};
