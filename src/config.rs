//! Application configuration loaded from environment variables.
//!
//! Everything the original deployment hardcoded (credentials, the portal
//! address, filesystem paths) is externalized here. A `.env` file is
//! loaded if present.

use std::env;
use std::path::PathBuf;

use crate::models::DatePolicy;
use crate::services::cursor::CursorSource;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava API ---
    /// Strava OAuth client ID (public)
    pub client_id: String,
    /// Strava OAuth client secret
    pub client_secret: String,

    // --- Portal upload ---
    /// Activity-entry page URL (without query parameters)
    pub portal_url: String,
    /// Registration ID query parameter
    pub registration_id: String,
    /// Event ID query parameter
    pub event_id: String,
    /// Email address the portal accepts as authentication for this flow
    pub email: String,

    // --- Local state ---
    /// Directory holding the token file, cursor file, and run lock
    pub state_dir: PathBuf,
    /// Where the CSV export is written
    pub export_path: PathBuf,

    // --- Run policy ---
    /// Which date each export row carries
    pub date_policy: DatePolicy,
    /// Where the fetch cursor comes from
    pub cursor_source: CursorSource,
    /// Look-back window in seconds (only used with the window source)
    pub window_secs: i64,
    /// Bootstrap cursor for a first run with no stored cursor yet
    pub bootstrap_cursor: Option<i64>,
    /// How long to wait for portal page elements before giving up
    pub element_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            portal_url: "http://localhost:8080/ActivityEntry".to_string(),
            registration_id: "1".to_string(),
            event_id: "1".to_string(),
            email: "runner@example.com".to_string(),
            state_dir: PathBuf::from("state"),
            export_path: PathBuf::from("state/daily_upload.csv"),
            date_policy: DatePolicy::ActivityDate,
            cursor_source: CursorSource::Stored,
            window_secs: 86_400,
            bootstrap_cursor: None,
            element_timeout_secs: 15,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let state_dir =
            PathBuf::from(env::var("STATE_DIR").unwrap_or_else(|_| "state".to_string()));
        let export_path = env::var("EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| state_dir.join("daily_upload.csv"));

        Ok(Self {
            client_id: env::var("CLIENT_ID").map_err(|_| ConfigError::Missing("CLIENT_ID"))?,
            client_secret: env::var("CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CLIENT_SECRET"))?,

            portal_url: env::var("PORTAL_URL").map_err(|_| ConfigError::Missing("PORTAL_URL"))?,
            registration_id: env::var("REGISTRATION_ID")
                .map_err(|_| ConfigError::Missing("REGISTRATION_ID"))?,
            event_id: env::var("EVENT_ID").map_err(|_| ConfigError::Missing("EVENT_ID"))?,
            email: env::var("EMAIL").map_err(|_| ConfigError::Missing("EMAIL"))?,

            date_policy: match env::var("DATE_POLICY") {
                Ok(raw) => DatePolicy::parse(&raw)
                    .ok_or_else(|| ConfigError::Invalid("DATE_POLICY", raw))?,
                Err(_) => DatePolicy::ActivityDate,
            },
            cursor_source: match env::var("CURSOR_SOURCE") {
                Ok(raw) => CursorSource::parse(&raw)
                    .ok_or_else(|| ConfigError::Invalid("CURSOR_SOURCE", raw))?,
                Err(_) => CursorSource::Stored,
            },
            window_secs: env::var("WINDOW_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86_400),
            bootstrap_cursor: env::var("LAST_UPLOAD_DATE")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            element_timeout_secs: env::var("ELEMENT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),

            state_dir,
            export_path,
        })
    }

    /// Full activity-entry page URL, query parameters included.
    pub fn portal_page_url(&self) -> String {
        format!(
            "{}?registrationId={}&eventId={}",
            self.portal_url, self.registration_id, self.event_id
        )
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
