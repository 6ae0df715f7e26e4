use serde::{Deserialize, Serialize};

use crate::validate::BookingWindow;

/// Service configuration, loaded once at startup from `TES_`-prefixed
/// environment variables. List-valued fields are comma-separated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub redis_url: String,

    /// Shared secret required in `X-API-Key` on form submissions.
    pub api_key: String,
    /// Admin PIN exchanged for a session token.
    pub admin_pin: String,
    /// HMAC secret signing PIN session tokens.
    pub session_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    /// Cognito user-pool id and region for external admin tokens.
    /// Both unset disables the external scheme entirely.
    #[serde(default)]
    pub cognito_pool_id: Option<String>,
    #[serde(default)]
    pub cognito_region: Option<String>,

    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: i64,
    /// Infra errors in the limiter admit the request rather than block it.
    #[serde(default = "default_true")]
    pub rate_limit_fail_open: bool,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Infra errors while claiming a slot admit the booking rather than
    /// block it (the conflict guard degrades, the form keeps working).
    #[serde(default = "default_true")]
    pub slot_check_fail_open: bool,

    /// Exact origins allowed full CORS access.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Origin named in responses to disallowed origins (never a wildcard).
    #[serde(default = "default_origin")]
    pub default_origin: String,

    /// Bookable calendar dates, `YYYY-MM-DD`.
    #[serde(default = "default_booking_dates")]
    pub booking_dates: Vec<String>,
    #[serde(default = "default_open_hour")]
    pub booking_open_hour: u32,
    #[serde(default = "default_close_hour")]
    pub booking_close_hour: u32,

    /// Retention for submission records (and their slot claims).
    #[serde(default = "default_submission_ttl")]
    pub submission_ttl_secs: u64,

    /// Optional webhook notified of new submissions, best-effort.
    #[serde(default)]
    pub notify_webhook_url: Option<String>,

    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
    /// Sentry DSN for error tracking.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    pub fn booking_window(&self) -> BookingWindow {
        BookingWindow {
            dates: self.booking_dates.clone(),
            open_hour: self.booking_open_hour,
            close_hour: self.booking_close_hour,
        }
    }

    /// Issuer URL of the configured Cognito pool, if any.
    pub fn cognito_issuer(&self) -> Option<String> {
        match (&self.cognito_region, &self.cognito_pool_id) {
            (Some(region), Some(pool)) => Some(format!(
                "https://cognito-idp.{region}.amazonaws.com/{pool}"
            )),
            _ => None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl() -> i64 {
    3600
}

fn default_rate_limit_window() -> u64 {
    300
}

fn default_rate_limit_max() -> i64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_origin() -> String {
    "https://tesconnections.com".to_string()
}

fn default_booking_dates() -> Vec<String> {
    vec![
        "2025-09-12".to_string(),
        "2025-09-13".to_string(),
        "2025-09-14".to_string(),
        "2025-09-15".to_string(),
    ]
}

fn default_open_hour() -> u32 {
    9
}

fn default_close_hour() -> u32 {
    17
}

fn default_submission_ttl() -> u64 {
    // 90 days
    90 * 24 * 60 * 60
}
