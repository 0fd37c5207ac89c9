use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::time::Duration;

/// Largest accepted import payload, in bytes
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Largest accepted number of data rows per import
pub const DEFAULT_MAX_ROWS: usize = 1000;
pub const DEFAULT_LOGIN_EMAIL_DOMAIN: &str = "users.usermgmt.local";
const DEFAULT_WORKER_POLL_INTERVAL_SECS: u64 = 5;

/// Limits and naming rules applied while importing
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub max_payload_bytes: usize,
    pub max_rows: usize,
    /// Domain appended to generated login emails when username login is enabled
    pub login_email_domain: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
            login_email_domain: DEFAULT_LOGIN_EMAIL_DOMAIN.to_string(),
        }
    }
}

/// Process-wide configuration read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub import: ImportSettings,
    pub identity_platform_url: String,
    pub event_webhook_url: Option<String>,
    pub worker_poll_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let identity_platform_url = required("IDENTITY_PLATFORM_URL")?;

        let import = ImportSettings {
            max_payload_bytes: parsed_or("IMPORT_MAX_PAYLOAD_BYTES", DEFAULT_MAX_PAYLOAD_BYTES)?,
            max_rows: parsed_or("IMPORT_MAX_ROWS", DEFAULT_MAX_ROWS)?,
            login_email_domain: env::var("LOGIN_EMAIL_DOMAIN")
                .unwrap_or_else(|_| DEFAULT_LOGIN_EMAIL_DOMAIN.to_string()),
        };

        let poll_secs = parsed_or("WORKER_POLL_INTERVAL_SECS", DEFAULT_WORKER_POLL_INTERVAL_SECS)?;

        Ok(Self {
            database_url,
            import,
            identity_platform_url: identity_platform_url.trim_end_matches('/').to_string(),
            event_webhook_url: env::var("EVENT_WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
            worker_poll_interval: Duration::from_secs(poll_secs),
        })
    }
}

fn required(key: &str) -> AppResult<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} environment variable not found", key)))
}

fn parsed_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Ok(raw.trim().parse::<T>()?),
        _ => Ok(default),
    }
}
